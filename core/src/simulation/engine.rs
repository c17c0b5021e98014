use crate::audio::AudioCue;
use crate::interface::{DetectedObject, Pulse, SonarSnapshot};
use crate::math::random::RandomSource;
use crate::prelude::{Millis, SimulationParams, SonarResult};
use crate::scheduler::{Scheduler, TimerId};
use crate::simulation::buffer::DetectionBuffer;
use crate::simulation::tasks::SonarTask;
use crate::telemetry::{LogManager, MetricsRecorder, SonarMetrics};

/// Timer-driven sonar state machine.
///
/// All mutation happens on the caller's thread, either directly through
/// [`SonarLoop::set_active`] / [`SonarLoop::emit`] or while draining due
/// tasks in [`SonarLoop::advance_to`]. Deactivation cancels only the
/// periodic emission and sweep timers; spawns, pulse expiries and echoes that
/// were already queued still run.
pub struct SonarLoop<S, R, A>
where
    S: Scheduler<SonarTask>,
    R: RandomSource,
    A: AudioCue,
{
    params: SimulationParams,
    scheduler: S,
    rng: R,
    audio: A,
    active: bool,
    pulses: Vec<Pulse>,
    objects: DetectionBuffer,
    sweep_angle: f32,
    pulse_count: u64,
    echo_active: bool,
    next_pulse_id: u64,
    next_object_id: u64,
    emit_timer: Option<TimerId>,
    sweep_timer: Option<TimerId>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl<S, R, A> SonarLoop<S, R, A>
where
    S: Scheduler<SonarTask>,
    R: RandomSource,
    A: AudioCue,
{
    /// Builds an inactive loop and starts the janitor, which runs for the
    /// lifetime of the loop.
    pub fn new(
        params: SimulationParams,
        mut scheduler: S,
        rng: R,
        audio: A,
    ) -> SonarResult<Self> {
        params.validate()?;
        scheduler.every(params.janitor_interval_ms, SonarTask::Janitor);
        let objects = DetectionBuffer::with_capacity(params.max_objects);

        Ok(Self {
            params,
            scheduler,
            rng,
            audio,
            active: false,
            pulses: Vec::new(),
            objects,
            sweep_angle: 0.0,
            pulse_count: 0,
            echo_active: false,
            next_pulse_id: 0,
            next_object_id: 0,
            emit_timer: None,
            sweep_timer: None,
            logger: LogManager::new("sonar"),
            metrics: MetricsRecorder::new(),
        })
    }

    /// Switches scanning on or off at the scheduler's current time.
    ///
    /// Turning on emits one pulse immediately and starts the periodic
    /// emission and sweep timers. Repeating the current state does nothing.
    pub fn set_active(&mut self, active: bool) {
        if active == self.active {
            return;
        }
        self.active = active;

        if active {
            self.logger
                .record(&format!("scan started at {} ms", self.scheduler.now()));
            self.emit();
            self.emit_timer = Some(
                self.scheduler
                    .every(self.params.emit_interval_ms, SonarTask::Emit),
            );
            self.sweep_timer = Some(
                self.scheduler
                    .every(self.params.sweep_interval_ms, SonarTask::SweepTick),
            );
        } else {
            for timer in [self.emit_timer.take(), self.sweep_timer.take()]
                .into_iter()
                .flatten()
            {
                self.scheduler.cancel(timer);
            }
            self.logger.record(&format!(
                "scan stopped at {} ms after {} pulses",
                self.scheduler.now(),
                self.pulse_count
            ));
        }
    }

    /// Emits one pulse and returns its id.
    ///
    /// Random draws happen in a fixed order: echo delay, spawn roll, then the
    /// spawn delay when the roll exceeds the spawn threshold.
    pub fn emit(&mut self) -> u64 {
        let now = self.scheduler.now();
        let pulse = Pulse::new(self.next_pulse_id, now);
        self.next_pulse_id += 1;
        self.pulses.push(pulse);
        self.pulse_count += 1;
        self.metrics.record_pulse();

        self.sound_ping();

        let roll = self.rng.next_unit();
        if roll > self.params.spawn_threshold {
            let delay = self.rng.uniform(self.params.spawn_delay_ms) as Millis;
            self.scheduler.after(delay, SonarTask::SpawnObject);
            self.logger.trace(&format!(
                "pulse {} roll {:.3}: spawn in {} ms",
                pulse.id, roll, delay
            ));
        } else {
            self.logger
                .trace(&format!("pulse {} roll {:.3}: no return", pulse.id, roll));
        }

        self.scheduler
            .after(self.params.pulse_lifetime_ms, SonarTask::ExpirePulse(pulse.id));
        pulse.id
    }

    fn sound_ping(&mut self) {
        match self.audio.ping() {
            Ok(()) => {
                let delay = self.rng.uniform(self.params.echo_delay_ms) as Millis;
                self.scheduler.after(delay, SonarTask::EchoReturn);
            }
            Err(err) => {
                self.metrics.record_audio_error();
                self.logger.warn(&format!("ping cue failed: {err}"));
            }
        }
    }

    /// Runs every task due at or before `now`, then moves the clock to `now`.
    /// Returns the number of tasks dispatched.
    pub fn advance_to(&mut self, now: Millis) -> usize {
        let mut dispatched = 0;
        while let Some((_, task)) = self.scheduler.pop_due(now) {
            self.handle(task);
            dispatched += 1;
        }
        self.scheduler.advance_clock(now);
        dispatched
    }

    pub fn advance_by(&mut self, delta: Millis) -> usize {
        let target = self.scheduler.now().saturating_add(delta);
        self.advance_to(target)
    }

    fn handle(&mut self, task: SonarTask) {
        match task {
            SonarTask::Emit => {
                self.emit();
            }
            SonarTask::SweepTick => self.advance_sweep(),
            SonarTask::Janitor => self.reap_objects(),
            SonarTask::SpawnObject => self.spawn_object(),
            SonarTask::ExpirePulse(id) => {
                let before = self.pulses.len();
                self.pulses.retain(|pulse| pulse.id != id);
                if self.pulses.len() < before {
                    self.metrics.record_pulse_expired();
                }
            }
            SonarTask::EchoReturn => match self.audio.echo() {
                Ok(()) => {
                    self.metrics.record_echo();
                    self.echo_active = true;
                    self.scheduler
                        .after(self.params.echo_flash_ms, SonarTask::EchoFade);
                }
                Err(err) => {
                    self.metrics.record_audio_error();
                    self.logger.warn(&format!("echo cue failed: {err}"));
                }
            },
            SonarTask::EchoFade => self.echo_active = false,
        }
    }

    fn advance_sweep(&mut self) {
        self.sweep_angle = wrap_degrees(self.sweep_angle + self.params.sweep_step_deg);
    }

    fn spawn_object(&mut self) {
        let now = self.scheduler.now();
        let angle = wrap_degrees(self.rng.uniform(self.params.angle_deg) as f32);
        let distance = self.rng.uniform(self.params.distance) as f32;
        let size = self.rng.uniform(self.params.size) as f32;
        let object = DetectedObject::new(self.next_object_id, angle, distance, size, now);
        self.next_object_id += 1;

        let evicted = self.objects.push(object);
        self.metrics.record_spawn(evicted);
        self.logger.trace(&format!(
            "object {} at {:.1} deg / {:.1} (evicted {})",
            object.id, object.angle, object.distance, evicted
        ));
    }

    fn reap_objects(&mut self) {
        let now = self.scheduler.now();
        let lifetime = self.params.object_lifetime_ms;
        let removed = self
            .objects
            .retain(|object| !object.is_expired(now, lifetime));
        if removed > 0 {
            self.metrics.record_expired(removed);
            self.logger
                .trace(&format!("janitor expired {removed} objects at {now} ms"));
        }
    }

    pub fn snapshot(&self) -> SonarSnapshot {
        SonarSnapshot {
            now: self.scheduler.now(),
            active: self.active,
            pulses: self.pulses.clone(),
            objects: self.objects.as_slice().to_vec(),
            sweep_angle: self.sweep_angle,
            pulse_count: self.pulse_count,
            echo_active: self.echo_active,
            pulse_lifetime_ms: self.params.pulse_lifetime_ms,
            object_lifetime_ms: self.params.object_lifetime_ms,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn objects(&self) -> &[DetectedObject] {
        self.objects.as_slice()
    }

    pub fn sweep_angle(&self) -> f32 {
        self.sweep_angle
    }

    pub fn pulse_count(&self) -> u64 {
        self.pulse_count
    }

    pub fn echo_active(&self) -> bool {
        self.echo_active
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn metrics(&self) -> SonarMetrics {
        self.metrics.snapshot()
    }
}

/// Folds an angle into `[0, 360)`; f32 rounding can land exactly on 360.
fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
