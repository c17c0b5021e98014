use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use serde::Serialize;
use sonarcore::audio::SynthAudio;
use sonarcore::interface::SonarSnapshot;
use sonarcore::math::SeededRandom;
use sonarcore::scheduler::VirtualScheduler;
use sonarcore::telemetry::SonarMetrics;
use sonarcore::{Millis, SimulationParams, SonarLoop, SonarTask};
use std::collections::VecDeque;

pub type HeadlessSonar = SonarLoop<VirtualScheduler<SonarTask>, SeededRandom, SynthAudio>;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub elapsed_ms: Millis,
    pub metrics: SonarMetrics,
    pub max_objects_seen: usize,
    pub pings: u64,
    pub echoes: u64,
    #[serde(skip)]
    pub final_snapshot: SonarSnapshot,
    #[serde(skip)]
    pub frames: Vec<SonarSnapshot>,
}

pub fn build_sonar(config: &WorkflowConfig) -> anyhow::Result<HeadlessSonar> {
    let sonar = SonarLoop::new(
        SimulationParams::default(),
        VirtualScheduler::new(),
        SeededRandom::new(config.seed),
        SynthAudio::new(config.sample_rate),
    )
    .context("building sonar loop")?;
    Ok(sonar)
}

/// Replays scripted toggle presses and samples frames as time moves forward.
pub struct Timeline {
    toggles: VecDeque<Millis>,
    frame_interval_ms: Millis,
    next_frame: Millis,
    frames: Vec<SonarSnapshot>,
    max_objects_seen: usize,
}

impl Timeline {
    pub fn new(config: &WorkflowConfig) -> Self {
        Self {
            toggles: config.toggle_schedule().into(),
            frame_interval_ms: config.frame_interval_ms.max(1),
            next_frame: 0,
            frames: Vec::new(),
            max_objects_seen: 0,
        }
    }

    /// Advances `sonar` to `now`, pressing toggles and capturing frames in
    /// time order. A toggle and a frame at the same instant: toggle first.
    pub fn step(&mut self, sonar: &mut HeadlessSonar, now: Millis) {
        loop {
            let toggle = self.toggles.front().copied().filter(|at| *at <= now);
            let frame = Some(self.next_frame).filter(|at| *at <= now);
            match (toggle, frame) {
                (Some(at), Some(frame_at)) if at <= frame_at => self.press(sonar, at),
                (Some(at), None) => self.press(sonar, at),
                (_, Some(frame_at)) => self.capture(sonar, frame_at),
                (None, None) => break,
            }
        }
        sonar.advance_to(now);
    }

    fn press(&mut self, sonar: &mut HeadlessSonar, at: Millis) {
        self.toggles.pop_front();
        sonar.advance_to(at);
        sonar.set_active(!sonar.is_active());
    }

    fn capture(&mut self, sonar: &mut HeadlessSonar, at: Millis) {
        sonar.advance_to(at);
        let snapshot = sonar.snapshot();
        self.max_objects_seen = self.max_objects_seen.max(snapshot.objects.len());
        self.frames.push(snapshot);
        self.next_frame = at + self.frame_interval_ms;
    }

    pub fn finish(self, seed: u64, sonar: &HeadlessSonar) -> RunSummary {
        let final_snapshot = sonar.snapshot();
        RunSummary {
            seed,
            elapsed_ms: sonar.now(),
            metrics: sonar.metrics(),
            max_objects_seen: self.max_objects_seen.max(final_snapshot.objects.len()),
            pings: sonar.audio().pings(),
            echoes: sonar.audio().echoes(),
            final_snapshot,
            frames: self.frames,
        }
    }
}

/// Offline driver: runs the whole workflow in virtual time.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<RunSummary> {
        let mut sonar = build_sonar(&self.config)?;
        let mut timeline = Timeline::new(&self.config);
        timeline.step(&mut sonar, self.config.duration_ms);

        let summary = timeline.finish(self.config.seed, &sonar);
        info!(
            "offline run seed {} -> pulses {}, objects spawned {}, evicted {}, expired {}",
            summary.seed,
            summary.metrics.pulses_emitted,
            summary.metrics.objects_spawned,
            summary.metrics.objects_evicted,
            summary.metrics.objects_expired
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_executes_workflow() {
        let cfg = WorkflowConfig::from_args(1, 20_000, vec![0], 500).unwrap();
        let summary = Runner::new(cfg).execute().unwrap();

        assert_eq!(summary.metrics.pulses_emitted, 11);
        assert_eq!(summary.pings, 11);
        assert_eq!(summary.echoes + 1, summary.pings);
        assert_eq!(summary.frames.len(), 41);
        assert_eq!(summary.final_snapshot.sweep_angle, 252.0);
        assert!(summary.max_objects_seen <= 16);
        assert!(summary.frames.iter().all(|frame| frame.objects.len() <= 16));
    }

    #[test]
    fn stop_toggle_halts_emission() {
        let cfg = WorkflowConfig::from_args(5, 12_000, vec![0, 5_000], 1_000).unwrap();
        let summary = Runner::new(cfg).execute().unwrap();

        assert_eq!(summary.metrics.pulses_emitted, 3);
        assert!(!summary.final_snapshot.active);
        let stopped: Vec<_> = summary
            .frames
            .iter()
            .filter(|frame| frame.now >= 5_000)
            .collect();
        assert!(stopped.iter().all(|frame| !frame.active));
        assert!(stopped
            .windows(2)
            .all(|pair| pair[0].sweep_angle == pair[1].sweep_angle));
        assert!(summary.final_snapshot.pulses.is_empty());
    }

    #[test]
    fn frames_capture_post_toggle_state() {
        let cfg = WorkflowConfig::from_args(2, 2_000, vec![1_000], 500).unwrap();
        let summary = Runner::new(cfg).execute().unwrap();
        let states: Vec<(Millis, bool, u64)> = summary
            .frames
            .iter()
            .map(|frame| (frame.now, frame.active, frame.pulse_count))
            .collect();
        assert_eq!(
            states,
            vec![
                (0, false, 0),
                (500, false, 0),
                (1_000, true, 1),
                (1_500, true, 1),
                (2_000, true, 1),
            ]
        );
    }

    #[test]
    fn same_seed_same_run() {
        let cfg = WorkflowConfig::from_args(11, 15_000, vec![0, 7_000, 9_000], 250).unwrap();
        let a = Runner::new(cfg.clone()).execute().unwrap();
        let b = Runner::new(cfg).execute().unwrap();
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.metrics, b.metrics);
    }
}
