use crate::workflow::config::WorkflowConfig;
use crate::workflow::runner::{build_sonar, RunSummary, Timeline};
use anyhow::Context;
use log::info;
use sonarcore::prelude::SWEEP_INTERVAL_MS;
use sonarcore::Millis;
use std::time::Duration;
use tokio::signal;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Drives the loop from the wall clock until the duration elapses or Ctrl+C.
pub async fn run_realtime(config: &WorkflowConfig) -> anyhow::Result<RunSummary> {
    let mut sonar = build_sonar(config)?;
    let mut timeline = Timeline::new(config);
    let started = Instant::now();
    let mut ticker = time::interval(Duration::from_millis(SWEEP_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut next_status: Millis = 1_000;

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let elapsed = (started.elapsed().as_millis() as Millis).min(config.duration_ms);
                timeline.step(&mut sonar, elapsed);
                if elapsed >= next_status {
                    let snapshot = sonar.snapshot();
                    info!(
                        "{} ms {} pulses {} objects {} sweep {:.0}",
                        elapsed,
                        snapshot.status_label(),
                        snapshot.pulse_counter_label(),
                        snapshot.objects.len(),
                        snapshot.sweep_angle
                    );
                    next_status = elapsed + 1_000;
                }
                if elapsed >= config.duration_ms {
                    break;
                }
            }
            result = &mut ctrl_c => {
                result.context("awaiting Ctrl+C")?;
                info!("interrupted at {} ms", sonar.now());
                break;
            }
        }
    }

    Ok(timeline.finish(config.seed, &sonar))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn realtime_run_stops_at_duration() {
        let cfg = WorkflowConfig::from_args(9, 150, vec![0], 50).unwrap();
        let summary = run_realtime(&cfg).await.unwrap();
        assert_eq!(summary.elapsed_ms, 150);
        assert_eq!(summary.metrics.pulses_emitted, 1);
        assert!(summary.final_snapshot.active);
        assert_eq!(summary.frames.len(), 4);
    }
}
