use serde::{Deserialize, Serialize};
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<SonarMetrics>,
}

/// Lifetime counters of one sonar loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SonarMetrics {
    pub pulses_emitted: u64,
    pub pulses_expired: u64,
    pub objects_spawned: u64,
    pub objects_evicted: u64,
    pub objects_expired: u64,
    pub echoes: u64,
    pub audio_errors: u64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SonarMetrics::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut SonarMetrics)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_pulse(&self) {
        self.update(|m| m.pulses_emitted += 1);
    }

    pub fn record_pulse_expired(&self) {
        self.update(|m| m.pulses_expired += 1);
    }

    pub fn record_spawn(&self, evicted: usize) {
        self.update(|m| {
            m.objects_spawned += 1;
            m.objects_evicted += evicted as u64;
        });
    }

    pub fn record_expired(&self, count: usize) {
        self.update(|m| m.objects_expired += count as u64);
    }

    pub fn record_echo(&self) {
        self.update(|m| m.echoes += 1);
    }

    pub fn record_audio_error(&self) {
        self.update(|m| m.audio_errors += 1);
    }

    pub fn snapshot(&self) -> SonarMetrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            SonarMetrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_records_evictions() {
        let metrics = MetricsRecorder::new();
        metrics.record_spawn(0);
        metrics.record_spawn(1);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.objects_spawned, 2);
        assert_eq!(snapshot.objects_evicted, 1);
    }
}
