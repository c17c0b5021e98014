use crate::audio::synth::{ChirpProfile, ChirpSynth, ECHO_CHIRP, PING_CHIRP};
use crate::audio::{AudioCue, CueKind};
use crate::math::{FftHelper, StatsHelper};
use crate::prelude::{SonarError, SonarResult};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Summary of the most recently rendered cue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueSummary {
    pub kind: CueKind,
    pub samples: usize,
    pub rms: f32,
    pub peak_hz: f32,
}

/// Audio cue sink that renders each cue with a [`ChirpSynth`].
///
/// The synthesizer is acquired on first use and reused afterwards. A failed
/// acquisition is returned to the caller and retried on the next cue.
pub struct SynthAudio {
    sample_rate: u32,
    synth: Option<ChirpSynth>,
    acquisitions: usize,
    pings: u64,
    echoes: u64,
    last_cue: Option<CueSummary>,
    logger: LogManager,
}

impl SynthAudio {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            synth: None,
            acquisitions: 0,
            pings: 0,
            echoes: 0,
            last_cue: None,
            logger: LogManager::new("audio"),
        }
    }

    fn device(&mut self) -> SonarResult<&ChirpSynth> {
        if self.synth.is_none() {
            let synth = ChirpSynth::new(self.sample_rate)?;
            self.acquisitions += 1;
            self.logger
                .record(&format!("synth acquired at {} Hz", self.sample_rate));
            self.synth = Some(synth);
        }
        self.synth
            .as_ref()
            .ok_or_else(|| SonarError::AudioUnavailable("synth not acquired".into()))
    }

    fn play(&mut self, kind: CueKind, profile: &ChirpProfile) -> SonarResult<()> {
        let synth = self.device()?;
        let sample_rate = synth.sample_rate();
        let samples = synth.render(profile);
        let peak_hz = FftHelper::new(samples.len()).dominant_frequency(&samples, sample_rate);
        let summary = CueSummary {
            kind,
            samples: samples.len(),
            rms: StatsHelper::rms(&samples),
            peak_hz,
        };
        self.logger.trace(&format!(
            "{:?} rendered: {} samples, rms {:.4}, peak {:.0} Hz",
            kind, summary.samples, summary.rms, summary.peak_hz
        ));
        self.last_cue = Some(summary);
        Ok(())
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions
    }

    pub fn pings(&self) -> u64 {
        self.pings
    }

    pub fn echoes(&self) -> u64 {
        self.echoes
    }

    pub fn last_cue(&self) -> Option<CueSummary> {
        self.last_cue
    }
}

impl AudioCue for SynthAudio {
    fn ping(&mut self) -> SonarResult<()> {
        self.play(CueKind::Ping, &PING_CHIRP)?;
        self.pings += 1;
        Ok(())
    }

    fn echo(&mut self) -> SonarResult<()> {
        self.play(CueKind::Echo, &ECHO_CHIRP)?;
        self.echoes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synth_is_acquired_once() {
        let mut audio = SynthAudio::new(16_000);
        assert_eq!(audio.acquisitions(), 0);
        audio.ping().unwrap();
        audio.echo().unwrap();
        audio.ping().unwrap();
        assert_eq!(audio.acquisitions(), 1);
        assert_eq!(audio.pings(), 2);
        assert_eq!(audio.echoes(), 1);
        assert_eq!(audio.last_cue().map(|cue| cue.kind), Some(CueKind::Ping));
    }

    #[test]
    fn failed_acquisition_surfaces_error() {
        let mut audio = SynthAudio::new(0);
        assert!(audio.ping().is_err());
        assert_eq!(audio.acquisitions(), 0);
        assert_eq!(audio.pings(), 0);
    }
}
