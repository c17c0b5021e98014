use crate::prelude::{SonarError, SonarResult};
use std::f32::consts::PI;

/// Envelope of one chirp: exponential frequency and gain ramps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChirpProfile {
    pub start_hz: f32,
    pub end_hz: f32,
    pub sweep_s: f32,
    pub gain_start: f32,
    pub gain_end: f32,
    pub duration_s: f32,
    pub lowpass_hz: Option<f32>,
}

pub const PING_CHIRP: ChirpProfile = ChirpProfile {
    start_hz: 1_200.0,
    end_hz: 800.0,
    sweep_s: 0.1,
    gain_start: 0.3,
    gain_end: 0.01,
    duration_s: 0.15,
    lowpass_hz: None,
};

pub const ECHO_CHIRP: ChirpProfile = ChirpProfile {
    start_hz: 600.0,
    end_hz: 400.0,
    sweep_s: 0.2,
    gain_start: 0.15,
    gain_end: 0.01,
    duration_s: 0.3,
    lowpass_hz: Some(600.0),
};

const MIN_SAMPLE_RATE: u32 = 8_000;

/// Renders chirps to mono PCM.
#[derive(Debug, Clone)]
pub struct ChirpSynth {
    sample_rate: u32,
}

impl ChirpSynth {
    pub fn new(sample_rate: u32) -> SonarResult<Self> {
        if sample_rate < MIN_SAMPLE_RATE {
            return Err(SonarError::AudioUnavailable(format!(
                "sample rate {sample_rate} Hz below {MIN_SAMPLE_RATE} Hz"
            )));
        }
        Ok(Self { sample_rate })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn render(&self, profile: &ChirpProfile) -> Vec<f32> {
        let rate = self.sample_rate as f32;
        let count = (profile.duration_s * rate).round() as usize;
        let mut samples = Vec::with_capacity(count);
        let mut phase = 0.0f32;

        // One-pole low-pass state.
        let alpha = profile.lowpass_hz.map(|cutoff| {
            let dt = 1.0 / rate;
            let rc = 1.0 / (2.0 * PI * cutoff);
            dt / (rc + dt)
        });
        let mut filtered = 0.0f32;

        for idx in 0..count {
            let t = idx as f32 / rate;
            let frequency = exp_ramp(profile.start_hz, profile.end_hz, t / profile.sweep_s);
            let gain = exp_ramp(profile.gain_start, profile.gain_end, t / profile.duration_s);
            let raw = phase.sin() * gain;
            let value = match alpha {
                Some(alpha) => {
                    filtered += alpha * (raw - filtered);
                    filtered
                }
                None => raw,
            };
            samples.push(value);
            phase = (phase + 2.0 * PI * frequency / rate) % (2.0 * PI);
        }

        samples
    }
}

fn exp_ramp(from: f32, to: f32, fraction: f32) -> f32 {
    from * (to / from).powf(fraction.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{FftHelper, StatsHelper};

    #[test]
    fn low_sample_rate_is_unavailable() {
        assert!(matches!(
            ChirpSynth::new(1_000),
            Err(SonarError::AudioUnavailable(_))
        ));
    }

    #[test]
    fn ping_spans_its_duration_and_decays() {
        let synth = ChirpSynth::new(48_000).unwrap();
        let samples = synth.render(&PING_CHIRP);
        assert_eq!(samples.len(), 7_200);
        let head = StatsHelper::rms(&samples[..1_000]);
        let tail = StatsHelper::rms(&samples[samples.len() - 1_000..]);
        assert!(head > tail * 4.0, "head {head} tail {tail}");
        assert!(StatsHelper::peak(&samples) <= PING_CHIRP.gain_start + 1e-3);
    }

    #[test]
    fn ping_energy_sits_in_the_sweep_band() {
        let synth = ChirpSynth::new(48_000).unwrap();
        let samples = synth.render(&PING_CHIRP);
        let fft = FftHelper::new(samples.len());
        let peak = fft.dominant_frequency(&samples, synth.sample_rate());
        assert!((780.0..=1_220.0).contains(&peak), "peak at {peak}");
    }

    #[test]
    fn echo_is_quieter_than_ping() {
        let synth = ChirpSynth::new(22_050).unwrap();
        let ping = synth.render(&PING_CHIRP);
        let echo = synth.render(&ECHO_CHIRP);
        assert!(StatsHelper::peak(&echo) < StatsHelper::peak(&ping));
    }
}
