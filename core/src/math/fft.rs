use num_complex::Complex32;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps the `rustfft` planner for reuse.
pub struct FftHelper {
    fft: Arc<dyn Fft<f32>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of a real signal, zero-padded or truncated to the plan size.
    pub fn forward(&self, input: &[f32]) -> Vec<Complex32> {
        let mut buffer: Vec<Complex32> = input
            .iter()
            .take(self.size)
            .map(|&value| Complex32::new(value, 0.0))
            .collect();
        buffer.resize(self.size, Complex32::zero());
        self.fft.process(&mut buffer);
        buffer
    }

    /// Frequency of the strongest bin below Nyquist.
    pub fn dominant_frequency(&self, input: &[f32], sample_rate: u32) -> f32 {
        let spectrum = self.forward(input);
        let half = (self.size / 2).max(1);
        let (bin, _) = spectrum
            .iter()
            .take(half)
            .enumerate()
            .skip(1)
            .fold((0usize, 0.0f32), |best, (idx, c)| {
                let magnitude = c.norm();
                if magnitude > best.1 {
                    (idx, magnitude)
                } else {
                    best
                }
            });
        bin as f32 * sample_rate as f32 / self.size as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine_wave(length: usize, frequency: f32, sample_rate: u32) -> Vec<f32> {
        (0..length)
            .map(|i| (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn fft_helper_returns_same_length() {
        let helper = FftHelper::new(4);
        let output = helper.forward(&[1.0, 0.0, -1.0, 0.0]);
        assert_eq!(output.len(), 4);
    }

    #[test]
    fn dominant_frequency_finds_pure_tone() {
        let sample_rate = 8_000;
        let helper = FftHelper::new(800);
        let tone = sine_wave(800, 1_000.0, sample_rate);
        let peak = helper.dominant_frequency(&tone, sample_rate);
        assert!((peak - 1_000.0).abs() <= 10.0, "peak at {peak}");
    }
}
