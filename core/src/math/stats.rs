pub struct StatsHelper;

impl StatsHelper {
    pub fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f32).sqrt()
    }

    pub fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0, |acc, &v| acc.max(v.abs()))
    }
}
