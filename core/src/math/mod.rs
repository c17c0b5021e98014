pub mod fft;
pub mod random;
pub mod stats;

pub use fft::FftHelper;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use stats::StatsHelper;
