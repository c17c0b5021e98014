//! Simulation core for the echolocation sonar display.
//!
//! The sonar loop is a single-threaded state machine driven by a scheduler
//! capability: periodic pulse emission, a faster sweep timer, one-shot
//! spawn/expiry timers and an unconditional janitor. Time, randomness and
//! the audio device are injected so the loop replays deterministically.

pub mod audio;
pub mod interface;
pub mod math;
pub mod prelude;
pub mod scheduler;
pub mod simulation;
pub mod telemetry;

pub use prelude::{Millis, SimulationParams, SonarError, SonarResult, Span};
pub use simulation::{SonarLoop, SonarTask};
