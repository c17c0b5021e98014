pub mod sink;
pub mod synth;

pub use sink::{CueSummary, SynthAudio};
pub use synth::{ChirpProfile, ChirpSynth, ECHO_CHIRP, PING_CHIRP};

use crate::prelude::SonarResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CueKind {
    Ping,
    Echo,
}

/// Fire-and-forget audio output for the sonar loop.
///
/// Errors stay with the caller's side effect; the loop logs them and keeps
/// its state untouched.
pub trait AudioCue {
    fn ping(&mut self) -> SonarResult<()>;
    fn echo(&mut self) -> SonarResult<()>;
}

/// Discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioCue for SilentAudio {
    fn ping(&mut self) -> SonarResult<()> {
        Ok(())
    }

    fn echo(&mut self) -> SonarResult<()> {
        Ok(())
    }
}
