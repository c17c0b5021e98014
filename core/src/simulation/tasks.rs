use serde::{Deserialize, Serialize};

/// Work items queued on the scheduler by the sonar loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SonarTask {
    /// Periodic pulse emission while active.
    Emit,
    /// Periodic sweep advance while active.
    SweepTick,
    /// Unconditional object expiry.
    Janitor,
    SpawnObject,
    ExpirePulse(u64),
    EchoReturn,
    EchoFade,
}
