use crate::prelude::Millis;
use serde::{Deserialize, Serialize};

/// A transient emission event; lives for the pulse lifetime after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pulse {
    pub id: u64,
    pub created_at: Millis,
}

impl Pulse {
    pub fn new(id: u64, created_at: Millis) -> Self {
        Self { id, created_at }
    }

    pub fn age(&self, now: Millis) -> Millis {
        now.saturating_sub(self.created_at)
    }

    /// How far the pulse ring has travelled outward, in `[0, 1]`.
    pub fn progress(&self, now: Millis, lifetime: Millis) -> f32 {
        if lifetime == 0 {
            return 1.0;
        }
        (self.age(now) as f32 / lifetime as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        let pulse = Pulse::new(0, 1_000);
        assert_eq!(pulse.progress(500, 2_500), 0.0);
        assert_eq!(pulse.progress(2_250, 2_500), 0.5);
        assert_eq!(pulse.progress(9_000, 2_500), 1.0);
    }
}
