use crate::prelude::Millis;
use serde::{Deserialize, Serialize};

/// Simulated echo return with randomized placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub id: u64,
    /// Bearing in degrees, `[0, 360)`, clockwise from north.
    pub angle: f32,
    pub distance: f32,
    pub size: f32,
    pub created_at: Millis,
}

impl DetectedObject {
    pub fn new(id: u64, angle: f32, distance: f32, size: f32, created_at: Millis) -> Self {
        Self {
            id,
            angle,
            distance,
            size,
            created_at,
        }
    }

    pub fn age(&self, now: Millis) -> Millis {
        now.saturating_sub(self.created_at)
    }

    pub fn is_expired(&self, now: Millis, lifetime: Millis) -> bool {
        self.age(now) >= lifetime
    }
}

/// Display opacity: fades linearly from 1 to 0 over the object lifetime.
pub fn opacity_of(object: &DetectedObject, now: Millis, lifetime: Millis) -> f32 {
    if lifetime == 0 {
        return 0.0;
    }
    (1.0 - object.age(now) as f32 / lifetime as f32).max(0.0)
}
