use crate::interface::detection::{opacity_of, DetectedObject};
use crate::interface::pulse::Pulse;
use crate::prelude::Millis;
use serde::{Deserialize, Serialize};

/// Labelled range rings on the scope, in metres.
pub const DISTANCE_RINGS_M: [f32; 4] = [10.0, 25.0, 40.0, 55.0];
pub const CARRIER_KHZ: u32 = 42;
pub const ECHO_BAR_COUNT: usize = 8;

/// Read-only view of the loop handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SonarSnapshot {
    pub now: Millis,
    pub active: bool,
    pub pulses: Vec<Pulse>,
    pub objects: Vec<DetectedObject>,
    pub sweep_angle: f32,
    pub pulse_count: u64,
    pub echo_active: bool,
    pub pulse_lifetime_ms: Millis,
    pub object_lifetime_ms: Millis,
}

impl SonarSnapshot {
    pub fn status_label(&self) -> &'static str {
        if self.active {
            "SCANNING"
        } else {
            "STANDBY"
        }
    }

    pub fn pulse_counter_label(&self) -> String {
        format!("{:04}", self.pulse_count)
    }

    /// Bar `i` lights once more than `2 * i` objects are on screen.
    pub fn echo_bars(&self) -> [bool; ECHO_BAR_COUNT] {
        let mut bars = [false; ECHO_BAR_COUNT];
        for (idx, bar) in bars.iter_mut().enumerate() {
            *bar = self.objects.len() > idx * 2;
        }
        bars
    }

    pub fn object_opacity(&self, object: &DetectedObject) -> f32 {
        opacity_of(object, self.now, self.object_lifetime_ms)
    }

    pub fn pulse_progress(&self, pulse: &Pulse) -> f32 {
        pulse.progress(self.now, self.pulse_lifetime_ms)
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_objects(count: usize) -> SonarSnapshot {
        SonarSnapshot {
            now: 0,
            active: true,
            pulses: Vec::new(),
            objects: (0..count as u64)
                .map(|id| DetectedObject::new(id, 0.0, 20.0, 3.0, 0))
                .collect(),
            sweep_angle: 0.0,
            pulse_count: 7,
            echo_active: false,
            pulse_lifetime_ms: 2_500,
            object_lifetime_ms: 8_000,
        }
    }

    #[test]
    fn labels_follow_state() {
        let mut snapshot = snapshot_with_objects(0);
        assert_eq!(snapshot.status_label(), "SCANNING");
        assert_eq!(snapshot.pulse_counter_label(), "0007");
        snapshot.active = false;
        assert_eq!(snapshot.status_label(), "STANDBY");
    }

    #[test]
    fn echo_bars_light_every_two_objects() {
        assert_eq!(snapshot_with_objects(0).echo_bars(), [false; ECHO_BAR_COUNT]);
        let bars = snapshot_with_objects(5).echo_bars();
        assert_eq!(bars.iter().filter(|lit| **lit).count(), 3);
        assert!(snapshot_with_objects(16).echo_bars().iter().all(|lit| *lit));
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let line = snapshot_with_objects(1).to_json_line().unwrap();
        assert!(line.contains("\"pulse_count\":7"));
        assert!(!line.contains('\n'));
    }
}
