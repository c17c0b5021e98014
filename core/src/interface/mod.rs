pub mod detection;
pub mod pulse;
pub mod snapshot;

pub use detection::{opacity_of, DetectedObject};
pub use pulse::Pulse;
pub use snapshot::{SonarSnapshot, CARRIER_KHZ, DISTANCE_RINGS_M, ECHO_BAR_COUNT};
