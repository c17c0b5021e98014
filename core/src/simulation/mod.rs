pub mod buffer;
pub mod engine;
pub mod tasks;

pub use buffer::DetectionBuffer;
pub use engine::SonarLoop;
pub use tasks::SonarTask;
