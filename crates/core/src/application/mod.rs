// Application Layer - Use Cases

pub mod job_intake;

// Re-exports
pub use job_intake::{JobIntakeService, DEFAULT_PUBLISH_TIMEOUT};
