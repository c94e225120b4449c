// Port Layer - Interfaces for external dependencies

pub mod memory_publisher; // For deterministic testing
pub mod publisher;

// Re-exports
pub use memory_publisher::{InMemoryPublisher, PublishedMessage, PublisherMode};
pub use publisher::{PublishError, Publisher};
