// Jobgate Infrastructure - AMQP Adapter
// Implements: Publisher (one connection + one shared channel)

mod connection;
mod error;
mod publisher;

pub use connection::{connect, redact_uri};
pub use error::to_publish_error;
pub use publisher::AmqpPublisher;
