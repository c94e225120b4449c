// Domain Layer - Pure business logic and entities

pub mod credential;
pub mod error;
pub mod exchange;
pub mod submission;

// Re-exports
pub use credential::CredentialSet;
pub use error::DomainError;
pub use exchange::{ExchangeKind, ExchangeTarget};
pub use submission::JobSubmission;
