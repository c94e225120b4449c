// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid credential list: {0}")]
    InvalidCredentials(String),

    #[error("Invalid exchange target: {0}")]
    InvalidExchange(String),

    #[error("Invalid job body: {0}")]
    InvalidBody(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
