// Exchange Target Domain Model

use crate::domain::error::{DomainError, Result};
use std::fmt;

/// Broker exchange type. Only direct routing is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExchangeKind {
    #[default]
    Direct,
}

impl ExchangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeKind::Direct => "direct",
        }
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed (exchange, routing key) pair every job is published to.
///
/// Configured once at startup and constant for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeTarget {
    pub exchange: String,
    pub routing_key: String,
    pub kind: ExchangeKind,
}

impl ExchangeTarget {
    /// Create a direct-exchange target.
    ///
    /// The routing key may be empty; the exchange name may not (the
    /// broker's nameless default exchange cannot be declared).
    pub fn new(exchange: impl Into<String>, routing_key: impl Into<String>) -> Result<Self> {
        let exchange = exchange.into();
        if exchange.trim().is_empty() {
            return Err(DomainError::InvalidExchange(
                "exchange name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            exchange,
            routing_key: routing_key.into(),
            kind: ExchangeKind::Direct,
        })
    }
}
