// AMQP Connection Setup

use crate::error::to_publish_error;
use jobgate_core::port::PublishError;
use lapin::{Connection, ConnectionProperties};
use tracing::info;

const CONNECTION_NAME: &str = "jobgate";

/// Open the long-lived broker connection
pub async fn connect(uri: &str) -> Result<Connection, PublishError> {
    info!(uri = %redact_uri(uri), "Connecting to AMQP broker");

    let properties = ConnectionProperties::default().with_connection_name(CONNECTION_NAME.into());

    Connection::connect(uri, properties)
        .await
        .map_err(to_publish_error)
}

/// Strip user info from a broker URI so it can be logged.
pub fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };

    // Only the authority part may carry credentials.
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://***@{}", scheme, &rest[at + 1..]),
        None => uri.to_string(),
    }
}
