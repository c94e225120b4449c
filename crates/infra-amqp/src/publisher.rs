// AMQP Publisher Implementation

use crate::connection;
use crate::error::to_publish_error;
use async_trait::async_trait;
use jobgate_core::domain::ExchangeKind;
use jobgate_core::port::{PublishError, Publisher};
use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection};
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const JSON_CONTENT_TYPE: &str = "application/json";
const REPLY_SUCCESS: u16 = 200;

/// Channel shared by every request, plus the exchanges already declared on it.
struct SharedChannel {
    channel: Channel,
    declared: HashSet<String>,
}

/// Publisher over one AMQP connection and one channel.
///
/// `lapin::Channel` is safe for concurrent use, so callers clone it and
/// publish without holding the lock. The mutex only guards replacing a
/// closed channel and the declared-exchange cache.
pub struct AmqpPublisher {
    connection: Connection,
    shared: Mutex<SharedChannel>,
}

impl AmqpPublisher {
    /// Connect to the broker and open the shared channel.
    pub async fn connect(uri: &str) -> Result<Self, PublishError> {
        let connection = connection::connect(uri).await?;
        Self::from_connection(connection).await
    }

    pub async fn from_connection(connection: Connection) -> Result<Self, PublishError> {
        let channel = connection
            .create_channel()
            .await
            .map_err(to_publish_error)?;

        info!(channel_id = channel.id(), "AMQP channel opened");

        Ok(Self {
            connection,
            shared: Mutex::new(SharedChannel {
                channel,
                declared: HashSet::new(),
            }),
        })
    }

    /// Close channel then connection (graceful shutdown).
    pub async fn close(&self) -> Result<(), PublishError> {
        let shared = self.shared.lock().await;
        if shared.channel.status().connected() {
            shared
                .channel
                .close(REPLY_SUCCESS, "shutdown")
                .await
                .map_err(to_publish_error)?;
        }
        if self.connection.status().connected() {
            self.connection
                .close(REPLY_SUCCESS, "shutdown")
                .await
                .map_err(to_publish_error)?;
        }
        info!("AMQP connection closed");
        Ok(())
    }

    /// Reopen the channel if the broker closed it. A dead connection is
    /// reported, not repaired.
    async fn ensure_open(&self, shared: &mut SharedChannel) -> Result<(), PublishError> {
        if shared.channel.status().connected() {
            return Ok(());
        }

        if !self.connection.status().connected() {
            return Err(PublishError::Connection(
                "AMQP connection is closed".to_string(),
            ));
        }

        warn!(
            old_channel_id = shared.channel.id(),
            "AMQP channel closed, opening a new one"
        );
        shared.channel = self
            .connection
            .create_channel()
            .await
            .map_err(to_publish_error)?;
        shared.declared.clear();
        Ok(())
    }

    async fn channel(&self) -> Result<Channel, PublishError> {
        let mut shared = self.shared.lock().await;
        self.ensure_open(&mut shared).await?;
        Ok(shared.channel.clone())
    }
}

fn to_lapin_kind(kind: ExchangeKind) -> lapin::ExchangeKind {
    match kind {
        ExchangeKind::Direct => lapin::ExchangeKind::Direct,
    }
}

#[async_trait]
impl Publisher for AmqpPublisher {
    async fn assert_exchange(&self, name: &str, kind: ExchangeKind) -> Result<(), PublishError> {
        let channel = {
            let mut shared = self.shared.lock().await;
            self.ensure_open(&mut shared).await?;
            if shared.declared.contains(name) {
                return Ok(());
            }
            shared.channel.clone()
        };

        channel
            .exchange_declare(
                name,
                to_lapin_kind(kind),
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(to_publish_error)?;

        debug!(exchange = name, kind = %kind, "Exchange declared");

        // Skip caching if the channel was swapped while declaring.
        let mut shared = self.shared.lock().await;
        if shared.channel.id() == channel.id() {
            shared.declared.insert(name.to_string());
        }
        Ok(())
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &[u8],
    ) -> Result<(), PublishError> {
        let channel = self.channel().await?;

        // Confirms are not enabled: success means the frame was handed to the
        // channel, not that the broker routed it.
        let _confirm = channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default().with_content_type(JSON_CONTENT_TYPE.into()),
            )
            .await
            .map_err(to_publish_error)?;

        Ok(())
    }
}
