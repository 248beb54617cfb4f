//! Redis-backed bill notifier

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{Client, RedisError};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use core_kernel::{DomainPort, PortError};
use domain_billing::{BillNotification, BillNotifier};

use crate::config::RedisNotifierConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);
const CONNECT_RETRIES: usize = 1;

/// Pushes bill notifications onto Redis lists
///
/// The client is built eagerly, which only validates the URL. The connection
/// manager is opened by the first notification and then shared by every
/// later one. If opening fails, the next notification tries again. Once
/// open, the manager re-dials by itself after the server drops the
/// connection; the command that saw the drop fails and later ones go
/// through the new connection.
pub struct RedisBillNotifier {
    client: Client,
    queues: Vec<String>,
    connection: OnceCell<ConnectionManager>,
}

impl RedisBillNotifier {
    /// Creates a notifier without connecting
    ///
    /// # Errors
    ///
    /// Returns `PortError::Internal` if the URL cannot be parsed
    pub fn new(config: RedisNotifierConfig) -> Result<Self, PortError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| PortError::internal_with_source("invalid redis url", e))?;

        Ok(Self {
            client,
            queues: config.queues,
            connection: OnceCell::new(),
        })
    }

    /// The lists each notification is pushed onto
    pub fn queues(&self) -> &[String] {
        &self.queues
    }

    /// Returns true once the shared connection has been opened
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    async fn connection(&self) -> Result<ConnectionManager, PortError> {
        let connection = self
            .connection
            .get_or_try_init(|| async {
                debug!("Opening redis connection");
                let config = ConnectionManagerConfig::new()
                    .set_number_of_retries(CONNECT_RETRIES)
                    .set_connection_timeout(CONNECT_TIMEOUT)
                    .set_response_timeout(RESPONSE_TIMEOUT);
                self.client
                    .get_connection_manager_with_config(config)
                    .await
                    .map_err(redis_to_port_error)
            })
            .await?;

        Ok(connection.clone())
    }
}

impl std::fmt::Debug for RedisBillNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBillNotifier")
            .field("queues", &self.queues)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl DomainPort for RedisBillNotifier {}

#[async_trait]
impl BillNotifier for RedisBillNotifier {
    #[instrument(skip(self, notification), fields(bill_uuid = %notification.bill.uuid, event = ?notification.event))]
    async fn notify(&self, notification: &BillNotification) -> Result<(), PortError> {
        let payload = encode_notification(notification)?;
        let mut connection = self.connection().await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for queue in &self.queues {
            pipe.rpush(queue, &payload).ignore();
        }
        let _: () = pipe
            .query_async(&mut connection)
            .await
            .map_err(redis_to_port_error)?;

        info!(
            bill_uuid = %notification.bill.uuid,
            queues = self.queues.len(),
            "Bill notification queued"
        );
        Ok(())
    }
}

/// Serializes a notification to the JSON payload placed on the queues
pub fn encode_notification(notification: &BillNotification) -> Result<String, PortError> {
    serde_json::to_string(notification)
        .map_err(|e| PortError::transformation(format!("cannot encode notification: {}", e)))
}

fn redis_to_port_error(error: RedisError) -> PortError {
    if error.is_io_error() || error.is_connection_refusal() || error.is_timeout() || error.is_connection_dropped() {
        PortError::Connection {
            message: format!("redis unavailable: {}", error),
            source: Some(Box::new(error)),
        }
    } else {
        PortError::internal_with_source("redis command failed", error)
    }
}
