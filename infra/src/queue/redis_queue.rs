//! Redis list backed task queue

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use us_core::services::notification::TaskQueue;
use us_shared::config::QueueConfig;

use crate::InfrastructureError;

const CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_RETRY_DELAY_MS: u64 = 100;

/// Task queue on Redis lists
///
/// Publishing shares one managed connection. Blocking receives get their
/// own so a pending `BRPOP` never stalls publishers. Both reconnect on their
/// own after the server drops them; only the command in flight fails.
pub struct RedisTaskQueue {
    publisher: ConnectionManager,
    receiver: Mutex<ConnectionManager>,
    connect_timeout: Duration,
}

impl RedisTaskQueue {
    /// Connect both the publishing and the receiving connection
    pub async fn new(config: &QueueConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Connecting task queue");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connect_timeout = Duration::from_secs(config.connection_timeout);
        let publisher = Self::connect_with_retry(&client, connect_timeout).await?;
        let receiver = Self::connect_with_retry(&client, connect_timeout).await?;

        info!("Task queue connected");
        Ok(Self {
            publisher,
            receiver: Mutex::new(receiver),
            connect_timeout,
        })
    }

    /// Open a managed connection, backing off exponentially between attempts
    async fn connect_with_retry(
        client: &Client,
        timeout: Duration,
    ) -> Result<ConnectionManager, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = CONNECT_RETRY_DELAY_MS;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Connecting to Redis");

            let result = tokio::time::timeout(timeout, ConnectionManager::new(client.clone())).await;
            match result {
                Ok(Ok(connection)) => return Ok(connection),
                Ok(Err(e)) if attempts >= CONNECT_ATTEMPTS => {
                    error!(attempts, error = %e, "Failed to connect to Redis");
                    return Err(InfrastructureError::Queue(e));
                }
                Err(_) if attempts >= CONNECT_ATTEMPTS => {
                    error!(attempts, "Timed out connecting to Redis");
                    return Err(InfrastructureError::Config(
                        "Timed out connecting to Redis".to_string(),
                    ));
                }
                Ok(Err(e)) => {
                    warn!(attempt = attempts, error = %e, "Redis connection failed, retrying in {}ms", delay);
                }
                Err(_) => {
                    warn!(attempt = attempts, "Redis connection timed out, retrying in {}ms", delay);
                }
            }

            sleep(Duration::from_millis(delay)).await;
            delay = (delay * 2).min(5000);
        }
    }

    /// Check that the server answers `PING`
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let mut conn = self.publisher.clone();
        let reply = tokio::time::timeout(
            self.connect_timeout,
            redis::cmd("PING").query_async::<_, String>(&mut conn),
        )
        .await
        .map_err(|_| InfrastructureError::Config("Redis PING timed out".to_string()))??;
        Ok(reply == "PONG")
    }

    /// Number of payloads waiting in a queue
    pub async fn queue_length(&self, queue: &str) -> Result<usize, InfrastructureError> {
        let mut conn = self.publisher.clone();
        Ok(conn.llen(queue).await?)
    }
}

#[async_trait]
impl TaskQueue for RedisTaskQueue {
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), String> {
        let mut conn = self.publisher.clone();
        let size = payload.len();
        tokio::time::timeout(self.connect_timeout, conn.lpush::<_, _, ()>(queue, payload))
            .await
            .map_err(|_| format!("LPUSH to {} timed out", queue))?
            .map_err(|e| e.to_string())?;

        debug!(queue, size, "Task published");
        Ok(())
    }

    async fn receive(&self, queue: &str, timeout: Duration) -> Result<Option<Vec<u8>>, String> {
        // BRPOP treats 0 as "wait forever"
        let wait = timeout.as_secs().max(1);
        let mut conn = self.receiver.lock().await;

        let popped: Option<(String, Vec<u8>)> = redis::cmd("BRPOP")
            .arg(queue)
            .arg(wait)
            .query_async(&mut *conn)
            .await
            .map_err(|e| {
                warn!(queue, error = %e, "BRPOP failed, connection will be re-established");
                e.to_string()
            })?;

        Ok(popped.map(|(_, payload)| payload))
    }
}

/// Hide credentials embedded in a connection URL
fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://****{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
