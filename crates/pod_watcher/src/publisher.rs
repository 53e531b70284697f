use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::PodEvent;
use tracing::info;

use crate::WatchError;

pub const DEFAULT_REFLECTOR_URL: &str = "http://podvis.default:8001/";

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: &PodEvent) -> Result<(), WatchError>;
}

/// POSTs each notification as JSON to the reflector, which rebroadcasts it on
/// the push stream.
pub struct ReflectorPublisher {
    http: Client,
    reflector_url: String,
}

impl ReflectorPublisher {
    pub fn new(reflector_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            reflector_url: reflector_url.into(),
        }
    }
}

impl Default for ReflectorPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_REFLECTOR_URL)
    }
}

#[async_trait]
impl NotificationSink for ReflectorPublisher {
    async fn publish(&self, event: &PodEvent) -> Result<(), WatchError> {
        let response = self
            .http
            .post(&self.reflector_url)
            .json(event)
            .send()
            .await
            .map_err(|source| WatchError::Publish {
                url: self.reflector_url.clone(),
                source,
            })?;
        let status = response.status();
        info!(pod = %event.pod_name, %status, "pod event post status");

        if !status.is_success() {
            return Err(WatchError::Rejected {
                url: self.reflector_url.clone(),
                status,
            });
        }
        Ok(())
    }
}
