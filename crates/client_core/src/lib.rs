use futures::StreamExt;
use reqwest::{header::ACCEPT, Client, StatusCode};
use serde::Deserialize;
use shared::{domain::ContainerStates, protocol::PodEvent};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

mod render;
mod sse;
mod table;
mod target;

pub use render::render;
pub use sse::{SseDecoder, SseFrame};
pub use table::PodTable;
pub use target::{HtmlFileTarget, MemoryTarget, RenderTarget, StdoutTarget};

pub const DEFAULT_EVENTS_PATH: &str = "/events/";

// Only the fields the table needs. Whatever else a publisher adds
// (`numPods`, `eventType`, ...) is ignored, whatever its shape.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    pod_name: String,
    container_states: ContainerStates,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid events url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with {status}")]
    UnexpectedStatus { url: Url, status: StatusCode },
    #[error("event stream failed: {0}")]
    Stream(#[source] reqwest::Error),
    #[error("malformed pod event: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("failed to render pod table: {0}")]
    Render(#[from] std::io::Error),
}

/// Subscribes to the pod event stream and re-renders the whole table into
/// `target` after every event.
pub struct PodStatusClient<T: RenderTarget> {
    http: Client,
    events_url: Url,
    table: PodTable,
    target: T,
}

impl<T: RenderTarget> PodStatusClient<T> {
    pub fn new(server_url: &str, events_path: &str, target: T) -> Result<Self, ClientError> {
        let events_url = Url::parse(server_url)?.join(events_path)?;
        Ok(Self {
            http: Client::new(),
            events_url,
            table: PodTable::new(),
            target,
        })
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }

    pub fn table(&self) -> &PodTable {
        &self.table
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    /// Consumes the stream until the server closes it. Malformed payloads are
    /// logged and skipped; the connection is not re-established.
    pub async fn run(&mut self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(self.events_url.clone())
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|source| ClientError::Connect {
                url: self.events_url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                url: self.events_url.clone(),
                status,
            });
        }
        info!(url = %self.events_url, "subscribed to pod events");

        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(ClientError::Stream)?;
            for frame in decoder.push(&chunk) {
                if !frame.is_message() {
                    debug!(event = %frame.event, "ignoring non-message event");
                    continue;
                }
                match self.handle_message(&frame.data) {
                    Ok(()) => {}
                    Err(ClientError::InvalidPayload(error)) => {
                        warn!(%error, "dropping malformed pod event");
                    }
                    Err(error) => return Err(error),
                }
            }
        }

        info!(url = %self.events_url, "pod event stream closed");
        Ok(())
    }

    pub fn handle_message(&mut self, data: &str) -> Result<(), ClientError> {
        debug!(data, "got pod event");
        let payload: Payload = serde_json::from_str(data)?;
        self.handle_event(PodEvent::new(payload.pod_name, payload.container_states))
    }

    pub fn handle_event(&mut self, event: PodEvent) -> Result<(), ClientError> {
        let pod = event.pod_name.clone();
        let containers = event.container_states.len();
        self.table.apply(event);
        self.target.replace(&render(&self.table))?;
        debug!(pod = %pod, containers, pods = self.table.len(), "pod table redrawn");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
