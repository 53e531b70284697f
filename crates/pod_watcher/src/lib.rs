use reqwest::StatusCode;
use thiserror::Error;

mod publisher;
mod states;
mod watcher;

pub use publisher::{NotificationSink, ReflectorPublisher, DEFAULT_REFLECTOR_URL};
pub use states::{container_states, pod_event};
pub use watcher::{notification, PodWatcher, PodWatcherConfig};

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("kubernetes client error: {0}")]
    Kube(#[from] kube::Error),
    #[error("failed to post to {url}: {source}")]
    Publish {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} rejected pod event with {status}")]
    Rejected { url: String, status: StatusCode },
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
