use futures::StreamExt;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::Api,
    runtime::watcher::{self, Event as WatcherEvent},
    Client,
};
use shared::protocol::{PodEvent, PodEventType};
use tracing::{debug, info, warn};

use crate::{pod_event, NotificationSink, WatchError};

#[derive(Debug, Clone, Default)]
pub struct PodWatcherConfig {
    pub namespace: Option<String>,
    pub label_selector: Option<String>,
}

impl PodWatcherConfig {
    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }

    pub fn labels(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = Some(selector.into());
        self
    }
}

pub struct PodWatcher<S: NotificationSink> {
    client: Client,
    config: PodWatcherConfig,
    sink: S,
}

impl<S: NotificationSink> PodWatcher<S> {
    pub fn new(client: Client, config: PodWatcherConfig, sink: S) -> Self {
        Self {
            client,
            config,
            sink,
        }
    }

    pub async fn try_default(config: PodWatcherConfig, sink: S) -> Result<Self, WatchError> {
        let client = Client::try_default().await?;
        Ok(Self::new(client, config, sink))
    }

    pub async fn run(self) -> Result<(), WatchError> {
        let api: Api<Pod> = match &self.config.namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };

        let mut watcher_config = watcher::Config::default();
        if let Some(labels) = &self.config.label_selector {
            watcher_config = watcher_config.labels(labels);
        }

        let mut stream = watcher::watcher(api, watcher_config).boxed();
        info!(
            namespace = ?self.config.namespace,
            selector = ?self.config.label_selector,
            "pod watcher started"
        );

        while let Some(event) = stream.next().await {
            match event {
                Ok(event) => {
                    if let Some(notification) = notification(&event) {
                        self.forward(notification).await;
                    }
                }
                Err(error) => warn!(%error, "pod watcher error"),
            }
        }

        info!("pod watch stream ended");
        Ok(())
    }

    async fn forward(&self, event: PodEvent) {
        info!(
            pod = %event.pod_name,
            event_type = ?event.event_type,
            states = ?event.container_states,
            "pod event"
        );
        if let Err(error) = self.sink.publish(&event).await {
            warn!(pod = %event.pod_name, %error, "failed to publish pod event");
        }
    }
}

/// Init markers and pods without container statuses map to nothing.
pub fn notification(event: &WatcherEvent<Pod>) -> Option<PodEvent> {
    let (pod, event_type) = match event {
        WatcherEvent::InitApply(pod) => (pod, PodEventType::Added),
        WatcherEvent::Apply(pod) => (pod, PodEventType::Updated),
        WatcherEvent::Delete(pod) => (pod, PodEventType::Deleted),
        WatcherEvent::Init | WatcherEvent::InitDone => return None,
    };

    let notification = pod_event(pod, event_type);
    if notification.is_none() {
        debug!(pod = ?pod.metadata.name, "no container status information in event");
    }
    notification
}
