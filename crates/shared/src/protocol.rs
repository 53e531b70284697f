use serde::{Deserialize, Serialize};

use crate::domain::ContainerStates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PodEventType {
    Added,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodEvent {
    pub pod_name: String,
    pub container_states: ContainerStates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_pods: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<PodEventType>,
}

impl PodEvent {
    pub fn new(pod_name: impl Into<String>, container_states: ContainerStates) -> Self {
        Self {
            pod_name: pod_name.into(),
            container_states,
            num_pods: None,
            event_type: None,
        }
    }
}
