use k8s_openapi::api::core::v1::{ContainerStatus, Pod};
use shared::{
    domain::{ContainerState, ContainerStates},
    protocol::{PodEvent, PodEventType},
};

/// `None` while the pod has no container status information yet.
pub fn container_states(pod: &Pod) -> Option<ContainerStates> {
    let statuses = pod.status.as_ref()?.container_statuses.as_ref()?;
    Some(
        statuses
            .iter()
            .map(|status| (status.name.clone(), container_state(status)))
            .collect(),
    )
}

fn container_state(status: &ContainerStatus) -> ContainerState {
    let Some(state) = status.state.as_ref() else {
        return ContainerState::from("waiting");
    };

    if state.running.is_some() {
        ContainerState::Running
    } else if state.terminated.is_some() {
        ContainerState::Terminated
    } else {
        state
            .waiting
            .as_ref()
            .and_then(|waiting| waiting.reason.as_deref())
            .map(ContainerState::from)
            .unwrap_or_else(|| ContainerState::from("waiting"))
    }
}

pub fn pod_event(pod: &Pod, event_type: PodEventType) -> Option<PodEvent> {
    let pod_name = pod.metadata.name.as_deref()?;
    let container_states = container_states(pod)?;
    Some(PodEvent {
        pod_name: pod_name.to_string(),
        container_states,
        num_pods: Some(1),
        event_type: Some(event_type),
    })
}
