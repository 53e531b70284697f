use indexmap::IndexMap;
use shared::{domain::ContainerStates, protocol::PodEvent};

/// Latest container states per pod, in the order pods were first seen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PodTable {
    pods: IndexMap<String, ContainerStates>,
}

impl PodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole entry for the event's pod and returns what was
    /// there before. A known pod keeps its position. No ordering check is
    /// made, so a late event overwrites a newer one.
    pub fn apply(&mut self, event: PodEvent) -> Option<ContainerStates> {
        self.pods.insert(event.pod_name, event.container_states)
    }

    pub fn get(&self, pod_name: &str) -> Option<&ContainerStates> {
        self.pods.get(pod_name)
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContainerStates)> {
        self.pods.iter().map(|(name, states)| (name.as_str(), states))
    }
}
