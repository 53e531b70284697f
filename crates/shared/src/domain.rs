use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Container name to reported state, in the order the payload listed them.
pub type ContainerStates = IndexMap<String, ContainerState>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContainerState {
    Running,
    ContainerCreating,
    Terminated,
    ErrImagePull,
    ImagePullBackOff,
    // Unrecognized strings are kept verbatim.
    Unknown(String),
}

impl ContainerState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::ContainerCreating => "ContainerCreating",
            Self::Terminated => "terminated",
            Self::ErrImagePull => "ErrImagePull",
            Self::ImagePullBackOff => "ImagePullBackOff",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn icon(&self) -> StateIcon {
        StateIcon::for_state(self)
    }
}

impl From<&str> for ContainerState {
    fn from(value: &str) -> Self {
        match value {
            "running" => Self::Running,
            "ContainerCreating" => Self::ContainerCreating,
            "terminated" => Self::Terminated,
            "ErrImagePull" => Self::ErrImagePull,
            "ImagePullBackOff" => Self::ImagePullBackOff,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ContainerState {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Unknown(_) => Self::Unknown(value),
            known => known,
        }
    }
}

impl From<ContainerState> for String {
    fn from(value: ContainerState) -> Self {
        match value {
            ContainerState::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon shown for a container. `QuestionMark` is the declared default for any
/// state without its own entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateIcon {
    Smiley,
    Baby,
    Ghost,
    Unamused,
    Frown,
    QuestionMark,
}

impl StateIcon {
    pub const ALL: [StateIcon; 6] = [
        StateIcon::Smiley,
        StateIcon::Baby,
        StateIcon::Ghost,
        StateIcon::Unamused,
        StateIcon::Frown,
        StateIcon::QuestionMark,
    ];

    pub fn for_state(state: &ContainerState) -> Self {
        match state {
            ContainerState::Running => Self::Smiley,
            ContainerState::ContainerCreating => Self::Baby,
            ContainerState::Terminated => Self::Ghost,
            ContainerState::ErrImagePull => Self::Unamused,
            ContainerState::ImagePullBackOff => Self::Frown,
            ContainerState::Unknown(_) => Self::QuestionMark,
        }
    }

    pub fn asset_path(self) -> &'static str {
        match self {
            Self::Smiley => "/static/smiley.png",
            Self::Baby => "/static/baby.png",
            Self::Ghost => "/static/ghost.png",
            Self::Unamused => "/static/unamused.png",
            Self::Frown => "/static/frown.png",
            Self::QuestionMark => "/static/question-mark-emoji.png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_states_map_to_their_icons() {
        let cases = [
            ("running", StateIcon::Smiley, "/static/smiley.png"),
            ("ContainerCreating", StateIcon::Baby, "/static/baby.png"),
            ("terminated", StateIcon::Ghost, "/static/ghost.png"),
            ("ErrImagePull", StateIcon::Unamused, "/static/unamused.png"),
            ("ImagePullBackOff", StateIcon::Frown, "/static/frown.png"),
        ];
        for (raw, icon, path) in cases {
            let state = ContainerState::from(raw);
            assert_eq!(state.icon(), icon, "state {raw}");
            assert_eq!(state.icon().asset_path(), path);
        }
    }

    #[test]
    fn unrecognized_states_fall_back_to_question_mark() {
        for raw in ["Foo", "waiting", "CrashLoopBackOff", "Running", ""] {
            let state = ContainerState::from(raw);
            assert_eq!(state, ContainerState::Unknown(raw.to_string()));
            assert_eq!(state.icon(), StateIcon::QuestionMark);
        }
    }

    #[test]
    fn unknown_state_keeps_raw_string_on_the_wire() {
        let state: ContainerState = serde_json::from_str("\"CrashLoopBackOff\"").expect("json");
        assert_eq!(state.as_str(), "CrashLoopBackOff");
        assert_eq!(
            serde_json::to_string(&state).expect("json"),
            "\"CrashLoopBackOff\""
        );
    }

    #[test]
    fn container_states_keep_document_order() {
        let states: ContainerStates =
            serde_json::from_str(r#"{"web":"running","db":"terminated","cache":"Foo"}"#)
                .expect("json");

        let names: Vec<_> = states.keys().map(String::as_str).collect();
        assert_eq!(names, ["web", "db", "cache"]);
    }

    #[test]
    fn every_icon_has_a_distinct_asset() {
        let mut paths: Vec<_> = StateIcon::ALL.iter().map(|icon| icon.asset_path()).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), StateIcon::ALL.len());
    }
}
