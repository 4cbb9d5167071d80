#![forbid(unsafe_code)]

use std::fmt;

use crate::host::{AnimationId, HostError};

/// Registry and transition errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// The panel id was never registered.
    UnknownPanel(String),
    /// The host has no node for this panel.
    NodeNotFound(String),
    /// No panel is currently active, so there is nothing to transition from.
    NoActivePanel,
    /// A second panel was registered as the initial panel.
    DuplicateInitial {
        current: String,
        requested: String,
    },
    /// A transition is already playing.
    TransitionInFlight { from: String, to: String },
    /// `finish` was called for an animation the registry is not waiting on.
    UnknownAnimation(AnimationId),
    /// The host failed.
    Host(HostError),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPanel(id) => write!(f, "panel {id:?} is not registered"),
            Self::NodeNotFound(id) => write!(f, "panel {id:?} has no node in the document"),
            Self::NoActivePanel => write!(f, "no panel is active"),
            Self::DuplicateInitial { current, requested } => write!(
                f,
                "cannot make {requested:?} the initial panel: {current:?} is already active"
            ),
            Self::TransitionInFlight { from, to } => {
                write!(f, "transition {from:?} -> {to:?} is still playing")
            }
            Self::UnknownAnimation(id) => write!(f, "no transition is waiting on {id}"),
            Self::Host(e) => write!(f, "host error: {e}"),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Host(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HostError> for PanelError {
    fn from(e: HostError) -> Self {
        match e {
            HostError::NodeNotFound(id) => Self::NodeNotFound(id),
            other => Self::Host(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn host_node_not_found_maps_to_panel_variant() {
        let err: PanelError = HostError::NodeNotFound("main_panel".into()).into();
        assert_eq!(err, PanelError::NodeNotFound("main_panel".into()));
        assert!(err.source().is_none());
    }

    #[test]
    fn other_host_errors_keep_source() {
        let err: PanelError = HostError::Js("animate threw".into()).into();
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "host error: host call failed: animate threw");
    }
}
