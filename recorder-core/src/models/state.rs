use serde::{Deserialize, Serialize};

/// Recorder state machine.
///
/// State transitions:
/// ```text
/// idle → recording → stopped
/// ```
/// `Stopped` is terminal: a new recorder is created for the next recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    #[default]
    Idle,
    Recording,
    Stopped,
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: CaptureState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Recording) | (Self::Recording, Self::Stopped)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transitions() {
        assert!(CaptureState::Idle.can_transition_to(CaptureState::Recording));
        assert!(CaptureState::Recording.can_transition_to(CaptureState::Stopped));
    }

    #[test]
    fn stopped_is_terminal() {
        assert!(CaptureState::Stopped.is_terminal());
        assert!(!CaptureState::Stopped.can_transition_to(CaptureState::Recording));
        assert!(!CaptureState::Stopped.can_transition_to(CaptureState::Idle));
        assert!(!CaptureState::Idle.can_transition_to(CaptureState::Stopped));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&CaptureState::Recording).unwrap();
        assert_eq!(json, "\"recording\"");
    }
}
