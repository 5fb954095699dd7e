//! Simulated media permission prompt.
//!
//! A real platform asks the user once per origin; until then device labels
//! are withheld and capture calls trigger the prompt. The virtual platform
//! models the same three states and answers the prompt with a scripted
//! response.

use std::fmt;

use recorder_core::models::error::RecorderError;

/// Capture permission as seen by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// Not asked yet. Labels are hidden; capture triggers the prompt.
    #[default]
    Prompt,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Prompt => "prompt",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the simulated user answers the permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptResponse {
    #[default]
    Allow,
    Block,
    /// Closed without answering: the capture fails but the prompt is shown
    /// again next time.
    Dismiss,
}

/// Resolve a capture request against the current permission.
///
/// Returns the state after the (possible) prompt, or `PermissionDenied`.
pub fn request_access(
    current: PermissionState,
    response: PromptResponse,
) -> Result<PermissionState, RecorderError> {
    match current {
        PermissionState::Granted => Ok(PermissionState::Granted),
        PermissionState::Denied => Err(RecorderError::PermissionDenied),
        PermissionState::Prompt => match response {
            PromptResponse::Allow => {
                log::info!("Media permission granted");
                Ok(PermissionState::Granted)
            }
            PromptResponse::Block => {
                log::warn!("Media permission blocked by user");
                Err(RecorderError::PermissionDenied)
            }
            PromptResponse::Dismiss => {
                log::warn!("Media permission prompt dismissed");
                Err(RecorderError::PermissionDenied)
            }
        },
    }
}

/// State to remember after a failed request.
pub fn state_after_refusal(current: PermissionState, response: PromptResponse) -> PermissionState {
    match (current, response) {
        (PermissionState::Prompt, PromptResponse::Dismiss) => PermissionState::Prompt,
        _ => PermissionState::Denied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_skips_the_prompt() {
        assert_eq!(
            request_access(PermissionState::Granted, PromptResponse::Block),
            Ok(PermissionState::Granted)
        );
    }

    #[test]
    fn denied_never_prompts_again() {
        assert_eq!(
            request_access(PermissionState::Denied, PromptResponse::Allow),
            Err(RecorderError::PermissionDenied)
        );
    }

    #[test]
    fn prompt_resolves_with_response() {
        assert_eq!(
            request_access(PermissionState::Prompt, PromptResponse::Allow),
            Ok(PermissionState::Granted)
        );
        assert!(request_access(PermissionState::Prompt, PromptResponse::Block).is_err());
    }

    #[test]
    fn dismissal_keeps_prompt_state() {
        assert_eq!(
            state_after_refusal(PermissionState::Prompt, PromptResponse::Dismiss),
            PermissionState::Prompt
        );
        assert_eq!(
            state_after_refusal(PermissionState::Prompt, PromptResponse::Block),
            PermissionState::Denied
        );
    }
}
