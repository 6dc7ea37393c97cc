/// Run lifecycle definitions
///
/// A harvest run moves through a fixed, forward-only sequence of states.
/// Pages are attempted once per run, so there is no retry state.
use std::fmt;

/// Represents the current state of a harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Worker pool not yet started
    NotStarted,

    /// Pages are being fetched and results stored
    Running,

    /// Every page has been attempted and the summary is final
    Completed,
}

impl RunState {
    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Running) | (Self::Running, Self::Completed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(RunState::NotStarted.can_transition_to(RunState::Running));
        assert!(RunState::Running.can_transition_to(RunState::Completed));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!RunState::NotStarted.can_transition_to(RunState::Completed));
        assert!(!RunState::Running.can_transition_to(RunState::NotStarted));
        assert!(!RunState::Running.can_transition_to(RunState::Running));
        assert!(!RunState::Completed.can_transition_to(RunState::Running));
    }

    #[test]
    fn test_display() {
        assert_eq!(RunState::Running.to_string(), "running");
    }
}
