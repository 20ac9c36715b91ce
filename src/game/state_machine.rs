//! Lifecycle phases of a matching session.

use thiserror::Error;

/// Phases a session moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Problems are being generated; no user action is accepted yet.
    Initializing,
    /// The board is live and accepting selections.
    InProgress,
    /// Every problem has a connection; the score is final.
    Completed,
}

/// Events that can be applied to the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Problem set and answer pool are ready; the clock starts.
    BoardReady,
    /// The last open problem received a connection.
    AllProblemsResolved,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the machine was in when the invalid event was received.
    pub from: SessionPhase,
    /// The event that cannot be applied from this phase.
    pub event: SessionEvent,
}

/// Session lifecycle machine. Transitions are synchronous and happen under
/// the session lock, so a planned/pending stage is unnecessary.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    phase: SessionPhase,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Initializing,
        }
    }
}

impl SessionStateMachine {
    /// Create a machine in the initializing phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Apply an event, moving the machine to the next phase.
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        let next = match (self.phase(), event) {
            (SessionPhase::Initializing, SessionEvent::BoardReady) => SessionPhase::InProgress,
            (SessionPhase::InProgress, SessionEvent::AllProblemsResolved) => {
                SessionPhase::Completed
            }
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        self.phase = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_phase_is_initializing() {
        let sm = SessionStateMachine::new();
        assert_eq!(sm.phase(), SessionPhase::Initializing);
    }

    #[test]
    fn full_happy_path_through_session() {
        let mut sm = SessionStateMachine::new();
        assert_eq!(
            sm.apply(SessionEvent::BoardReady).unwrap(),
            SessionPhase::InProgress
        );
        assert_eq!(
            sm.apply(SessionEvent::AllProblemsResolved).unwrap(),
            SessionPhase::Completed
        );
    }

    #[test]
    fn resolving_before_the_board_is_ready_is_rejected() {
        let mut sm = SessionStateMachine::new();
        let err = sm.apply(SessionEvent::AllProblemsResolved).unwrap_err();
        assert_eq!(err.from, SessionPhase::Initializing);
        assert_eq!(err.event, SessionEvent::AllProblemsResolved);
    }

    #[test]
    fn completed_sessions_accept_no_further_events() {
        let mut sm = SessionStateMachine::new();
        sm.apply(SessionEvent::BoardReady).unwrap();
        sm.apply(SessionEvent::AllProblemsResolved).unwrap();

        let err = sm.apply(SessionEvent::AllProblemsResolved).unwrap_err();
        assert_eq!(err.from, SessionPhase::Completed);
    }
}
