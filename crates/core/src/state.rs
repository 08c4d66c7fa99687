// Output unit state management

use crate::error::{AudioError, Result};
use parking_lot::RwLock;
use std::sync::Arc;

/// Output unit state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    /// Default output unit acquired, no stream open
    Idle,
    /// Stream is running and pulling from the render callback
    Playing,
    /// Stream is stopped but still attached
    Paused,
    /// Stream was closed and can be reopened
    Closed,
    /// Unit disposed; nothing else is allowed
    Released,
}

/// Thread-safe output state container
#[derive(Clone)]
pub struct OutputStateContainer {
    state: Arc<RwLock<OutputState>>,
}

impl OutputStateContainer {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(OutputState::Idle)),
        }
    }

    pub fn get_state(&self) -> OutputState {
        *self.state.read()
    }

    pub fn set_state(&self, new_state: OutputState) {
        *self.state.write() = new_state;
        log::debug!("Output state changed to: {:?}", new_state);
    }

    pub fn validate_transition(&self, from: OutputState, to: OutputState) -> Result<()> {
        let current = self.get_state();
        if current != from {
            return Err(AudioError::InvalidState(format!(
                "Expected state {:?}, but current state is {:?}",
                from, current
            )));
        }

        if is_allowed(from, to) {
            Ok(())
        } else {
            Err(invalid_transition(from, to))
        }
    }

    /// Validate against the current state, then move to `to`.
    ///
    /// Returns the previous state.
    pub fn transition(&self, to: OutputState) -> Result<OutputState> {
        let mut state = self.state.write();
        let from = *state;
        if !is_allowed(from, to) {
            return Err(invalid_transition(from, to));
        }
        *state = to;
        log::debug!("Output state changed: {:?} -> {:?}", from, to);
        Ok(from)
    }
}

fn is_allowed(from: OutputState, to: OutputState) -> bool {
    matches!(
        (from, to),
        // From Idle
        (OutputState::Idle, OutputState::Playing)
            | (OutputState::Idle, OutputState::Released)
            // From Playing
            | (OutputState::Playing, OutputState::Paused)
            | (OutputState::Playing, OutputState::Closed)
            | (OutputState::Playing, OutputState::Released)
            // From Paused
            | (OutputState::Paused, OutputState::Playing)
            | (OutputState::Paused, OutputState::Closed)
            | (OutputState::Paused, OutputState::Released)
            // From Closed
            | (OutputState::Closed, OutputState::Playing)
            | (OutputState::Closed, OutputState::Released)
    )
}

fn invalid_transition(from: OutputState, to: OutputState) -> AudioError {
    AudioError::InvalidState(format!("Invalid state transition from {:?} to {:?}", from, to))
}

impl Default for OutputStateContainer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let states = OutputStateContainer::new();
        assert_eq!(states.get_state(), OutputState::Idle);

        assert_eq!(states.transition(OutputState::Playing).unwrap(), OutputState::Idle);
        assert_eq!(states.transition(OutputState::Paused).unwrap(), OutputState::Playing);
        assert_eq!(states.transition(OutputState::Playing).unwrap(), OutputState::Paused);
        assert_eq!(states.transition(OutputState::Closed).unwrap(), OutputState::Playing);
        assert_eq!(states.transition(OutputState::Playing).unwrap(), OutputState::Closed);
        assert_eq!(states.transition(OutputState::Released).unwrap(), OutputState::Playing);
        assert_eq!(states.get_state(), OutputState::Released);
    }

    #[test]
    fn test_invalid_transitions() {
        let states = OutputStateContainer::new();
        assert!(states.transition(OutputState::Paused).is_err());
        assert!(states.transition(OutputState::Closed).is_err());
        assert_eq!(states.get_state(), OutputState::Idle);

        states.set_state(OutputState::Released);
        for to in [OutputState::Idle, OutputState::Playing, OutputState::Paused, OutputState::Closed] {
            assert!(matches!(states.transition(to), Err(AudioError::InvalidState(_))));
        }
    }

    #[test]
    fn test_validate_checks_current_state() {
        let states = OutputStateContainer::new();
        assert!(states.validate_transition(OutputState::Idle, OutputState::Playing).is_ok());
        assert!(states.validate_transition(OutputState::Playing, OutputState::Paused).is_err());
        assert!(states.validate_transition(OutputState::Idle, OutputState::Paused).is_err());
    }

    #[test]
    fn test_clones_share_state() {
        let states = OutputStateContainer::new();
        let other = states.clone();
        states.set_state(OutputState::Playing);
        assert_eq!(other.get_state(), OutputState::Playing);
    }
}
