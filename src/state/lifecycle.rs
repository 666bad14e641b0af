/// Swapper lifecycle state machine

use std::time::Instant;

/// Lifecycle of the swapper
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LifecycleState {
    /// Handling events
    Running { since: Instant },

    /// Shutdown in progress (transitional state)
    Stopping,

    /// All resources released
    Stopped,
}

impl LifecycleState {
    pub fn is_running(&self) -> bool {
        matches!(self, LifecycleState::Running { .. })
    }

    pub fn description(&self) -> &'static str {
        match self {
            LifecycleState::Running { .. } => "Running",
            LifecycleState::Stopping => "Stopping...",
            LifecycleState::Stopped => "Stopped",
        }
    }
}

/// Rejected lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// Shutdown was already requested
    AlreadyStopping,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::AlreadyStopping => write!(f, "Shutdown already requested"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// State machine for lifecycle transitions
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    /// Create a state machine in the Running state
    pub fn running() -> Self {
        Self {
            state: LifecycleState::Running {
                since: Instant::now(),
            },
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Transition Running -> Stopping
    pub fn begin_shutdown(&mut self) -> Result<(), TransitionError> {
        match self.state {
            LifecycleState::Running { .. } => {
                self.state = LifecycleState::Stopping;
                Ok(())
            }
            _ => Err(TransitionError::AlreadyStopping),
        }
    }

    /// Transition Stopping -> Stopped
    pub fn finish_shutdown(&mut self) {
        self.state = LifecycleState::Stopped;
    }
}
