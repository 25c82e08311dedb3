//! Trigger identity wrapper used by the engine to track trigger lifecycle.
//!
//! The engine keeps wrappers in hash-based containers and mutates their state
//! in place, so equality and hashing look at the trigger key only.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use super::trigger::{Trigger, TriggerState};
use super::types::{JobKey, TriggerKey};

/// Lifecycle state of a trigger inside the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternalTriggerState {
    /// Eligible for acquisition.
    #[default]
    Waiting,
    /// Reserved by a firing pass.
    Acquired,
    /// Its job is currently running.
    Executing,
    /// Finished firing.
    Complete,
    /// Held because its job disallows concurrent execution.
    Blocked,
    /// Paused.
    Paused,
    /// Paused while blocked.
    PausedAndBlocked,
    /// Failed; stays here until reset.
    Error,
}

impl InternalTriggerState {
    /// The state reported to API callers.
    pub fn public(self) -> TriggerState {
        match self {
            InternalTriggerState::Waiting
            | InternalTriggerState::Acquired
            | InternalTriggerState::Executing => TriggerState::Normal,
            InternalTriggerState::Paused | InternalTriggerState::PausedAndBlocked => {
                TriggerState::Paused
            }
            InternalTriggerState::Blocked => TriggerState::Blocked,
            InternalTriggerState::Complete => TriggerState::Complete,
            InternalTriggerState::Error => TriggerState::Error,
        }
    }

    /// Whether the trigger is paused, blocked or not.
    pub fn is_paused(self) -> bool {
        matches!(
            self,
            InternalTriggerState::Paused | InternalTriggerState::PausedAndBlocked
        )
    }
}

/// A trigger plus its current engine state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerWrapper {
    trigger: Trigger,
    state: InternalTriggerState,
}

impl TriggerWrapper {
    /// Wrap a trigger in the `Waiting` state.
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            state: InternalTriggerState::Waiting,
        }
    }

    /// Get the trigger key.
    pub fn key(&self) -> &TriggerKey {
        self.trigger.key()
    }

    /// Get the key of the job the trigger fires.
    pub fn job_key(&self) -> &JobKey {
        self.trigger.job_key()
    }

    /// Get the wrapped trigger.
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Get the current state.
    pub fn state(&self) -> InternalTriggerState {
        self.state
    }

    /// Set the current state. Reserved for the engine that owns the wrapper.
    pub fn set_state(&mut self, state: InternalTriggerState) {
        self.state = state;
    }

    /// Unwrap the trigger.
    pub fn into_trigger(self) -> Trigger {
        self.trigger
    }
}

impl PartialEq for TriggerWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TriggerWrapper {}

impl Hash for TriggerWrapper {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

// Sound because Eq and Hash above look at the key alone.
impl Borrow<TriggerKey> for TriggerWrapper {
    fn borrow(&self) -> &TriggerKey {
        self.key()
    }
}
