//! Phase tracking for the shared grid
//!
//! Generation and solving both mutate or read the grid, so at most one of
//! them may run at a time. [`PhaseTracker`] holds the current phase and
//! checks every change against an explicit transition table.

use std::fmt;

use crate::error::{Result, RunnerError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Generating,
    Solving,
    /// Promoting End to Start between cycles
    Advancing,
    /// The cycle ended; only a fresh start leaves this phase
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Generating => write!(f, "generating"),
            Phase::Solving => write!(f, "solving"),
            Phase::Advancing => write!(f, "advancing"),
            Phase::Stopped => write!(f, "stopped"),
        }
    }
}

impl Phase {
    /// Allowed transitions out of `self`.
    pub fn allows(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Idle, Generating)
                | (Idle, Solving)
                | (Idle, Advancing)
                | (Idle, Stopped)
                | (Generating, Idle)
                | (Generating, Stopped)
                | (Solving, Idle)
                | (Solving, Stopped)
                | (Advancing, Generating)
                | (Advancing, Idle)
                | (Advancing, Stopped)
                | (Stopped, Idle)
        )
    }

    /// Generating and Solving exclude each other.
    fn is_busy(self) -> bool {
        matches!(self, Phase::Generating | Phase::Solving)
    }
}

#[derive(Clone, Debug)]
pub struct PhaseTracker {
    current: Phase,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self {
            current: Phase::Idle,
        }
    }
}

impl PhaseTracker {
    pub fn current(&self) -> Phase {
        self.current
    }

    /// Move to `next`.
    ///
    /// Asking for Generating or Solving while the other is running yields
    /// [`RunnerError::PhaseConflict`]; any other transition missing from
    /// the table yields [`RunnerError::InvalidTransition`]. The phase is
    /// unchanged on error.
    pub fn enter(&mut self, next: Phase) -> Result<()> {
        if next.is_busy() && self.current.is_busy() {
            return Err(RunnerError::PhaseConflict {
                requested: next,
                active: self.current,
            });
        }
        if !self.current.allows(next) {
            return Err(RunnerError::InvalidTransition {
                from: self.current,
                to: next,
            });
        }
        tracing::debug!("phase {} -> {}", self.current, next);
        self.current = next;
        Ok(())
    }

    /// Leave a busy phase and return to Idle.
    pub fn finish(&mut self) {
        if self.current != Phase::Stopped {
            self.current = Phase::Idle;
        }
    }

    /// Terminal stop, allowed from any phase.
    pub fn stop(&mut self) {
        self.current = Phase::Stopped;
    }

    /// Leave Stopped so a new cycle can begin.
    pub fn rearm(&mut self) {
        self.current = Phase::Idle;
    }
}
