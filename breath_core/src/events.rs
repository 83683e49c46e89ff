use serde::{Deserialize, Serialize};

use crate::Phase;

/// Every state change of the session timer produces an event.
/// The presenter turns them into cues; the runner into journal records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    Started {
        technique_id: String,
        duration_seconds: u32,
        cycles: u32,
    },
    PhaseChanged {
        phase: Phase,
        duration_seconds: u32,
        cycle: u32,
    },
    /// A new cycle began; the phase is always inhale.
    CycleStarted {
        cycle: u32,
        duration_seconds: u32,
    },
    Completed {
        cycles: u32,
        elapsed_seconds: u32,
    },
    /// User ended the session before the last cycle finished.
    Stopped {
        phase: Phase,
        cycle: u32,
        cycles_completed: u32,
        elapsed_seconds: u32,
    },
}

impl SessionEvent {
    /// Phase the session is in right after this event, if it is still running
    pub fn phase(&self) -> Option<Phase> {
        match self {
            SessionEvent::Started { .. } | SessionEvent::CycleStarted { .. } => Some(Phase::Inhale),
            SessionEvent::PhaseChanged { phase, .. } => Some(*phase),
            SessionEvent::Completed { .. } | SessionEvent::Stopped { .. } => None,
        }
    }

    /// Whether this event ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionEvent::Completed { .. } | SessionEvent::Stopped { .. }
        )
    }
}
