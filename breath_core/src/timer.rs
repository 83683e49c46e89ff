//! Session timer state machine.
//!
//! The timer has no clock of its own: the owner calls `tick()` once per
//! second of session time and the timer walks the phase sequence.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Complete
//!           |           |
//!           +-> Idle    +-> Running (start again)
//! ```
//!
//! Commands never fail. A command that does not apply to the current state
//! (double start, stop while idle, tick while not running) returns `None`
//! and leaves the state untouched.

use crate::events::SessionEvent;
use crate::sequencer::next_phase;
use crate::{BreathingTechnique, Phase, SessionState, TimerStatus};

#[derive(Debug, Clone)]
pub struct SessionTimer {
    technique: BreathingTechnique,
    state: SessionState,
    /// Ticks applied since the last `start()`.
    elapsed_seconds: u32,
}

impl SessionTimer {
    /// Create an idle timer for the given technique
    pub fn new(technique: BreathingTechnique) -> Self {
        let state = SessionState::ready(&technique);
        Self {
            technique,
            state,
            elapsed_seconds: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status()
    }

    pub fn technique(&self) -> &BreathingTechnique {
        &self.technique
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Cycles fully finished so far
    pub fn cycles_completed(&self) -> u32 {
        if self.state.is_complete {
            self.technique.cycles
        } else {
            self.state.current_cycle.saturating_sub(1)
        }
    }

    /// 0.0 .. 1.0 progress across the whole session.
    pub fn progress(&self) -> f64 {
        let total = self.technique.total_seconds();
        if total == 0 {
            return 0.0;
        }
        (self.elapsed_seconds as f64 / total as f64).min(1.0)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<SessionEvent> {
        match self.status() {
            TimerStatus::Running => None,
            TimerStatus::Idle | TimerStatus::Complete => {
                self.state = SessionState {
                    is_active: true,
                    ..SessionState::ready(&self.technique)
                };
                self.elapsed_seconds = 0;
                tracing::debug!("Started session with {}", self.technique.id);
                Some(SessionEvent::Started {
                    technique_id: self.technique.id.clone(),
                    duration_seconds: self.technique.inhale,
                    cycles: self.technique.cycles,
                })
            }
        }
    }

    /// Advance by one second. Returns an event when the phase, the cycle or
    /// the session changes.
    pub fn tick(&mut self) -> Option<SessionEvent> {
        if self.status() != TimerStatus::Running {
            return None;
        }

        self.elapsed_seconds += 1;
        self.state.countdown_seconds = self.state.countdown_seconds.saturating_sub(1);
        if self.state.countdown_seconds > 0 {
            return None;
        }

        if let Some(step) = next_phase(self.state.phase, &self.technique) {
            self.state.phase = step.phase;
            self.state.countdown_seconds = step.duration_seconds;
            return Some(SessionEvent::PhaseChanged {
                phase: step.phase,
                duration_seconds: step.duration_seconds,
                cycle: self.state.current_cycle,
            });
        }

        if self.state.current_cycle < self.technique.cycles {
            self.state.current_cycle += 1;
            self.state.phase = Phase::Inhale;
            self.state.countdown_seconds = self.technique.inhale;
            tracing::debug!("Cycle {} of {}", self.state.current_cycle, self.technique.cycles);
            return Some(SessionEvent::CycleStarted {
                cycle: self.state.current_cycle,
                duration_seconds: self.technique.inhale,
            });
        }

        self.state.is_active = false;
        self.state.is_complete = true;
        tracing::debug!(
            "Session with {} complete after {}s",
            self.technique.id,
            self.elapsed_seconds
        );
        Some(SessionEvent::Completed {
            cycles: self.technique.cycles,
            elapsed_seconds: self.elapsed_seconds,
        })
    }

    /// End a running session early. Nothing fires for an idle or complete timer.
    pub fn stop(&mut self) -> Option<SessionEvent> {
        if self.status() != TimerStatus::Running {
            return None;
        }

        let event = SessionEvent::Stopped {
            phase: self.state.phase,
            cycle: self.state.current_cycle,
            cycles_completed: self.cycles_completed(),
            elapsed_seconds: self.elapsed_seconds,
        };
        self.state = SessionState::ready(&self.technique);
        self.elapsed_seconds = 0;
        tracing::debug!("Stopped session with {}", self.technique.id);
        Some(event)
    }

    /// Swap the technique. Ignored while a session is running.
    pub fn select(&mut self, technique: BreathingTechnique) -> bool {
        if self.status() == TimerStatus::Running {
            tracing::debug!("Ignoring technique change to {} while running", technique.id);
            return false;
        }
        self.state = SessionState::ready(&technique);
        self.technique = technique;
        self.elapsed_seconds = 0;
        true
    }
}
