//! Core domain types for the breathing practice system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Breathing phases and techniques
//! - Live session state owned by the session timer
//! - Journal records for finished practice sessions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Phase Types
// ============================================================================

/// One stage of a breathing cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
    Rest,
}

impl Phase {
    /// Text shown to the user while this phase is running
    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe in",
            Phase::Hold => "Hold",
            Phase::Exhale => "Breathe out",
            Phase::Rest => "Rest",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Inhale => "inhale",
            Phase::Hold => "hold",
            Phase::Exhale => "exhale",
            Phase::Rest => "rest",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A phase together with how long it lasts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseStep {
    pub phase: Phase,
    pub duration_seconds: u32,
}

// ============================================================================
// Technique Types
// ============================================================================

/// A named configuration of phase durations and cycle count.
///
/// `hold` and `rest` may be zero, in which case the phase is skipped.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreathingTechnique {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub inhale: u32,
    #[serde(default)]
    pub hold: u32,
    pub exhale: u32,
    #[serde(default)]
    pub rest: u32,
    pub cycles: u32,
}

impl BreathingTechnique {
    /// Duration of a phase in seconds (zero for skipped phases)
    pub fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.inhale,
            Phase::Hold => self.hold,
            Phase::Exhale => self.exhale,
            Phase::Rest => self.rest,
        }
    }

    /// Seconds spent in one full cycle, saturating at `u32::MAX`
    pub fn cycle_seconds(&self) -> u32 {
        self.inhale
            .saturating_add(self.hold)
            .saturating_add(self.exhale)
            .saturating_add(self.rest)
    }

    /// Seconds spent in a full session, saturating at `u32::MAX`
    pub fn total_seconds(&self) -> u32 {
        self.cycle_seconds().saturating_mul(self.cycles)
    }

    /// Short pattern string such as `4-7-8` or `4-4-4-4`
    pub fn pattern(&self) -> String {
        let mut parts = vec![self.inhale.to_string()];
        if self.hold > 0 {
            parts.push(self.hold.to_string());
        }
        parts.push(self.exhale.to_string());
        if self.rest > 0 {
            parts.push(self.rest.to_string());
        }
        parts.join("-")
    }

    /// Check the technique invariants
    ///
    /// Returns a list of problems, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.id.trim().is_empty() {
            errors.push("Technique has empty ID".to_string());
        }
        if self.name.trim().is_empty() {
            errors.push(format!("Technique '{}' has empty name", self.id));
        }
        if self.inhale == 0 {
            errors.push(format!("Technique '{}': inhale must be > 0", self.id));
        }
        if self.exhale == 0 {
            errors.push(format!("Technique '{}': exhale must be > 0", self.id));
        }
        if self.cycles == 0 {
            errors.push(format!("Technique '{}': cycles must be >= 1", self.id));
        }

        errors
    }
}

// ============================================================================
// Session State Types
// ============================================================================

/// Coarse lifecycle of the session timer
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Complete,
}

/// Progress of the active exercise, owned by exactly one session timer
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    pub countdown_seconds: u32,
    pub current_cycle: u32,
    pub is_active: bool,
    pub is_complete: bool,
}

impl SessionState {
    /// State of a session that is ready to begin the given technique
    pub fn ready(technique: &BreathingTechnique) -> Self {
        Self {
            phase: Phase::Inhale,
            countdown_seconds: technique.inhale,
            current_cycle: 1,
            is_active: false,
            is_complete: false,
        }
    }

    pub fn status(&self) -> TimerStatus {
        if self.is_active {
            TimerStatus::Running
        } else if self.is_complete {
            TimerStatus::Complete
        } else {
            TimerStatus::Idle
        }
    }
}

// ============================================================================
// Journal Types
// ============================================================================

/// A finished practice session as written to the journal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PracticeRecord {
    pub id: Uuid,
    pub technique_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub cycles_planned: u32,
    pub cycles_completed: u32,
    pub elapsed_seconds: u32,
    pub completed: bool,
}

// ============================================================================
// Progress Types
// ============================================================================

/// Persistent gamification state across sessions
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct UserProgress {
    pub total_xp: u32,
    pub sessions_completed: u32,
    pub sessions_stopped: u32,
    pub total_seconds: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Local calendar day of the last completed session
    pub last_practice_on: Option<NaiveDate>,
}
