#![forbid(unsafe_code)]

//! Core domain model and engine for guided breathing practice.
//!
//! This crate provides:
//! - Domain types (phases, techniques, session state, journal records)
//! - Technique catalog
//! - Phase sequencer and session timer state machine
//! - Presentation cues and the live tick-driven runner
//! - Practice journal, history and progress (XP, levels, streaks)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod sequencer;
pub mod events;
pub mod timer;
pub mod feedback;
pub mod ticker;
pub mod runner;
pub mod wal;
pub mod csv_export;
pub mod state;
pub mod history;
pub mod progression;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use config::Config;
pub use sequencer::{cycle_plan, next_phase};
pub use events::SessionEvent;
pub use timer::SessionTimer;
pub use feedback::{Cue, FeedbackSink, Haptic, NullFeedback, Presenter};
pub use runner::{Control, PracticeRunner};
pub use wal::{JsonlSink, SessionSink};
pub use history::load_recent_records;
pub use progression::{apply_record, XpAward};
