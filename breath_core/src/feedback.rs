//! Presentation binding: timer events to visual and haptic cues.
//!
//! The engine decides *what* to show; a [`FeedbackSink`] decides *how*.
//! Sinks are best-effort: a failed cue is logged and dropped so it can never
//! hold up the timer.

use crate::events::SessionEvent;
use crate::{Phase, Result};

/// Resting scale of the breathing visual
pub const NEUTRAL_SCALE: f32 = 1.0;

/// Haptic pulse strength
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Haptic {
    Light,
    Medium,
    Success,
}

/// A single piece of feedback for the host platform
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    Haptic(Haptic),
    /// Animate the breathing visual to `scale` over `duration_seconds`.
    Animate { scale: f32, duration_seconds: u32 },
    Label(String),
}

/// Target scale of the breathing visual for a phase
pub fn target_scale(phase: Phase) -> f32 {
    match phase {
        Phase::Inhale => 1.5,
        Phase::Hold | Phase::Rest => 1.25,
        Phase::Exhale => NEUTRAL_SCALE,
    }
}

/// Maps session events to cues
#[derive(Clone, Copy, Debug)]
pub struct Presenter {
    haptics: bool,
}

impl Default for Presenter {
    fn default() -> Self {
        Self { haptics: true }
    }
}

impl Presenter {
    pub fn new(haptics: bool) -> Self {
        Self { haptics }
    }

    pub fn cues(&self, event: &SessionEvent) -> Vec<Cue> {
        let (haptic, (scale, duration_seconds), label) = match event {
            SessionEvent::Started {
                duration_seconds, ..
            }
            | SessionEvent::CycleStarted {
                duration_seconds, ..
            } => (
                Some(Haptic::Medium),
                (target_scale(Phase::Inhale), *duration_seconds),
                Phase::Inhale.label().to_string(),
            ),
            SessionEvent::PhaseChanged {
                phase,
                duration_seconds,
                ..
            } => (
                Some(Haptic::Light),
                (target_scale(*phase), *duration_seconds),
                phase.label().to_string(),
            ),
            SessionEvent::Completed { .. } => (
                Some(Haptic::Success),
                (NEUTRAL_SCALE, 0),
                "Well done".to_string(),
            ),
            SessionEvent::Stopped { .. } => (None, (NEUTRAL_SCALE, 0), "Stopped".to_string()),
        };

        let mut cues = Vec::with_capacity(3);
        if let Some(h) = haptic.filter(|_| self.haptics) {
            cues.push(Cue::Haptic(h));
        }
        cues.push(Cue::Animate {
            scale,
            duration_seconds,
        });
        cues.push(Cue::Label(label));
        cues
    }
}

/// Host platform output for cues
pub trait FeedbackSink {
    fn deliver(&mut self, cue: &Cue) -> Result<()>;
}

/// Sink that discards everything
#[derive(Debug, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn deliver(&mut self, _cue: &Cue) -> Result<()> {
        Ok(())
    }
}

/// Deliver cues in order, logging and swallowing failures
pub fn dispatch(sink: &mut dyn FeedbackSink, cues: &[Cue]) {
    for cue in cues {
        if let Err(e) = sink.deliver(cue) {
            tracing::warn!("Dropped feedback cue {:?}: {}", cue, e);
        }
    }
}

/// Sink that keeps every cue, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingFeedback {
    pub cues: Vec<Cue>,
}

#[cfg(test)]
impl FeedbackSink for RecordingFeedback {
    fn deliver(&mut self, cue: &Cue) -> Result<()> {
        self.cues.push(cue.clone());
        Ok(())
    }
}
