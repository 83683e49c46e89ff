//! Drives one session timer from a live tick source.
//!
//! The runner owns the timer, the ticker and the feedback sink for the
//! lifetime of a session. The ticker exists only while the timer is running:
//! it is created by `start()` and released on stop, on completion and when
//! the runner is dropped.

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

use crate::events::SessionEvent;
use crate::feedback::{dispatch, FeedbackSink, Presenter};
use crate::ticker::Ticker;
use crate::timer::SessionTimer;
use crate::{BreathingTechnique, PracticeRecord, TimerStatus};

/// What the observer wants after a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

pub struct PracticeRunner {
    timer: SessionTimer,
    presenter: Presenter,
    feedback: Box<dyn FeedbackSink>,
    tick_interval: Duration,
    ticker: Option<Ticker>,
    started_at: Option<DateTime<Utc>>,
}

impl PracticeRunner {
    pub fn new(
        technique: BreathingTechnique,
        presenter: Presenter,
        feedback: Box<dyn FeedbackSink>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            timer: SessionTimer::new(technique),
            presenter,
            feedback,
            tick_interval,
            ticker: None,
            started_at: None,
        }
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_running)
    }

    /// Swap the technique between sessions
    pub fn select(&mut self, technique: BreathingTechnique) -> bool {
        self.timer.select(technique)
    }

    /// Begin a session and its tick source. No-op while already running.
    pub fn start(&mut self) -> Option<SessionEvent> {
        let event = self.timer.start()?;
        self.started_at = Some(Utc::now());
        self.ticker = Some(Ticker::start(self.tick_interval));
        tracing::info!(
            "Started {} ({} cycles)",
            self.timer.technique().name,
            self.timer.technique().cycles
        );
        self.emit(&event);
        Some(event)
    }

    /// End the session early. Returns the journal record for it, or `None`
    /// when nothing was running.
    pub fn stop(&mut self) -> Option<PracticeRecord> {
        self.release_ticker();
        let event = self.timer.stop()?;
        tracing::info!("Stopped {} early", self.timer.technique().id);
        self.emit(&event);
        self.record_for(&event)
    }

    /// Apply ticks until the session completes or `observe` asks to stop.
    ///
    /// `observe` sees the timer after every tick together with the event that
    /// tick produced. Returns the journal record of the finished session.
    pub fn run<F>(&mut self, mut observe: F) -> Option<PracticeRecord>
    where
        F: FnMut(&SessionTimer, Option<&SessionEvent>) -> Control,
    {
        if self.timer.status() != TimerStatus::Running {
            return None;
        }

        loop {
            let ticked = self.ticker.as_ref().is_some_and(Ticker::wait);
            if !ticked {
                tracing::warn!("Tick source ended unexpectedly");
                return self.stop();
            }

            let event = self.timer.tick();
            if let Some(ref e) = event {
                self.emit(e);
            }

            if let Some(done @ SessionEvent::Completed { .. }) = &event {
                self.release_ticker();
                tracing::info!("Completed {}", self.timer.technique().id);
                observe(&self.timer, Some(done));
                return self.record_for(done);
            }

            if observe(&self.timer, event.as_ref()) == Control::Stop {
                return self.stop();
            }
        }
    }

    fn emit(&mut self, event: &SessionEvent) {
        let cues = self.presenter.cues(event);
        dispatch(self.feedback.as_mut(), &cues);
    }

    fn release_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn record_for(&mut self, event: &SessionEvent) -> Option<PracticeRecord> {
        let (cycles_completed, elapsed_seconds, completed) = match event {
            SessionEvent::Completed {
                cycles,
                elapsed_seconds,
            } => (*cycles, *elapsed_seconds, true),
            SessionEvent::Stopped {
                cycles_completed,
                elapsed_seconds,
                ..
            } => (*cycles_completed, *elapsed_seconds, false),
            _ => return None,
        };

        let ended_at = Utc::now();
        let technique = self.timer.technique();
        Some(PracticeRecord {
            id: Uuid::new_v4(),
            technique_id: technique.id.clone(),
            started_at: self.started_at.take().unwrap_or(ended_at),
            ended_at,
            cycles_planned: technique.cycles,
            cycles_completed,
            elapsed_seconds,
            completed,
        })
    }
}
