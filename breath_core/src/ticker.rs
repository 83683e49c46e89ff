//! Cancellable periodic tick source.
//!
//! A `Ticker` owns one background thread that sends a tick every interval.
//! Ticks are consumed on the owning thread, so the timer is only ever
//! mutated there. Cancelling joins the thread and throws away undelivered
//! ticks; dropping the ticker cancels it.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Weak};
use std::thread::JoinHandle;
use std::time::Duration;

pub struct Ticker {
    interval: Duration,
    ticks: Receiver<()>,
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    // Upgradable only while the worker thread is alive
    worker: Weak<()>,
}

impl Ticker {
    /// Start ticking every `interval`
    pub fn start(interval: Duration) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel();
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let alive = Arc::new(());
        let worker = Arc::downgrade(&alive);

        let handle = std::thread::spawn(move || {
            let _alive = alive;
            loop {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tick_tx.send(()).is_err() {
                            break;
                        }
                    }
                    // Explicit cancel or the ticker was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        tracing::debug!("Ticker started ({:?})", interval);
        Self {
            interval,
            ticks: tick_rx,
            cancel: Some(cancel_tx),
            handle: Some(handle),
            worker,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the worker thread is still alive
    pub fn is_running(&self) -> bool {
        self.worker.strong_count() > 0
    }

    #[cfg(test)]
    pub(crate) fn worker(&self) -> Weak<()> {
        self.worker.clone()
    }

    /// Block until the next tick. Returns `false` once cancelled.
    pub fn wait(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.ticks.recv().is_ok()
    }

    /// Stop the tick thread. No tick is delivered after this returns.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Ticker thread panicked");
            }
            let dropped = self.ticks.try_iter().count();
            tracing::debug!("Ticker cancelled, {} pending ticks dropped", dropped);
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
