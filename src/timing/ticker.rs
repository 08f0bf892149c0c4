//! Cancellable periodic callback on a dedicated thread.
//!
//! The ticker drives match time. `start` returns as soon as the worker thread
//! is spawned; `stop` blocks until the worker has left its loop, after which
//! the callback is guaranteed not to run again.

use std::ops::ControlFlow;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::game_state::chess_rules::DEFAULT_TICK_PERIOD_MS;

/// What the callback wants the ticker to do next.
pub type TickFlow = ControlFlow<()>;

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    worker: Option<Worker>,
}

#[derive(Debug)]
struct Worker {
    // Dropping or signalling the sender wakes the loop and ends it.
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TICK_PERIOD_MS))
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            worker: None,
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// New period, used from the next `start`.
    pub fn set_period(&mut self, period: Duration) {
        self.period = period.max(Duration::from_millis(1));
        debug!(period_ms = self.period.as_millis() as u64, "ticker period set");
    }

    /// True while the worker loop is alive. A callback returning `Break`
    /// ends the loop on its own.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }

    /// Spawn the worker. The first tick fires one period from now. A running
    /// worker is stopped first.
    pub fn start<F>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> TickFlow + Send + 'static,
    {
        self.stop();

        let period = self.period;
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            let mut deadline = Instant::now() + period;
            loop {
                let wait = deadline.saturating_duration_since(Instant::now());
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                if on_tick().is_break() {
                    break;
                }
                deadline += period;
                // Do not try to catch up after a long stall.
                let now = Instant::now();
                if deadline < now {
                    deadline = now;
                }
            }
        });

        debug!(period_ms = period.as_millis() as u64, "ticker started");
        self.worker = Some(Worker { stop_tx, handle });
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// Called from inside the tick callback it only signals, since a thread
    /// cannot join itself; the loop still ends before the next tick.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = worker.stop_tx.send(());

        if worker.handle.thread().id() == thread::current().id() {
            return;
        }
        if worker.handle.join().is_err() {
            debug!("ticker worker panicked");
        }
        debug!("ticker stopped");
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn ticks_repeatedly_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = Ticker::new(Duration::from_millis(5));

        let counter = Arc::clone(&count);
        ticker.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        });
        assert!(ticker.is_running());

        thread::sleep(Duration::from_millis(100));
        ticker.stop();
        assert!(!ticker.is_running());

        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop >= 2, "expected several ticks, got {after_stop}");

        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn start_does_not_wait_for_first_tick() {
        let mut ticker = Ticker::new(Duration::from_secs(60));
        let began = Instant::now();
        ticker.start(|| ControlFlow::Continue(()));
        ticker.stop();
        assert!(began.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn break_ends_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = Ticker::new(Duration::from_millis(2));

        let counter = Arc::clone(&count);
        ticker.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Break(())
        });

        thread::sleep(Duration::from_millis(50));
        assert!(!ticker.is_running());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn restart_replaces_previous_worker() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = Ticker::new(Duration::from_millis(5));

        for _ in 0..3 {
            let counter = Arc::clone(&count);
            ticker.start(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            });
        }
        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut ticker = Ticker::new(Duration::ZERO);
        assert_eq!(ticker.period(), Duration::from_millis(1));
        ticker.set_period(Duration::from_millis(250));
        assert_eq!(ticker.period(), Duration::from_millis(250));
    }
}
