//! A small cooperative background-worker utility.
//!
//! A [`Worker`] runs a [`WorkCycle`] on a dedicated thread: while the cycle
//! reports work it runs one cycle at a time, otherwise it blocks until a
//! producer calls [`WorkerHandle::notify`]. Cancellation is cooperative and
//! observable at both suspension points (the idle wait and any
//! [`WorkerSignals::sleep`] inside a cycle); a cycle that has already
//! started is allowed to finish before the worker exits.

use crate::{MapError, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Best-effort scheduling hint for the worker thread.
///
/// Applied only where the platform thread abstraction supports it; ignoring
/// it is not a correctness issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// Configuration for spawning a worker thread
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub name: String,
    pub priority: ThreadPriority,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            name: "lamina-worker".to_string(),
            priority: ThreadPriority::Normal,
        }
    }
}

/// The unit of work driven by a [`Worker`].
///
/// This replaces inheritance from a pausable-thread base class with
/// composition: the worker owns the loop and the suspension points, the
/// cycle owns the domain logic.
pub trait WorkCycle: Send + 'static {
    /// Whether a cycle should run now. When false the worker blocks until
    /// notified.
    fn has_work(&self) -> bool;

    /// Runs one cycle. `signals` exposes cancellation-aware sleeping; an
    /// error stops the worker (it is propagated to the log, never
    /// swallowed).
    fn run_cycle(&mut self, signals: &WorkerSignals) -> Result<()>;

    /// Called exactly once after the loop has exited, on the worker thread
    fn on_shutdown(&mut self) {}
}

/// Shared signalling state between a worker thread and its producers
pub struct WorkerSignals {
    stopping: AtomicBool,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
    cancel_tx: Sender<()>,
    cancel_rx: Receiver<()>,
}

impl WorkerSignals {
    fn new() -> Self {
        // Capacity one: any number of pending notifications coalesce into
        // a single wake token.
        let (wake_tx, wake_rx) = bounded(1);
        let (cancel_tx, cancel_rx) = bounded(1);
        Self {
            stopping: AtomicBool::new(false),
            wake_tx,
            wake_rx,
            cancel_tx,
            cancel_rx,
        }
    }

    /// Wakes the worker if it is blocked waiting for work
    pub fn notify(&self) {
        let _ = self.wake_tx.try_send(());
    }

    /// Requests cooperative shutdown and wakes both suspension points
    pub fn request_stop(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        let _ = self.cancel_tx.try_send(());
        let _ = self.wake_tx.try_send(());
    }

    /// True once shutdown has been requested
    pub fn is_cancelled(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }

    /// Sleeps for up to `duration`, returning early on cancellation.
    /// Returns true when the full duration elapsed, false when cancelled.
    pub fn sleep(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return false;
        }
        match self.cancel_rx.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => true,
            // A message or a closed channel both mean shutdown.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    fn wait_for_wake(&self) {
        // Only returns on a wake token or channel teardown; either way the
        // caller re-checks its predicates.
        let _ = self.wake_rx.recv();
    }
}

/// Spawns and drives [`WorkCycle`] implementations on dedicated threads
pub struct Worker;

impl Worker {
    /// Spawns a worker thread running `cycle` and returns its handle
    pub fn spawn<C: WorkCycle>(options: WorkerOptions, mut cycle: C) -> Result<WorkerHandle> {
        let signals = Arc::new(WorkerSignals::new());
        let thread_signals = signals.clone();
        let priority = options.priority;

        let join = thread::Builder::new()
            .name(options.name.clone())
            .spawn(move || {
                log::debug!(
                    "worker '{}' started (priority hint {:?})",
                    thread::current().name().unwrap_or("unnamed"),
                    priority
                );
                Self::run(&thread_signals, &mut cycle);
                cycle.on_shutdown();
                log::debug!(
                    "worker '{}' stopped",
                    thread::current().name().unwrap_or("unnamed")
                );
            })
            .map_err(|e| MapError::Worker(format!("failed to spawn thread: {e}")))?;

        Ok(WorkerHandle {
            signals,
            join: Mutex::new(Some(join)),
        })
    }

    fn run<C: WorkCycle>(signals: &WorkerSignals, cycle: &mut C) {
        loop {
            if signals.is_cancelled() {
                break;
            }
            if cycle.has_work() {
                if let Err(err) = cycle.run_cycle(signals) {
                    log::error!("worker cycle failed, stopping: {err}");
                    break;
                }
            } else {
                signals.wait_for_wake();
            }
        }
    }
}

/// Handle to a spawned worker thread
pub struct WorkerHandle {
    signals: Arc<WorkerSignals>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl WorkerHandle {
    /// Wakes the worker so it re-evaluates `has_work`
    pub fn notify(&self) {
        self.signals.notify();
    }

    /// Requests cooperative shutdown; returns immediately
    pub fn request_stop(&self) {
        self.signals.request_stop();
    }

    /// True once the worker thread has exited
    pub fn is_finished(&self) -> bool {
        self.join
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }

    /// Requests shutdown and blocks until the worker thread has exited
    pub fn join(&self) -> Result<()> {
        self.signals.request_stop();
        let handle = self
            .join
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle
                .join()
                .map_err(|_| MapError::Worker("worker thread panicked".to_string()))?;
        }
        Ok(())
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        // Detach rather than block: the thread observes the stop request at
        // its next suspension point.
        self.signals.request_stop();
    }
}
