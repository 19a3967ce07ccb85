//! Single-flight background worker.

use crate::cancel::CancellationToken;
use crate::part::PartSpec;
use crate::stacker::Stacker;
use pstack_core::{Error, Geometry, Result, StackOutcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Runs one [`Stacker`] at a time on a dedicated thread.
///
/// Dropping the worker cancels and joins any run in progress.
pub struct StackerThread<G> {
    cancel: CancellationToken,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<StackOutcome<G>>>>,
}

impl<G: Geometry + 'static> StackerThread<G> {
    /// Creates an idle worker.
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Starts `stacker` on `parts` in the background.
    ///
    /// Refuses with [`Error::AlreadyRunning`] while a run is active, and with
    /// the validation or allocation error if the job cannot start. `on_finish`
    /// runs on the worker thread with the final outcome.
    pub fn start<F>(&mut self, stacker: Stacker<G>, parts: Vec<PartSpec<G>>, on_finish: F) -> Result<()>
    where
        F: FnOnce(&Result<StackOutcome<G>>) + Send + 'static,
    {
        if self.running() {
            return Err(Error::AlreadyRunning);
        }
        if let Some(previous) = self.handle.take() {
            // Already finished; only reap it.
            let _ = previous.join();
        }
        let space = stacker.prepare(&parts)?;

        self.cancel = stacker.cancel_handle();
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        let handle = thread::Builder::new()
            .name("pstack-stacker".into())
            .spawn(move || {
                let guard = RunningGuard(running);
                let mut stacker = stacker;
                let outcome = stacker.run_prepared(parts, space);
                drop(guard);
                on_finish(&outcome);
                outcome
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                Error::Internal(format!("cannot spawn stacking thread: {e}"))
            })?;

        self.handle = Some(handle);
        Ok(())
    }

    /// Returns true while a run is in progress.
    pub fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Cancels the current run, if any, and waits for the thread to exit.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Waits for the current run and returns its outcome, or `None` if no run
    /// was started since the last `wait` or `stop`.
    pub fn wait(&mut self) -> Option<Result<StackOutcome<G>>> {
        let handle = self.handle.take()?;
        Some(
            handle
                .join()
                .unwrap_or_else(|_| Err(Error::Internal("stacking thread panicked".into()))),
        )
    }
}

/// Clears the running flag when the run ends, including by panic.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<G: Geometry + 'static> Default for StackerThread<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> Drop for StackerThread<G> {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
