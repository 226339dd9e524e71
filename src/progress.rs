//! Delayed progress indicator for long runs.
//!
//! The pipeline itself is synchronous and knows nothing about progress. A
//! caller that wants feedback wraps the call in a [`ProgressGuard`]: a
//! reporting thread waits for `delay`, and if the guard is still alive by then
//! it shows a spinner until the guard is dropped. Quick runs print nothing.
//!
//! ```no_run
//! use usamplex::progress::ProgressGuard;
//! use std::time::Duration;
//!
//! let guard = ProgressGuard::start(Duration::from_secs(2), "Processing...");
//! // ... long synchronous work ...
//! drop(guard);
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// How long a run may take before the spinner appears.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

const TICK: Duration = Duration::from_millis(120);

/// Keeps the reporting thread alive; dropping it stops and clears the spinner.
#[derive(Debug)]
pub struct ProgressGuard {
    done: Option<Sender<()>>,
    handle: Option<JoinHandle<bool>>,
}

impl ProgressGuard {
    pub fn start(delay: Duration, message: impl Into<String>) -> Self {
        let message = message.into();
        let (done, finished) = mpsc::channel::<()>();

        let handle = std::thread::spawn(move || match finished.recv_timeout(delay) {
            // Finished (or guard dropped) before the delay ran out
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
            Err(RecvTimeoutError::Timeout) => {
                let spinner = ProgressBar::new_spinner();
                if let Ok(style) =
                    ProgressStyle::with_template("{spinner:.yellow.bold} {msg:.yellow.bold} [{elapsed}]")
                {
                    spinner.set_style(style);
                }
                spinner.set_message(message);
                spinner.enable_steady_tick(TICK);
                // Any outcome of recv means the run is over
                finished.recv().ok();
                spinner.finish_and_clear();
                true
            }
        });

        Self {
            done: Some(done),
            handle: Some(handle),
        }
    }

    /// Stop the reporter; returns whether the spinner was ever shown.
    pub fn finish(mut self) -> bool {
        self.stop()
    }

    fn stop(&mut self) -> bool {
        if let Some(done) = self.done.take() {
            // The reporter may already be gone; nothing to notify then
            done.send(()).ok();
        }
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(false)
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.stop();
    }
}
