//! Progress callbacks for multi-phase mesh operations.
//!
//! Operations that run in several phases report `(current, total, message)`
//! triples through a [`Progress`]. The CLI turns these into a progress bar;
//! library callers can forward them to their own UI or ignore them.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use edgesplit::algo::Progress;
//!
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&calls);
//! let progress = Progress::new(move |_current, _total, _message| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! progress.report(1, 4, "Partitioning corners");
//! assert_eq!(calls.load(Ordering::Relaxed), 1);
//! ```

type Callback = dyn Fn(usize, usize, &str) + Send + Sync;

/// Receives `(current, total, message)` updates from a running operation.
pub struct Progress {
    callback: Box<Callback>,
}

impl Progress {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// A reporter that drops every update.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }

    /// Report that `current` of `total` phases are complete.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_report_forwards_arguments() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, message| {
            sink.lock().unwrap().push((current, total, message.to_string()));
        });

        progress.report(2, 5, "Partitioning corners");

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(2, 5, "Partitioning corners".to_string())]
        );
    }

    #[test]
    fn test_none_is_silent() {
        Progress::none().report(3, 3, "done");
        Progress::default().report(0, 1, "start");
    }
}
