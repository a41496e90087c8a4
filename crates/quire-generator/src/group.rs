//! Result collection for concurrently running tasks.
//!
//! Every task reports into one [`TaskGroup`]. A failure never aborts siblings
//! that are already running; with cancellation enabled it only stops tasks
//! that have not started yet. The run's verdict is decided once all tasks
//! have settled, in [`TaskGroup::finish`].

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use tracing::warn;

use crate::{
    error::{GenerationError, PublishingError},
    task::TaskOutcome,
};

/// Counters of a settled run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// HTML files written.
    pub written: usize,

    /// Locations the theme declined to render.
    pub skipped: usize,

    /// Resource files copied.
    pub resources: usize,

    /// Tasks never started because an earlier task failed.
    pub not_started: usize,
}

/// Shared collector for one generation run.
#[derive(Debug, Default)]
pub struct TaskGroup {
    cancel_on_failure: bool,
    cancelled: AtomicBool,
    written: AtomicUsize,
    skipped: AtomicUsize,
    resources: AtomicUsize,
    not_started: AtomicUsize,
    failures: Mutex<Vec<PublishingError>>,
}

impl TaskGroup {
    #[must_use]
    pub fn new(cancel_on_failure: bool) -> Self {
        Self {
            cancel_on_failure,
            ..Self::default()
        }
    }

    /// Whether pending tasks should not start.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Run a generation task unless the group was cancelled, recording its result.
    pub fn run<F>(&self, task: F)
    where
        F: FnOnce() -> Result<TaskOutcome, PublishingError>,
    {
        if self.is_cancelled() {
            self.not_started.fetch_add(1, Ordering::Relaxed);
            return;
        }
        match task() {
            Ok(TaskOutcome::Written(_)) => {
                self.written.fetch_add(1, Ordering::Relaxed);
            }
            Ok(TaskOutcome::Skipped) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Run a resource copy unless the group was cancelled.
    pub fn run_copy<F>(&self, copy: F)
    where
        F: FnOnce() -> Result<usize, PublishingError>,
    {
        if self.is_cancelled() {
            self.not_started.fetch_add(1, Ordering::Relaxed);
            return;
        }
        match copy() {
            Ok(count) => {
                self.resources.fetch_add(count, Ordering::Relaxed);
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&self, error: PublishingError) {
        warn!(path = %error.path(), error = %error, "task failed");
        if self.cancel_on_failure {
            self.cancelled.store(true, Ordering::Release);
        }
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(error);
    }

    /// Settle the run: every recorded failure, or the counters.
    pub fn finish(self) -> Result<GenerationStats, GenerationError> {
        let failures = self.failures.into_inner().unwrap_or_else(|e| e.into_inner());
        if !failures.is_empty() {
            return Err(GenerationError::new(failures));
        }
        Ok(GenerationStats {
            written: self.written.into_inner(),
            skipped: self.skipped.into_inner(),
            resources: self.resources.into_inner(),
            not_started: self.not_started.into_inner(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use quire_core::{ContentPath, LocationKind};

    use super::*;
    use crate::error::RenderError;

    fn failure() -> PublishingError {
        PublishingError::Render {
            kind: LocationKind::Page,
            path: ContentPath::new("broken"),
            source: RenderError::message("nope"),
        }
    }

    #[test]
    fn test_counts_outcomes() {
        let group = TaskGroup::new(true);
        group.run(|| Ok(TaskOutcome::Written(PathBuf::from("a"))));
        group.run(|| Ok(TaskOutcome::Written(PathBuf::from("b"))));
        group.run(|| Ok(TaskOutcome::Skipped));
        group.run_copy(|| Ok(3));

        let stats = group.finish().unwrap();
        assert_eq!(
            stats,
            GenerationStats {
                written: 2,
                skipped: 1,
                resources: 3,
                not_started: 0,
            }
        );
    }

    #[test]
    fn test_failure_cancels_pending_tasks() {
        let group = TaskGroup::new(true);
        group.run(|| Err(failure()));
        group.run(|| panic!("must not start after cancellation"));

        assert!(group.is_cancelled());
        let err = group.finish().unwrap_err();
        assert_eq!(err.failures().len(), 1);
    }

    #[test]
    fn test_failure_without_cancellation_keeps_going() {
        let group = TaskGroup::new(false);
        group.run(|| Err(failure()));
        group.run(|| Ok(TaskOutcome::Written(PathBuf::from("a"))));
        group.run(|| Err(failure()));

        assert!(!group.is_cancelled());
        let err = group.finish().unwrap_err();
        assert_eq!(err.failures().len(), 2);
    }
}
