//! Per-document batch driver.
//!
//! Every document is handled independently and reports an [`Outcome`]. Failures are logged where
//! they happen and only counted here, so one bad page never stops a run. A handler that panics
//! counts as a failure of its own item.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Result of handling one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Processed,
    Skipped,
    Failed,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub attempted: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let mut summary = Summary::default();
        for outcome in outcomes {
            summary.attempted += 1;
            match outcome {
                Outcome::Processed => summary.processed += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }
        summary
    }

    pub fn errors_or_skipped(&self) -> usize {
        self.skipped + self.failed
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} of {} documents. Errors/Skipped: {}",
            self.processed,
            self.attempted,
            self.errors_or_skipped()
        )
    }
}

/// Apply `handle` to every item, on a dedicated pool when `jobs > 1`.
///
/// Outcomes come back in input order whatever the job count.
pub fn run<T, F>(items: &[T], jobs: usize, handle: F) -> Result<Vec<Outcome>>
where
    T: Sync + fmt::Debug,
    F: Fn(&T) -> Outcome + Sync + Send,
{
    let guarded = |item: &T| guard(item, &handle);
    if jobs <= 1 {
        return Ok(items.iter().map(guarded).collect());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build worker pool")?;
    Ok(pool.install(|| items.par_iter().map(guarded).collect()))
}

fn guard<T, F>(item: &T, handle: &F) -> Outcome
where
    T: fmt::Debug,
    F: Fn(&T) -> Outcome,
{
    match panic::catch_unwind(AssertUnwindSafe(|| handle(item))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            tracing::error!("Panic while processing {:?}: {}", item, panic_message(&*payload));
            Outcome::Failed
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Files under `root` whose name ends in `.<extension>`, compared case-insensitively, sorted.
pub fn find_files(root: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = if recursive {
        format!("{escaped}/**/*.{extension}")
    } else {
        format!("{escaped}/*.{extension}")
    };
    let options = glob::MatchOptions {
        case_sensitive: false,
        ..glob::MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)
        .with_context(|| format!("Invalid glob pattern: {pattern}"))?
    {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(err) => tracing::warn!("Unreadable path while scanning {}: {}", root.display(), err),
        }
    }
    files.sort();
    Ok(files)
}
