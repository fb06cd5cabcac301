//! Settings and presets.

use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;
use std::thread;

use slog::Logger;

use crate::error::{Error, Result};

/// A cancellation token.
///
/// Clones share the same flag, so a token handed to a running test can be cancelled from another
/// thread. Tests poll the token between rounds, never in the middle of one, so a cancelled run
/// never leaves a half-updated accumulator behind.
#[derive(Clone, Debug, Default)]
pub struct Cancel {
    flag: Arc<AtomicBool>,
}

impl Cancel {
    /// Create a new, uncancelled token.
    pub fn new() -> Cancel {
        Cancel::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, atomic::Ordering::Relaxed);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(atomic::Ordering::Relaxed)
    }

    /// Return `Error::Cancelled` if cancellation has been requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Settings for running tests.
#[derive(Clone, Debug)]
pub struct Settings {
    /// The number of worker threads.
    ///
    /// The trial-heavy tests (avalanche and BIC) split every batch of trials across this many
    /// workers. The result does not depend on it.
    pub workers: usize,
    /// The number of trials generated before they are handed to the workers.
    ///
    /// Cancellation is checked once per batch.
    pub batch: usize,
    /// The cancellation token.
    pub cancel: Cancel,
    /// The logger.
    pub log: Logger,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            workers: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            batch: 4096,
            cancel: Cancel::new(),
            log: Logger::root(slog::Discard, o!()),
        }
    }
}

impl Settings {
    /// Preset running everything on the calling thread.
    pub fn single_threaded() -> Settings {
        Settings {
            workers: 1,
            ..Settings::default()
        }
    }

    /// Replace the logger.
    pub fn with_logger(mut self, log: Logger) -> Settings {
        self.log = log;
        self
    }

    /// Replace the worker count.
    ///
    /// Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Settings {
        self.workers = workers.max(1);
        self
    }

    /// Replace the cancellation token.
    pub fn with_cancel(mut self, cancel: Cancel) -> Settings {
        self.cancel = cancel;
        self
    }
}

/// The ceilings a good hash function stays under.
///
/// These are the values SMHasher uses. The engine never applies them itself; they are for the
/// caller's assertion layer.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Thresholds {
    /// Worst avalanche bias.
    pub avalanche: f64,
    /// Worst BIC bias.
    pub bic: f64,
    /// Collision ratio for random keysets.
    pub collision: f64,
    /// Collision ratio for structured or small keysets.
    ///
    /// These have a high Poisson variance relative to their expectation.
    pub structured_collision: f64,
    /// Worst distribution score.
    pub distribution: f64,
    /// Worst moment chi-squared.
    pub moment: f64,
}

impl Default for Thresholds {
    fn default() -> Thresholds {
        Thresholds {
            avalanche: 0.01,
            bic: 0.05,
            collision: 2.0,
            structured_collision: 10.0,
            distribution: 0.01,
            moment: 500.0,
        }
    }
}

impl Thresholds {
    /// Preset demanding "good" moments and tight collision ratios.
    pub fn strict() -> Thresholds {
        Thresholds {
            collision: 1.5,
            structured_collision: 4.0,
            moment: 50.0,
            ..Thresholds::default()
        }
    }

    /// Does an avalanche bias pass?
    pub fn avalanche_passes(&self, bias: f64) -> bool {
        bias < self.avalanche
    }

    /// Does a BIC bias pass?
    pub fn bic_passes(&self, bias: f64) -> bool {
        bias < self.bic
    }

    /// Does a collision ratio pass?
    ///
    /// `structured` selects the looser ceiling.
    pub fn collision_passes(&self, ratio: f64, structured: bool) -> bool {
        if structured {
            ratio < self.structured_collision
        } else {
            ratio < self.collision
        }
    }

    /// Does a distribution score pass?
    pub fn distribution_passes(&self, score: f64) -> bool {
        score < self.distribution
    }

    /// Does a moment chi-squared pass?
    pub fn moment_passes(&self, chi: f64) -> bool {
        chi < self.moment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_shared() {
        let cancel = Cancel::new();
        let settings = Settings::single_threaded().with_cancel(cancel.clone());

        assert!(settings.cancel.check().is_ok());
        cancel.cancel();
        assert_eq!(settings.cancel.check(), Err(Error::Cancelled));
    }

    #[test]
    fn workers_never_zero() {
        assert_eq!(Settings::default().with_workers(0).workers, 1);
        assert!(Settings::default().workers >= 1);
    }

    #[test]
    fn compare_presets() {
        let default = Thresholds::default();
        let strict = Thresholds::strict();

        assert!(strict.collision < default.collision);
        assert!(strict.structured_collision < default.structured_collision);
        assert!(strict.moment < default.moment);
        assert!(default.collision_passes(1.9, false));
        assert!(!default.collision_passes(2.0, false));
        assert!(default.collision_passes(9.0, true));
    }
}
