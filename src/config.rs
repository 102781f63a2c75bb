//! Tuning knobs for bucket compaction.
//!
//! None of these values affect the logical contents of a `FragmentedVec`;
//! they only shape when the buckets get rebuilt.

use crate::error::{Error, Result};

/// Default fraction of sparse buckets above which a removal triggers compaction.
pub const DEFAULT_AUTO_DEFRAGMENT_THRESHOLD: f64 = 0.8;

/// Default fill ratio below which `trim_excess` rebuilds the buckets.
pub const DEFAULT_COMPACTION_RATIO: f64 = 0.9;

/// Default divisor: a bucket is sparse when it holds fewer than `len / 10` elements.
pub const DEFAULT_SPARSE_DIVISOR: usize = 10;

/// Compaction configuration for a `FragmentedVec`.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Fraction of sparse buckets, in `(0, 1]`, above which a removal compacts.
    ///
    /// Lower values compact eagerly (more copying, fewer buckets to walk);
    /// values near `1.0` defer compaction.
    pub auto_defragment_threshold: f64,
    /// Fill ratio, in `(0, 1]`, below which `trim_excess` rebuilds.
    pub compaction_ratio: f64,
    /// A bucket is sparse when its length is below `len / sparse_divisor`.
    pub sparse_divisor: usize,
}

impl Config {
    /// Creates the default configuration.
    pub const fn new() -> Self {
        Self {
            auto_defragment_threshold: DEFAULT_AUTO_DEFRAGMENT_THRESHOLD,
            compaction_ratio: DEFAULT_COMPACTION_RATIO,
            sparse_divisor: DEFAULT_SPARSE_DIVISOR,
        }
    }

    /// Sets the auto-defragment threshold.
    pub const fn with_auto_defragment_threshold(mut self, threshold: f64) -> Self {
        self.auto_defragment_threshold = threshold;
        self
    }

    /// Sets the compaction ratio.
    pub const fn with_compaction_ratio(mut self, ratio: f64) -> Self {
        self.compaction_ratio = ratio;
        self
    }

    /// Sets the sparse divisor.
    pub const fn with_sparse_divisor(mut self, divisor: usize) -> Self {
        self.sparse_divisor = divisor;
        self
    }

    /// Checks every field against its accepted domain.
    pub fn validate(&self) -> Result<()> {
        check_fraction("auto_defragment_threshold", self.auto_defragment_threshold)?;
        check_fraction("compaction_ratio", self.compaction_ratio)?;
        if self.sparse_divisor == 0 {
            return Err(Error::InvalidConfig {
                field: "sparse_divisor",
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepts values in `(0, 1]`; NaN fails both comparisons.
pub(crate) fn check_fraction(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig { field, value })
    }
}
