//! Error types for `FragmentedVec` operations.

use thiserror::Error;

/// The broad category of an [`Error`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ErrorKind {
    /// An index or window lies outside the valid bounds.
    OutOfRange,
    /// An argument is outside its accepted domain.
    InvalidArgument,
}

/// The error type for fallible `FragmentedVec` operations.
///
/// A call that returns an error leaves the container unchanged.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum Error {
    /// `index` does not address an element (or insertion point).
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The window `index..index + count` does not fit in the sequence.
    #[error("range of {count} elements starting at {index} out of range for length {len}")]
    RangeOutOfRange {
        index: usize,
        count: usize,
        len: usize,
    },

    /// A destination slice cannot hold the copied window.
    #[error("destination holds {available} elements but {required} are required")]
    DestinationTooSmall { required: usize, available: usize },

    /// `set_capacity` was asked to shrink below the current length.
    #[error("capacity {capacity} is less than length {len}")]
    CapacityBelowLength { capacity: usize, len: usize },

    /// A configuration value is outside its accepted domain.
    #[error("invalid value {value} for `{field}`")]
    InvalidConfig { field: &'static str, value: f64 },
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IndexOutOfRange { .. }
            | Error::RangeOutOfRange { .. }
            | Error::DestinationTooSmall { .. } => ErrorKind::OutOfRange,
            Error::CapacityBelowLength { .. } | Error::InvalidConfig { .. } => {
                ErrorKind::InvalidArgument
            }
        }
    }

    pub(crate) fn index(index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }

    pub(crate) fn range(index: usize, count: usize, len: usize) -> Self {
        Error::RangeOutOfRange { index, count, len }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
