//! # Boundary Errors
//!
//! Every failure to produce a dataset surfaces as
//! [`BoundaryError::DataUnavailable`], tagged with the dataset name and the
//! stage that failed. The type is `Clone` because a single failed load is
//! delivered to every caller that was waiting on it.

use thiserror::Error;

/// The stage at which a dataset load failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The source could not produce bytes (missing file, HTTP error, ...).
    Fetch,
    /// The bytes were not a usable geometry collection.
    Parse,
    /// The collection parsed but contained no usable polygons.
    Empty,
    /// The load task ended without producing a result.
    Aborted,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Fetch => "fetch",
            Self::Parse => "parse",
            Self::Empty => "empty",
            Self::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Error type for the boundary data store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundaryError {
    /// The named dataset could not be loaded.
    #[error("boundary data unavailable for {dataset:?} ({kind}): {reason}")]
    DataUnavailable {
        /// Logical dataset name passed to the source.
        dataset: String,
        /// Which stage failed.
        kind: FailureKind,
        /// Human-readable cause.
        reason: String,
    },
}

impl BoundaryError {
    /// A source failed to fetch `dataset`.
    pub fn fetch(dataset: &str, reason: impl Into<String>) -> Self {
        Self::unavailable(dataset, FailureKind::Fetch, reason)
    }

    /// `dataset` could not be parsed.
    pub fn parse(dataset: &str, reason: impl Into<String>) -> Self {
        Self::unavailable(dataset, FailureKind::Parse, reason)
    }

    /// `dataset` held no usable geometry.
    pub fn empty(dataset: &str) -> Self {
        Self::unavailable(dataset, FailureKind::Empty, "no polygon geometry found")
    }

    /// The load task for `dataset` died before reporting.
    pub fn aborted(dataset: &str, reason: impl Into<String>) -> Self {
        Self::unavailable(dataset, FailureKind::Aborted, reason)
    }

    fn unavailable(dataset: &str, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            dataset: dataset.to_string(),
            kind,
            reason: reason.into(),
        }
    }

    /// The dataset this error refers to.
    pub fn dataset(&self) -> &str {
        match self {
            Self::DataUnavailable { dataset, .. } => dataset,
        }
    }

    /// The failing stage.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::DataUnavailable { kind, .. } => *kind,
        }
    }
}
