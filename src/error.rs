//! Error types surfaced to callers of the detector constructor and `feed`.

use thiserror::Error;

/// Failure kinds for [`crate::detector::Detector`] construction and feeding.
///
/// There is no retry or partial recovery path: a `ConfigInvalid` means no
/// detector was built at all, and an `AllocFailure` or `ConsumerReject`
/// leaves the caller responsible for tearing the detector down (see
/// `DESIGN.md` for the rationale — this crate relies on ordinary `Drop`
/// rather than a bespoke teardown routine).
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Parameters rejected at construction time. No detector is returned.
    #[error("invalid detector configuration: {0}")]
    ConfigInvalid(String),

    /// A growable buffer could not be extended during construction or while
    /// appending a captured sample.
    #[error("allocation failure while operating the detector")]
    AllocFailure,

    /// The consumer's `on_chirp` callback returned `false` for this event.
    #[error("consumer rejected chirp event")]
    ConsumerReject,
}
