//! The event shape delivered to the consumer on chirp end. See spec §3, §6.

use num_complex::Complex64;

/// A detected chirp event, as borrowed views into the detector's internal
/// buffers.
///
/// These views remain valid only until the next call to
/// [`crate::detector::Detector::feed`]: when the next chirp begins, the
/// detector clears its growable buffers in place. A consumer that needs to
/// retain chirp data past the callback's return must copy it.
///
/// The on-disk per-event file format that a downstream writer would
/// serialize this into (32-byte `KEY = VALUE` header records terminated by
/// `DATA SECTION START`, followed by three contiguous blocks of `length`
/// complex samples / SNR floats / Doppler floats) is specified in spec §6
/// for the benefit of a companion dump tool; writing and parsing it is out
/// of scope for this crate.
#[derive(Debug)]
pub struct ChirpInfo<'a> {
    /// Start time, integer seconds part (in sample units: `n / fs`).
    pub t0: u64,
    /// Start time, fractional seconds part.
    pub t0f: f64,
    /// Sample rate, Hz.
    pub fs: u32,
    /// Bandwidth ratio (`lpf2 / lpf1`).
    pub rbw: f64,
    /// Number of samples in `x`, `snr`, `s` and `n` (excludes the discarded
    /// pre-trigger tail).
    pub length: usize,
    /// Captured complex chirp samples.
    pub x: &'a [Complex64],
    /// Per-sample SNR, aligned with `x` by the backward smoother.
    pub snr: &'a [f64],
    /// Per-sample combined signal power.
    pub s: &'a [f64],
    /// Per-sample combined noise power.
    pub n: &'a [f64],
}

/// Receives chirp events from [`crate::detector::Detector::feed`].
///
/// Returning `false` aborts the `feed` call that delivered this event with
/// [`crate::error::DetectorError::ConsumerReject`]; no internal repair is
/// needed since the capture buffers are cleared on the next rising edge
/// regardless (spec §7).
pub trait ChirpConsumer {
    fn on_chirp(&mut self, info: &ChirpInfo<'_>) -> bool;
}

impl<T: ChirpConsumer + ?Sized> ChirpConsumer for &mut T {
    fn on_chirp(&mut self, info: &ChirpInfo<'_>) -> bool {
        (**self).on_chirp(info)
    }
}
