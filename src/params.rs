//! Detector configuration, validation and derived constants. See spec §3, §6.

use crate::error::DetectorError;
use serde::{Deserialize, Serialize};

/// Minimum 70 ms chirp duration used to size the sliding integration window.
const MIN_CHIRP_DURATION: f64 = 0.07;

/// Safe minimum normalized cutoff frequency (`50 Hz` at `8 kHz`), below
/// which the detector's filters are considered too narrow to be meaningful.
const MIN_NORMALIZED_CUTOFF: f64 = 50.0 / 8000.0;

/// Immutable detector parameters.
///
/// Serializable so a host application can load these from a config file
/// instead of constructing them in code; this crate performs no file I/O
/// of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Sample rate, Hz.
    pub fs: u32,
    /// Center frequency of the lowest sub-band, as an audio offset, Hz.
    pub fc: f64,
    /// Wide low-pass cutoff, Hz. Must exceed `lpf2`.
    pub lpf1: f64,
    /// Narrow low-pass cutoff, Hz.
    pub lpf2: f64,
    /// Dimensionless detection threshold on the integrated power ratio.
    pub threshold: f64,
    /// Number of adjacent sub-bands in the heterodyne bank. Must be >= 1.
    pub multiplicity: usize,
}

/// Constants derived once from [`DetectorParams`] at construction time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Derived {
    /// Theoretical noise-only value of `Q`: `lpf2 / lpf1`.
    pub ratio: f64,
    /// Sliding integration window length, in samples: `ceil(fs * 0.07)`.
    pub hist_len: usize,
    /// Integrated-`Q` detection threshold.
    pub energy_thres: f64,
    /// Single-pole smoothing coefficient matched to the minimum chirp
    /// duration.
    pub alpha: f64,
}

impl DetectorParams {
    /// Validate this parameter set, per spec §6.
    pub fn validate(&self) -> Result<(), DetectorError> {
        if self.multiplicity < 1 {
            return Err(DetectorError::ConfigInvalid(
                "at least one channel is required".to_string(),
            ));
        }

        if self.lpf1 <= self.lpf2 {
            return Err(DetectorError::ConfigInvalid(
                "illegal filter cutoff frequencies".to_string(),
            ));
        }

        if self.fs == 0 {
            return Err(DetectorError::ConfigInvalid(
                "sample rate must be positive".to_string(),
            ));
        }

        let norm1 = self.lpf1 / self.fs as f64;
        let norm2 = self.lpf2 / self.fs as f64;
        if norm1 < MIN_NORMALIZED_CUTOFF || norm2 < MIN_NORMALIZED_CUTOFF {
            return Err(DetectorError::ConfigInvalid("too narrow".to_string()));
        }

        Ok(())
    }

    pub(crate) fn derive(&self) -> Derived {
        let ratio = self.lpf2 / self.lpf1;
        let hist_len = (self.fs as f64 * MIN_CHIRP_DURATION).ceil() as usize;
        let energy_thres = self.threshold * ratio * hist_len as f64;
        let alpha = 1.0 - (-1.0 / (self.fs as f64 * MIN_CHIRP_DURATION)).exp();
        Derived {
            ratio,
            hist_len,
            energy_thres,
            alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_params() -> DetectorParams {
        DetectorParams {
            fs: 8000,
            fc: 1000.0,
            lpf1: 300.0,
            lpf2: 50.0,
            threshold: 2.0,
            multiplicity: 1,
        }
    }

    #[test]
    fn rejects_zero_multiplicity() {
        let mut p = base_params();
        p.multiplicity = 0;
        let err = p.validate().unwrap_err();
        assert!(matches!(err, DetectorError::ConfigInvalid(_)));
    }

    #[test]
    fn rejects_inverted_cutoffs() {
        let mut p = base_params();
        p.lpf1 = 50.0;
        p.lpf2 = 300.0;
        match p.validate().unwrap_err() {
            DetectorError::ConfigInvalid(msg) => assert!(msg.contains("cutoff")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let mut p = base_params();
        p.fs = 0;
        let err = p.validate().unwrap_err();
        assert!(matches!(err, DetectorError::ConfigInvalid(_)));
    }

    #[test]
    fn rejects_too_narrow_cutoff() {
        let mut p = base_params();
        p.lpf2 = 1.0;
        let err = p.validate().unwrap_err();
        assert!(matches!(err, DetectorError::ConfigInvalid(_)));
    }

    #[test]
    fn accepts_reference_params() {
        assert!(base_params().validate().is_ok());
    }

    #[test]
    fn derived_constants_match_spec_formulas() {
        let p = base_params();
        let d = p.derive();
        assert!((d.ratio - 50.0 / 300.0).abs() < 1e-12);
        assert_eq!(d.hist_len, 560);
        assert!((d.energy_thres - 2.0 * (50.0 / 300.0) * 560.0).abs() < 1e-9);
    }
}
