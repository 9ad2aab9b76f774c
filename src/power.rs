//! Combined signal/noise power estimator over the detector bank.
//!
//! See spec §4.3. Signal powers from simultaneously-present sub-bands sum
//! (they cover different spectral regions of the chirp); noise averages
//! across the bank.

use crate::element::BandElement;

/// Estimate combined signal power `S` and noise power `N` at ring index
/// `at`, given the wide/narrow filter cutoffs `w_w`/`w_n` shared by every
/// element in the bank.
pub fn estimate(elements: &[BandElement], at: usize, w_w: f64, w_n: f64, multiplicity: usize) -> (f64, f64) {
    let mut s = 0.0;
    let mut n = 0.0;
    for el in elements {
        let p_n = *el.p_n_hist().get(at);
        let p_w = *el.p_w_hist().get(at);
        let curr_s = p_n - w_n * (p_w - p_n) / (w_w - w_n);
        if *el.pres_hist().get(at) {
            s += curr_s;
        }
        n += p_n - curr_s;
    }
    (s, n / multiplicity as f64)
}

/// SNR as a function of the power ratio `Q`: `(Q - ratio) / (1 - Q)`.
///
/// Not used by the detection core itself but kept for downstream reporting
/// collaborators (out of scope here) that want to turn a raw `Q` sample
/// back into an SNR estimate without re-deriving the algebra.
pub fn q_to_snr(ratio: f64, q: f64) -> f64 {
    (q - ratio) / (1.0 - q)
}

/// Inverse of [`q_to_snr`] composed with the noise-power relation
/// `p_n = N0 * (ratio + snr)`: recovers `N0` given the narrow-filter power
/// and an SNR estimate.
pub fn n0_from_snr(ratio: f64, p_n: f64, snr: f64) -> f64 {
    p_n / (ratio + snr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_to_snr_at_noise_floor_is_zero() {
        assert!((q_to_snr(0.1, 0.1)).abs() < 1e-12);
    }

    #[test]
    fn q_to_snr_grows_toward_unity_q() {
        let low = q_to_snr(0.1, 0.5);
        let high = q_to_snr(0.1, 0.9);
        assert!(high > low);
    }
}
