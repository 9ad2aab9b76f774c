//! Numerically controlled oscillator.
//!
//! Generates `exp(j*2*pi*f*n/fs)` incrementally: a running phase accumulator
//! in cycles (`0.0..1.0`), advanced once per [`Nco::read`] call. Used both as
//! the baseband tuner and as the per-step sub-band mixer in the heterodyne
//! network (`crate::detector`).

use num_complex::Complex64;
use std::f64::consts::TAU;

/// A single numerically controlled oscillator.
#[derive(Debug, Clone, Copy)]
pub struct Nco {
    phase: f64,
    step: f64,
}

impl Nco {
    /// Create an NCO tuned to `freq` Hz at sample rate `fs`.
    pub fn new(fs: u32, freq: f64) -> Self {
        let mut nco = Self { phase: 0.0, step: 0.0 };
        nco.set_freq(fs, freq);
        nco
    }

    /// Retune the oscillator. Phase continues from its current value.
    pub fn set_freq(&mut self, fs: u32, freq: f64) {
        self.step = freq / fs as f64;
    }

    /// Read the current complex value and advance the phase by one sample.
    #[inline]
    pub fn read(&mut self) -> Complex64 {
        let angle = self.phase * TAU;
        let out = Complex64::new(angle.cos(), angle.sin());
        self.phase += self.step;
        self.phase -= self.phase.floor();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_magnitude() {
        let mut nco = Nco::new(8000, 1000.0);
        for _ in 0..1000 {
            let y = nco.read();
            assert!((y.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_frequency_is_constant() {
        let mut nco = Nco::new(8000, 0.0);
        let first = nco.read();
        for _ in 0..100 {
            let y = nco.read();
            assert!((y - first).norm() < 1e-12);
        }
    }

    #[test]
    fn quarter_cycle_after_fs_over_4freq_samples() {
        // At fs=8000, freq=1000, step = 0.125 cycles/sample -> after 2 samples
        // phase = 0.25 cycles = 90 degrees.
        let mut nco = Nco::new(8000, 1000.0);
        let _ = nco.read(); // sample 0: phase 0
        let _ = nco.read(); // sample 1: phase 0.125
        let y = nco.read(); // sample 2: phase 0.25
        assert!((y.re).abs() < 1e-9);
        assert!((y.im - 1.0).abs() < 1e-9);
    }
}
