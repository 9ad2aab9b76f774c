//! A single sub-band of the detector bank.
//!
//! Runs the wide (`lpf1`) and narrow (`lpf2`) Butterworth filters, tracks
//! their exponential output power, derives the power ratio `Q`, and decides
//! local "signal present" by integrating `Q` over the sliding history
//! window. See spec §4.1.

use crate::butterworth::Butterworth4;
use crate::history::Ring;
use num_complex::Complex64;

/// One sub-band channel of the detector bank.
pub struct BandElement {
    lpf1: Butterworth4,
    lpf2: Butterworth4,

    alpha: f64,
    ratio: f64,
    energy_thres: f64,

    p_w: f64,
    p_n: f64,
    last_good_q: f64,

    p_n_hist: Ring<f64>,
    p_w_hist: Ring<f64>,
    q_hist: Ring<f64>,
    samp_hist: Ring<Complex64>,
    pres_hist: Ring<bool>,

    y: Complex64,
    present: bool,

    warned_startup: bool,
}

impl BandElement {
    pub fn new(
        sample_rate: f64,
        lpf1_cutoff: f64,
        lpf2_cutoff: f64,
        ratio: f64,
        alpha: f64,
        energy_thres: f64,
        hist_len: usize,
    ) -> Self {
        Self {
            lpf1: Butterworth4::new(sample_rate, lpf1_cutoff),
            lpf2: Butterworth4::new(sample_rate, lpf2_cutoff),
            alpha,
            ratio,
            energy_thres,
            p_w: 0.0,
            p_n: 0.0,
            last_good_q: 0.0,
            p_n_hist: Ring::new(hist_len, 0.0),
            p_w_hist: Ring::new(hist_len, 0.0),
            q_hist: Ring::new(hist_len, 0.0),
            samp_hist: Ring::new(hist_len, Complex64::new(0.0, 0.0)),
            pres_hist: Ring::new(hist_len, false),
            y: Complex64::new(0.0, 0.0),
            present: false,
            warned_startup: false,
        }
    }

    /// Feed one (already tuned) complex baseband sample, writing this
    /// element's history at absolute ring index `idx`. Returns the local
    /// presence flag for this sample.
    ///
    /// `idx` is owned and advanced once per sample by the detector's shared
    /// [`crate::history::RingCursor`] — not by this element — so that every
    /// element's rings and the detector's `mixer_hist` stay in lockstep.
    pub fn feed(&mut self, x: Complex64, idx: usize) -> bool {
        let y_wide = self.lpf1.feed(x);
        self.p_w += self.alpha * ((y_wide * y_wide.conj()).re - self.p_w);

        let y_narrow = self.lpf2.feed(x);
        self.p_n += self.alpha * ((y_narrow * y_narrow.conj()).re - self.p_n);

        // Q is deliberately left to propagate NaN/inf under a silent input
        // (p_n == p_w == 0.0), matching the reference implementation: see
        // DESIGN.md "Q under silent input".
        let mut q = self.p_n / self.p_w;
        if q >= 1.0 || q < self.ratio {
            q = self.last_good_q;
        } else {
            self.last_good_q = q;
        }

        self.p_n_hist.write(idx, self.p_n);
        self.p_w_hist.write(idx, self.p_w);
        self.q_hist.write(idx, q);

        let energy: f64 = (0..self.q_hist.len()).map(|i| *self.q_hist.get(i)).sum();
        let present = energy >= self.energy_thres;

        self.samp_hist.write(idx, y_narrow);
        self.pres_hist.write(idx, present);

        self.y = y_narrow;
        self.present = present;
        present
    }

    /// Force this sample's presence decision to `false`, used by the
    /// detector to suppress the filters' start-up transient (spec §9:
    /// "initial transients of ~hist_len samples... may trigger a spurious
    /// chirp"). Only overrides the flag already written to `pres_hist`;
    /// the underlying power/Q history is left untouched.
    pub fn suppress_presence(&mut self, idx: usize, log_once: impl FnOnce()) {
        if self.present {
            if !self.warned_startup {
                log_once();
                self.warned_startup = true;
            }
            self.present = false;
            self.pres_hist.write(idx, false);
        }
    }

    pub fn present(&self) -> bool {
        self.present
    }

    pub fn y(&self) -> Complex64 {
        self.y
    }

    pub fn p_n_hist(&self) -> &Ring<f64> {
        &self.p_n_hist
    }

    pub fn p_w_hist(&self) -> &Ring<f64> {
        &self.p_w_hist
    }

    pub fn pres_hist(&self) -> &Ring<bool> {
        &self.pres_hist
    }

    pub fn samp_hist(&self) -> &Ring<Complex64> {
        &self.samp_hist
    }
}
