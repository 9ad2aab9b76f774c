//! Detector façade: the single `feed` entry point, parameter validation,
//! element/ring construction and the heterodyne routing between them. See
//! spec §4.2, §4.6.

use crate::collector::{backward_smooth, ChirpCollector, ChirpTransition};
use crate::element::BandElement;
use crate::error::DetectorError;
use crate::event::{ChirpConsumer, ChirpInfo};
use crate::history::{Ring, RingCursor};
use crate::nco::Nco;
use crate::params::{DetectorParams, Derived};
use num_complex::Complex64;

/// Real-time chirp detector.
///
/// Strictly single-threaded and synchronous: a single call to [`feed`]
/// drives the heterodyne bank, the chirp collector, and — on a falling
/// edge — the consumer callback, all before returning. There is no internal
/// timing; everything is derived from the sample counter and the
/// configured sample rate.
///
/// [`feed`]: Detector::feed
pub struct Detector<C: ChirpConsumer> {
    params: DetectorParams,
    derived: Derived,

    elements: Vec<BandElement>,

    lo: Nco,
    mixer: Nco,
    center: Nco,

    cursor: RingCursor,
    mixer_hist: Ring<Complex64>,

    collector: ChirpCollector,
    n: u64,

    consumer: C,
}

impl<C: ChirpConsumer> Detector<C> {
    /// Construct a detector, validating `params` first (spec §6). No
    /// partial detector is returned on rejection.
    pub fn new(params: DetectorParams, consumer: C) -> Result<Self, DetectorError> {
        params.validate()?;
        let derived = params.derive();

        let elements = (0..params.multiplicity)
            .map(|_| {
                BandElement::new(
                    params.fs as f64,
                    params.lpf1,
                    params.lpf2,
                    derived.ratio,
                    derived.alpha,
                    derived.energy_thres,
                    derived.hist_len,
                )
            })
            .collect();

        let lo_freq = params.fc - (params.multiplicity as f64 - 1.0) * params.lpf2;
        let lo = Nco::new(params.fs, lo_freq);
        let mixer = Nco::new(params.fs, 2.0 * params.lpf2);
        let center = Nco::new(params.fs, (params.multiplicity as f64 - 1.0) * params.lpf2);

        let cursor = RingCursor::new(derived.hist_len);
        let mixer_hist = Ring::new(derived.hist_len, Complex64::new(0.0, 0.0));

        Ok(Self {
            params,
            derived,
            elements,
            lo,
            mixer,
            center,
            cursor,
            mixer_hist,
            collector: ChirpCollector::new(),
            n: 0,
            consumer,
        })
    }

    /// Number of samples consumed so far.
    pub fn samples_consumed(&self) -> u64 {
        self.n
    }

    /// Whether a chirp is currently being captured.
    pub fn in_chirp(&self) -> bool {
        self.collector.in_chirp()
    }

    /// Retune only the baseband tuner, leaving the mixer and re-centering
    /// oscillators untouched.
    pub fn set_center_freq(&mut self, fc: f64) {
        self.params.fc = fc;
        let lo_freq = fc - (self.params.multiplicity as f64 - 1.0) * self.params.lpf2;
        self.lo.set_freq(self.params.fs, lo_freq);
    }

    /// Feed one complex baseband sample. On a falling edge this
    /// synchronously invokes the consumer before returning.
    pub fn feed(&mut self, sample: Complex64) -> Result<(), DetectorError> {
        let idx = self.cursor.pos();

        // Heterodyne network (spec §4.2): tune to baseband, then step the
        // signal across sub-bands, feeding each element in turn.
        let mut x = sample * self.lo.read().conj();
        let m = self.mixer.read();
        let mut any_present = false;
        for element in self.elements.iter_mut() {
            let present = element.feed(x, idx);
            any_present |= present;
            x *= m.conj();
        }
        self.mixer_hist.write(idx, m);

        // Suppress the filters' start-up transient (spec §9): the 4th-order
        // Butterworths settle over roughly hist_len samples, and a spurious
        // chirp in that window is not a real detection.
        if self.n < self.derived.hist_len as u64 {
            any_present = false;
            for element in self.elements.iter_mut() {
                element.suppress_presence(idx, || {
                    log::warn!(
                        "graves_det: suppressing presence during start-up transient (n={})",
                        self.n
                    );
                });
            }
        }

        self.cursor.advance();

        let transition = self.collector.step(
            &self.elements,
            &self.mixer_hist,
            self.cursor,
            idx,
            any_present,
            &mut self.center,
            self.params.lpf1,
            self.params.lpf2,
            self.params.multiplicity,
        );

        let result = match transition {
            ChirpTransition::Started => {
                log::debug!("graves_det: chirp rising edge at n={}", self.n);
                Ok(())
            }
            ChirpTransition::Ended => self.deliver_event(),
            ChirpTransition::None | ChirpTransition::Continuing => Ok(()),
        };

        self.n += 1;
        result
    }

    fn deliver_event(&mut self) -> Result<(), DetectorError> {
        backward_smooth(
            self.collector.buffers_mut(),
            self.derived.hist_len,
            self.derived.alpha,
        );

        let buffers = self.collector.buffers();
        let length = buffers.s.len();

        log::debug!(
            "graves_det: chirp falling edge at n={}, length={}",
            self.n,
            length
        );

        if length == 0 {
            return Ok(());
        }

        let n_u64 = self.n;
        let length_u64 = length as u64;
        // Saturating rather than panicking on underflow: a chirp cannot
        // start before `hist_len` samples have been seen (the start-up
        // transient is suppressed in `feed`), so this never actually
        // triggers in practice, but it isn't a caller-visible invariant.
        let start = n_u64.saturating_sub(length_u64);
        let t0 = start / self.params.fs as u64;
        let t0f = (start % self.params.fs as u64) as f64 / self.params.fs as f64;

        let info = ChirpInfo {
            t0,
            t0f,
            fs: self.params.fs,
            rbw: self.derived.ratio,
            length,
            x: &buffers.chirp[0..length],
            snr: &buffers.snr[0..length],
            s: &buffers.s[0..length],
            n: &buffers.n[0..length],
        };

        if self.consumer.on_chirp(&info) {
            Ok(())
        } else {
            Err(DetectorError::ConsumerReject)
        }
    }
}
