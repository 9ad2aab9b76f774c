//! Chirp collector: idle/in-chirp state machine, pre-trigger flush, live
//! append, and the backward smoother. See spec §4.4 and §4.5.

use crate::element::BandElement;
use crate::history::{Ring, RingCursor};
use crate::nco::Nco;
use crate::power;
use num_complex::Complex64;

/// The four parallel growable buffers describing one captured chirp.
///
/// Collapsed into one struct-of-arrays per spec §9's redesign prompt, owned
/// by the collector and cleared (not reallocated down) on every new rising
/// edge so steady-state operation is allocation-free once a site's typical
/// chirp length is reached.
#[derive(Debug, Default)]
pub struct ChirpBuffers {
    pub chirp: Vec<Complex64>,
    pub s: Vec<f64>,
    pub n: Vec<f64>,
    pub snr: Vec<f64>,
}

impl ChirpBuffers {
    fn clear(&mut self) {
        self.chirp.clear();
        self.s.clear();
        self.n.clear();
        self.snr.clear();
    }
}

/// What happened to the collector's state machine this sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChirpTransition {
    /// Still idle, no chirp in progress.
    None,
    /// Rising edge: a chirp just started, pre-trigger tail has been flushed.
    Started,
    /// Still in a chirp; this sample was appended.
    Continuing,
    /// Falling edge: the chirp just ended. Caller must run
    /// [`backward_smooth`] on the buffers before building the event.
    Ended,
}

/// Idle / in-chirp state machine owning the growable capture buffers.
pub struct ChirpCollector {
    in_chirp: bool,
    buffers: ChirpBuffers,
}

impl ChirpCollector {
    pub fn new() -> Self {
        Self {
            in_chirp: false,
            buffers: ChirpBuffers::default(),
        }
    }

    pub fn in_chirp(&self) -> bool {
        self.in_chirp
    }

    pub fn buffers(&self) -> &ChirpBuffers {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut ChirpBuffers {
        &mut self.buffers
    }

    /// Combine the sub-bands' samples at ring index `at` (or their live
    /// values, when `at` is `None`) into one re-centered complex sample,
    /// reading the `center` NCO exactly once.
    fn combine(
        elements: &[BandElement],
        mixer_hist: &Ring<Complex64>,
        at: usize,
        live: bool,
        center: &mut Nco,
    ) -> Complex64 {
        let m = *mixer_hist.get(at);
        let mut curr_m = center.read().conj();
        let mut y = Complex64::new(0.0, 0.0);
        for el in elements {
            let (present, sample) = if live {
                (el.present(), el.y())
            } else {
                (*el.pres_hist().get(at), *el.samp_hist().get(at))
            };
            if present {
                y += sample * curr_m;
            }
            curr_m *= m;
        }
        y
    }

    /// Advance the state machine by one sample.
    ///
    /// `cursor` must already have been advanced past the sample just written
    /// at `idx_newest` (so `cursor.offset(i)` walks the ring in chronological
    /// order starting at the oldest surviving sample, and `idx_newest` is
    /// the just-completed "newest complete" index).
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        elements: &[BandElement],
        mixer_hist: &Ring<Complex64>,
        cursor: RingCursor,
        idx_newest: usize,
        any_present: bool,
        center: &mut Nco,
        w_w: f64,
        w_n: f64,
        multiplicity: usize,
    ) -> ChirpTransition {
        if !self.in_chirp {
            if !any_present {
                return ChirpTransition::None;
            }

            self.in_chirp = true;
            self.buffers.clear();

            for i in 0..cursor.len() {
                let idx = cursor.offset(i);
                let (s, n) = power::estimate(elements, idx, w_w, w_n, multiplicity);
                let y = Self::combine(elements, mixer_hist, idx, false, center);
                self.buffers.chirp.push(y);
                self.buffers.s.push(s);
                self.buffers.n.push(n);
            }

            ChirpTransition::Started
        } else if any_present {
            let y = Self::combine(elements, mixer_hist, idx_newest, true, center);
            let (s, n) = power::estimate(elements, idx_newest, w_w, w_n, multiplicity);
            self.buffers.chirp.push(y);
            self.buffers.s.push(s);
            self.buffers.n.push(n);

            ChirpTransition::Continuing
        } else {
            self.in_chirp = false;
            ChirpTransition::Ended
        }
    }
}

impl Default for ChirpCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Reverse-time exponential re-filtering of the captured `S`/`N`
/// trajectories (spec §4.5), aligning the smoothed SNR curve with the
/// already-captured chirp by discarding the pre-trigger tail.
///
/// After this call, `buffers.s`, `buffers.n` and `buffers.snr` all have
/// length `buffers.chirp.len().saturating_sub(hist_len)`; `buffers.chirp`
/// itself is left at its full captured length (its trailing `hist_len`
/// samples are simply never read by the caller, mirroring the reference
/// implementation's raw-pointer-plus-length convention).
pub fn backward_smooth(buffers: &mut ChirpBuffers, hist_len: usize, alpha: f64) {
    let len = buffers.chirp.len();
    let mut s = 0.0;
    let mut n = 0.0;
    for i in (0..len).rev() {
        s += alpha * (buffers.s[i] - s);
        n += alpha * (buffers.n[i] - n);
        buffers.s[i] = s;
        buffers.n[i] = n;
    }

    let valid = len.saturating_sub(hist_len);
    buffers.snr.clear();
    buffers.snr.reserve(valid);
    for i in 0..valid {
        buffers.s[i] = buffers.s[i + hist_len];
        buffers.n[i] = buffers.n[i + hist_len];
        buffers.snr.push(buffers.s[i] / buffers.n[i]);
    }
    buffers.s.truncate(valid);
    buffers.n.truncate(valid);
}
