//! `graves_det` — a real-time chirp detector for GRAVES-radar meteor echoes.
//!
//! Feed it one complex baseband sample at a time via
//! [`Detector::feed`][detector::Detector::feed]; when a meteor trail's
//! chirp begins and ends, it synchronously hands your
//! [`ChirpConsumer`][event::ChirpConsumer] a borrowed view of the captured
//! samples together with their per-sample SNR and power trajectories.
//!
//! This crate is the detection core only. Audio capture, on-disk event
//! persistence, rate reporting and CLI plumbing are all external
//! collaborators and out of scope here — see `SPEC_FULL.md`.

pub mod butterworth;
pub mod collector;
pub mod detector;
pub mod element;
pub mod error;
pub mod event;
pub mod history;
pub mod nco;
pub mod params;
pub mod power;

pub use detector::Detector;
pub use error::DetectorError;
pub use event::{ChirpConsumer, ChirpInfo};
pub use params::DetectorParams;
