//! Math backend selection and coefficient helpers.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Clean, side-effect free helpers that are easy to test
//!
//! Conventions:
//! - The per-sample filter math is `f32`; the tuning-coefficient derivation is
//!   done in `f64` (to match the sample-rate division) before narrowing.
//! - All functions are `#[inline]` where useful to help the optimizer.

use core::f64::consts::PI;

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // libm (C math) in no_std
    if #[cfg(feature = "no-std")] {
        #[inline] fn m_sin(x: f64) -> f64 { libm::sin(x) }
    // std backend
    } else {
        #[inline] fn m_sin(x: f64) -> f64 { x.sin() }
    }
}

// --------------------------------- Coefficients ------------------------------------

/// SVF tuning coefficient: `f = 2 · sin(π · fc / sr)`.
///
/// Accurate only for `fc / sr` well below Nyquist; the filter drifts toward
/// instability as `fc` approaches `sr / 2`. No clamping is applied here —
/// the topology inherits that limitation and callers keep cutoff in range.
#[inline]
pub fn svf_coeff(cut_hz: f32, sr: f64) -> f32 {
    (2.0 * m_sin(PI * f64::from(cut_hz) / sr)) as f32
}

/// Resonance term from the damping control: `q = 2 · damping`.
///
/// Higher damping feeds more bandpass back into the highpass node and moves
/// the filter toward instability.
#[inline]
pub fn resonance_q(damping: f32) -> f32 {
    2.0 * damping
}

// --------------------------------- Tests (std only) ------------------------------
