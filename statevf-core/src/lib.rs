#![cfg_attr(not(feature = "std"), no_std)]
//! StateVF Core — no_std-ready state-variable filter DSP.
//!
//! Features
//! - `std`    : (default) use the Rust standard library
//! - `no-std` : build with `#![no_std]` and use the `libm` math backend
//!
//! Modules
//! - [`dsp`] : math backend and coefficient derivation helpers
//! - [`svf`] : the block-processing filter engine ([`svf::StateVf`])
//!
//! Design
//! - No heap allocations; one small `Copy` struct of persistent delay state
//! - Strictly sequential per-sample recurrence, parameters sampled per block
//! - Friendly to embedded / real-time targets

pub mod dsp;
pub mod svf;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::dsp::{resonance_q, svf_coeff};
    pub use crate::svf::StateVf;
}
