//! Chamberlin state-variable filter core.
//!
//! One `StateVf` produces synchronized highpass, bandpass and lowpass streams
//! from a single input, one block at a time. The three delay values persist
//! across blocks, so consecutive calls are seamless as long as the host feeds
//! blocks in order.
//!
//! Realtime contract
//! - `process_block` performs no allocation, takes no locks, does no I/O.
//! - The per-sample loop carries no guards: NaN/Inf entering the delay state
//!   (runaway resonance, near-Nyquist cutoff) propagates until `reset`.

use crate::dsp::{resonance_q, svf_coeff};

/// State-variable filter instance.
///
/// The sample rate is fixed at construction. The tuning coefficient `f` is
/// derived from the block's cutoff at the start of every block (and at
/// `reset`), so a stale value never leaks into processing.
#[derive(Copy, Clone, Debug)]
pub struct StateVf {
    sample_rate: f64,
    // derived per block
    f: f32,
    // persisted delay state: outputs at the last sample of the previous block
    delay_low: f32,
    delay_band: f32,
    delay_high: f32,
}

impl StateVf {
    /// Create a zeroed filter pinned to `sample_rate` (clamped to >= 1 Hz).
    #[inline]
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate: sample_rate.max(1.0),
            f: 0.0,
            delay_low: 0.0,
            delay_band: 0.0,
            delay_high: 0.0,
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Current tuning coefficient (as of the last `reset`/`process_block`).
    #[inline]
    pub fn coefficient(&self) -> f32 {
        self.f
    }

    /// Persisted delay state as `(low, band, high)`.
    #[inline]
    pub fn delays(&self) -> (f32, f32, f32) {
        (self.delay_low, self.delay_band, self.delay_high)
    }

    /// Zero the delay state and derive the coefficient from `cutoff_hz`.
    ///
    /// After this call the filter processes its first block from silence.
    /// The caller must have a cutoff value bound before resetting.
    #[inline]
    pub fn reset(&mut self, cutoff_hz: f32) {
        self.delay_low = 0.0;
        self.delay_band = 0.0;
        self.delay_high = 0.0;
        self.f = svf_coeff(cutoff_hz, self.sample_rate);
    }

    /// Process one block of `input` into the three output slices.
    ///
    /// `cutoff_hz` and `damping` are sampled once, at the start of the block.
    /// The recurrence is strictly sequential: every sample depends on the
    /// previous sample's bandpass/lowpass values, the first one on the delay
    /// state carried over from the previous block.
    ///
    /// All four slices must have equal length; a mismatch is a caller
    /// contract violation and panics. A zero-length block is a no-op.
    pub fn process_block(
        &mut self,
        input: &[f32],
        cutoff_hz: f32,
        damping: f32,
        highpass: &mut [f32],
        bandpass: &mut [f32],
        lowpass: &mut [f32],
    ) {
        let n = input.len();
        assert!(
            highpass.len() == n && bandpass.len() == n && lowpass.len() == n,
            "port buffers must have equal length"
        );

        self.f = svf_coeff(cutoff_hz, self.sample_rate);
        if n == 0 {
            return;
        }

        let f = self.f;
        let q = resonance_q(damping);
        let mut low = self.delay_low;
        let mut band = self.delay_band;
        let mut high = 0.0f32;

        for i in 0..n {
            high = input[i] - low - q * band;
            band = f * high + band;
            low = f * band + low;
            highpass[i] = high;
            bandpass[i] = band;
            lowpass[i] = low;
        }

        self.delay_low = low;
        self.delay_band = band;
        self.delay_high = high;
    }
}

// ------------------------------------ Tests --------------------------------------
