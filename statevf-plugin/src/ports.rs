//! Port vocabulary and the per-block view of host buffers.
//!
//! The host binds six ports: two scalar controls (cutoff, damping), one input
//! stream and three output streams. Bindings are the host's responsibility;
//! the plugin only sees a borrowed [`Ports`] view for the duration of one
//! `run` call and never owns or outlives the buffers.

/// Port indices, in the order the host binds buffers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum PortIndex {
    Cutoff = 0,
    Damping = 1,
    Input = 2,
    Highpass = 3,
    Bandpass = 4,
    Lowpass = 5,
}

impl PortIndex {
    /// Map a raw host-supplied index to a port, `None` for unknown indices.
    #[inline]
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Cutoff),
            1 => Some(Self::Damping),
            2 => Some(Self::Input),
            3 => Some(Self::Highpass),
            4 => Some(Self::Bandpass),
            5 => Some(Self::Lowpass),
            _ => None,
        }
    }
}

/// Number of ports in the bundle's one plugin.
pub const PORT_COUNT: u32 = 6;

/// Borrowed per-block buffer view handed to [`Plugin::run`](crate::Plugin::run).
///
/// All three output slices must match the input length; the plugin validates
/// that and fails loudly on a mismatch.
pub struct Ports<'a> {
    /// Cutoff frequency in Hz, sampled once for this block.
    pub cutoff: f32,
    /// Dimensionless damping (>= 0), sampled once for this block.
    pub damping: f32,
    pub input: &'a [f32],
    pub highpass: &'a mut [f32],
    pub bandpass: &'a mut [f32],
    pub lowpass: &'a mut [f32],
}
