//! Plugin lifecycle and the static descriptor registry.
//!
//! The host drives one instance through: instantiate (via the descriptor) →
//! bind buffers → `activate` → any number of `run` calls → optional
//! `deactivate` → drop. `deactivate` is a no-op; dropping releases exactly
//! what instantiation allocated.
//!
//! Hosts dispatch over these operations polymorphically; the [`Plugin`]
//! trait is that seam. The extension-data query (a secondary interface looked
//! up by a URI string) is [`Plugin::extension_data`] returning an
//! [`Extension`].

use statevf_core::svf::StateVf;

use crate::options::{apply_options, OptionFlags, PortOption};
use crate::ports::{Ports, PORT_COUNT};

/// URI identifying the StateVF plugin to hosts.
pub const STATEVF_URI: &str = "http://statevf.org/plugins/svf";

/// URI under which the options (capability negotiation) interface is exposed.
pub const OPTIONS_INTERFACE_URI: &str = "http://statevf.org/ns/ext/options#interface";

/// Host-visible secondary interfaces, looked up by URI.
pub enum Extension<'a> {
    Options(&'a mut dyn OptionsInterface),
}

/// Capability negotiation surface (see [`crate::options`]).
///
/// May be called from a non-realtime thread at any time, including before
/// `activate`; it touches no state shared with `run`.
pub trait OptionsInterface {
    fn set_options(&mut self, options: &[PortOption]) -> OptionFlags;
}

/// Host-driven lifecycle of a realtime plugin.
pub trait Plugin {
    /// Reset internal state so the next block starts from silence.
    /// `cutoff_hz` is the currently bound cutoff value; the host must have
    /// bound it before activating.
    fn activate(&mut self, cutoff_hz: f32);

    /// Process one block. Called synchronously on the realtime thread, once
    /// per block, with contiguous in-order blocks; must not allocate or
    /// block.
    fn run(&mut self, ports: Ports<'_>);

    /// Optional teardown counterpart of `activate`.
    fn deactivate(&mut self) {}

    /// Look up a secondary interface by URI.
    fn extension_data(&mut self, uri: &str) -> Option<Extension<'_>> {
        let _ = uri;
        None
    }
}

/// The state-variable filter plugin: three synchronized outputs from one
/// input, cutoff/damping sampled once per block.
#[derive(Copy, Clone, Debug)]
pub struct SvfPlugin {
    svf: StateVf,
}

impl SvfPlugin {
    /// Instantiate with the host's sample rate. All state starts zeroed.
    #[inline]
    pub fn new(sample_rate: f64) -> Self {
        Self {
            svf: StateVf::new(sample_rate),
        }
    }

    /// The underlying filter engine (tests and diagnostics).
    #[inline]
    pub fn engine(&self) -> &StateVf {
        &self.svf
    }
}

impl Plugin for SvfPlugin {
    fn activate(&mut self, cutoff_hz: f32) {
        self.svf.reset(cutoff_hz);
    }

    fn run(&mut self, ports: Ports<'_>) {
        self.svf.process_block(
            ports.input,
            ports.cutoff,
            ports.damping,
            ports.highpass,
            ports.bandpass,
            ports.lowpass,
        );
    }

    fn extension_data(&mut self, uri: &str) -> Option<Extension<'_>> {
        if uri == OPTIONS_INTERFACE_URI {
            Some(Extension::Options(self))
        } else {
            None
        }
    }
}

impl OptionsInterface for SvfPlugin {
    fn set_options(&mut self, options: &[PortOption]) -> OptionFlags {
        // Validate-only: accepted declarations do not change how `run`
        // samples its controls.
        apply_options(options)
    }
}

/// Immutable descriptor for one plugin in this bundle.
pub struct Descriptor {
    pub uri: &'static str,
    pub port_count: u32,
    pub instantiate: fn(sample_rate: f64) -> SvfPlugin,
}

// Process-wide, read-only registry: index 0 is the one StateVF plugin.
static DESCRIPTORS: [Descriptor; 1] = [Descriptor {
    uri: STATEVF_URI,
    port_count: PORT_COUNT,
    instantiate: SvfPlugin::new,
}];

/// Look up a plugin descriptor by discovery index.
#[inline]
pub fn descriptor(index: u32) -> Option<&'static Descriptor> {
    DESCRIPTORS.get(index as usize)
}
