//! C ABI wrapper for the StateVF plugin.
//!
//! Exposes the plugin's lifecycle to C hosts: instantiate/cleanup, per-port
//! buffer binding, activate, per-block run, and the options (capability
//! negotiation) call — plus a function-pointer descriptor table retrievable
//! by discovery index.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle type: `StatevfHandle` (heap-allocated; the host owns it
//!   and must pass it to `statevf_cleanup` exactly once).
//! - Buffer pointers bound via `statevf_connect_port` must stay valid and
//!   correctly sized for every call that uses them; that is the host's side
//!   of the contract.
//!
//! Threading
//! - `statevf_run` belongs on the realtime audio thread. `statevf_options_set`
//!   may be called from a control thread; it shares no mutable state with the
//!   audio path.

use std::ffi::CStr;
use std::os::raw::c_char;

use statevf_plugin::options::{OptionContext, OptionKey, OptionValue};
use statevf_plugin::plugin::OPTIONS_INTERFACE_URI;
use statevf_plugin::{
    Extension, OptionFlags, OptionsInterface, Plugin, PortClass, PortIndex, PortOption, Ports,
    SvfPlugin,
};

// --- Wire codes (kept in sync with include/statevf.h) -----------------------------

pub const STATEVF_CONTEXT_INSTANCE: u32 = 0;
pub const STATEVF_CONTEXT_PORT: u32 = 1;

pub const STATEVF_KEY_CURRENT_PORT_TYPE: u32 = 1;
pub const STATEVF_KEY_MIN_BLOCK_LENGTH: u32 = 2;
pub const STATEVF_KEY_MAX_BLOCK_LENGTH: u32 = 3;

pub const STATEVF_TYPE_PORT_CLASS: u32 = 1;
pub const STATEVF_TYPE_INT: u32 = 2;
pub const STATEVF_TYPE_FLOAT: u32 = 3;

pub const STATEVF_CLASS_CONTROL: u32 = 0;
pub const STATEVF_CLASS_CV: u32 = 1;
pub const STATEVF_CLASS_AUDIO: u32 = 2;

/// Opaque plugin instance we hand to C.
///
/// Port pointers start null and are filled in by `statevf_connect_port`;
/// `statevf_run` refuses to touch anything while a pointer is missing.
#[repr(C)]
pub struct StatevfHandle {
    cutoff: *const f32,
    damping: *const f32,
    input: *const f32,
    highpass: *mut f32,
    bandpass: *mut f32,
    lowpass: *mut f32,
    plugin: SvfPlugin,
}

impl StatevfHandle {
    fn new(sample_rate: f64) -> Self {
        Self {
            cutoff: std::ptr::null(),
            damping: std::ptr::null(),
            input: std::ptr::null(),
            highpass: std::ptr::null_mut(),
            bandpass: std::ptr::null_mut(),
            lowpass: std::ptr::null_mut(),
            plugin: SvfPlugin::new(sample_rate),
        }
    }
}

/// One raw host declaration for `statevf_options_set`.
///
/// `value` carries a class code for `STATEVF_TYPE_PORT_CLASS`, a signed
/// integer for `STATEVF_TYPE_INT`, and `f32` bits (low word) for
/// `STATEVF_TYPE_FLOAT`.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct StatevfOption {
    pub context: u32,
    pub subject: u32,
    pub key: u32,
    pub value_type: u32,
    pub value: u64,
}

fn option_from_raw(raw: &StatevfOption) -> Result<PortOption, OptionFlags> {
    let context = if raw.context == STATEVF_CONTEXT_PORT {
        OptionContext::Port
    } else {
        // Any non-port context fails subject validation downstream.
        OptionContext::Instance
    };
    let key = match raw.key {
        STATEVF_KEY_CURRENT_PORT_TYPE => OptionKey::CurrentPortType,
        STATEVF_KEY_MIN_BLOCK_LENGTH => OptionKey::MinBlockLength,
        STATEVF_KEY_MAX_BLOCK_LENGTH => OptionKey::MaxBlockLength,
        _ => return Err(OptionFlags::BAD_KEY),
    };
    let value = match raw.value_type {
        STATEVF_TYPE_PORT_CLASS => match raw.value as u32 {
            STATEVF_CLASS_CONTROL => OptionValue::PortClass(PortClass::Control),
            STATEVF_CLASS_CV => OptionValue::PortClass(PortClass::Cv),
            STATEVF_CLASS_AUDIO => OptionValue::PortClass(PortClass::Audio),
            _ => return Err(OptionFlags::BAD_VALUE),
        },
        STATEVF_TYPE_INT => OptionValue::Int(raw.value as i64),
        STATEVF_TYPE_FLOAT => OptionValue::Float(f32::from_bits(raw.value as u32)),
        _ => return Err(OptionFlags::BAD_VALUE),
    };
    Ok(PortOption {
        context,
        subject: raw.subject,
        key,
        value,
    })
}

// --- Creation / destruction -------------------------------------------------------

/// Create a new plugin instance at `sample_rate`.
/// Returns a non-null pointer on success, or null on allocation failure.
#[no_mangle]
pub extern "C" fn statevf_instantiate(sample_rate: f64) -> *mut StatevfHandle {
    Box::into_raw(Box::new(StatevfHandle::new(sample_rate)))
}

/// Destroy an instance previously returned by `statevf_instantiate`.
#[no_mangle]
pub extern "C" fn statevf_cleanup(handle: *mut StatevfHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

// --- Port binding ------------------------------------------------------------------

/// Bind `data` to the given port index. Unknown indices are ignored.
#[no_mangle]
pub extern "C" fn statevf_connect_port(handle: *mut StatevfHandle, port: u32, data: *mut f32) {
    if handle.is_null() {
        return;
    }
    let h = unsafe { &mut *handle };
    match PortIndex::from_index(port) {
        Some(PortIndex::Cutoff) => h.cutoff = data,
        Some(PortIndex::Damping) => h.damping = data,
        Some(PortIndex::Input) => h.input = data,
        Some(PortIndex::Highpass) => h.highpass = data,
        Some(PortIndex::Bandpass) => h.bandpass = data,
        Some(PortIndex::Lowpass) => h.lowpass = data,
        None => {}
    }
}

// --- Lifecycle ---------------------------------------------------------------------

/// Reset the filter so the next block starts from silence.
/// The cutoff port must be bound first (ordering contract).
#[no_mangle]
pub extern "C" fn statevf_activate(handle: *mut StatevfHandle) {
    if handle.is_null() {
        return;
    }
    let h = unsafe { &mut *handle };
    if h.cutoff.is_null() {
        return;
    }
    let cutoff = unsafe { *h.cutoff };
    h.plugin.activate(cutoff);
}

/// Process one block of `n_frames` samples through all bound buffers.
/// Does nothing until every port is bound.
#[no_mangle]
pub extern "C" fn statevf_run(handle: *mut StatevfHandle, n_frames: u32) {
    if handle.is_null() {
        return;
    }
    let h = unsafe { &mut *handle };
    if h.cutoff.is_null()
        || h.damping.is_null()
        || h.input.is_null()
        || h.highpass.is_null()
        || h.bandpass.is_null()
        || h.lowpass.is_null()
    {
        return;
    }

    let n = n_frames as usize;
    let (cutoff, damping) = unsafe { (*h.cutoff, *h.damping) };
    let input = unsafe { std::slice::from_raw_parts(h.input, n) };
    let highpass = unsafe { std::slice::from_raw_parts_mut(h.highpass, n) };
    let bandpass = unsafe { std::slice::from_raw_parts_mut(h.bandpass, n) };
    let lowpass = unsafe { std::slice::from_raw_parts_mut(h.lowpass, n) };

    h.plugin.run(Ports {
        cutoff,
        damping,
        input,
        highpass,
        bandpass,
        lowpass,
    });
}

/// Counterpart of `statevf_activate`; a no-op for this plugin.
#[no_mangle]
pub extern "C" fn statevf_deactivate(handle: *mut StatevfHandle) {
    if handle.is_null() {
        return;
    }
    let h = unsafe { &mut *handle };
    h.plugin.deactivate();
}

// --- Options -----------------------------------------------------------------------

/// Apply a batch of port-type declarations; returns OR-accumulated error
/// flags (`STATEVF_ERR_*` in the header), 0 if every declaration validated.
#[no_mangle]
pub extern "C" fn statevf_options_set(
    handle: *mut StatevfHandle,
    options: *const StatevfOption,
    n_options: u32,
) -> u32 {
    if handle.is_null() || options.is_null() || n_options == 0 {
        return 0;
    }
    let h = unsafe { &mut *handle };
    let raw = unsafe { std::slice::from_raw_parts(options, n_options as usize) };

    let mut flags = OptionFlags::NONE;
    let mut decoded = Vec::with_capacity(raw.len());
    for o in raw {
        match option_from_raw(o) {
            Ok(opt) => decoded.push(opt),
            Err(f) => flags |= f,
        }
    }

    if let Some(Extension::Options(iface)) = h.plugin.extension_data(OPTIONS_INTERFACE_URI) {
        flags |= iface.set_options(&decoded);
    }
    flags.bits()
}

// --- Descriptor --------------------------------------------------------------------

/// Function-pointer dispatch table handed to C hosts.
#[repr(C)]
pub struct StatevfDescriptor {
    pub uri: *const c_char,
    pub instantiate: extern "C" fn(f64) -> *mut StatevfHandle,
    pub connect_port: extern "C" fn(*mut StatevfHandle, u32, *mut f32),
    pub activate: extern "C" fn(*mut StatevfHandle),
    pub run: extern "C" fn(*mut StatevfHandle, u32),
    pub deactivate: extern "C" fn(*mut StatevfHandle),
    pub cleanup: extern "C" fn(*mut StatevfHandle),
    pub options_set: extern "C" fn(*mut StatevfHandle, *const StatevfOption, u32) -> u32,
}

// The raw uri pointer refers to a static C string; sharing it is safe.
unsafe impl Sync for StatevfDescriptor {}

static STATEVF_URI_C: &CStr = c"http://statevf.org/plugins/svf";

static DESCRIPTOR: StatevfDescriptor = StatevfDescriptor {
    uri: STATEVF_URI_C.as_ptr(),
    instantiate: statevf_instantiate,
    connect_port: statevf_connect_port,
    activate: statevf_activate,
    run: statevf_run,
    deactivate: statevf_deactivate,
    cleanup: statevf_cleanup,
    options_set: statevf_options_set,
};

/// Entry point: descriptor for discovery index 0, null for any other index.
#[no_mangle]
pub extern "C" fn statevf_descriptor(index: u32) -> *const StatevfDescriptor {
    match index {
        0 => &DESCRIPTOR,
        _ => std::ptr::null(),
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use statevf_plugin::plugin::STATEVF_URI;

    struct Host {
        cutoff: f32,
        damping: f32,
        input: Vec<f32>,
        highpass: Vec<f32>,
        bandpass: Vec<f32>,
        lowpass: Vec<f32>,
    }

    impl Host {
        fn new(n: usize, cutoff: f32, damping: f32) -> Self {
            Self {
                cutoff,
                damping,
                input: vec![0.0; n],
                highpass: vec![0.0; n],
                bandpass: vec![0.0; n],
                lowpass: vec![0.0; n],
            }
        }

        fn connect(&mut self, h: *mut StatevfHandle) {
            statevf_connect_port(h, 0, &mut self.cutoff);
            statevf_connect_port(h, 1, &mut self.damping);
            statevf_connect_port(h, 2, self.input.as_mut_ptr());
            statevf_connect_port(h, 3, self.highpass.as_mut_ptr());
            statevf_connect_port(h, 4, self.bandpass.as_mut_ptr());
            statevf_connect_port(h, 5, self.lowpass.as_mut_ptr());
        }
    }

    fn current_type_option(subject: u32, class: u32) -> StatevfOption {
        StatevfOption {
            context: STATEVF_CONTEXT_PORT,
            subject,
            key: STATEVF_KEY_CURRENT_PORT_TYPE,
            value_type: STATEVF_TYPE_PORT_CLASS,
            value: u64::from(class),
        }
    }

    #[test]
    fn descriptor_table_is_registered() {
        let d = statevf_descriptor(0);
        assert!(!d.is_null());
        let uri = unsafe { CStr::from_ptr((*d).uri) };
        assert_eq!(uri.to_str().unwrap(), STATEVF_URI);
        assert!(statevf_descriptor(1).is_null());
    }

    #[test]
    fn full_lifecycle_matches_direct_plugin_use() {
        let n = 64;
        let mut host = Host::new(n, 1200.0, 0.4);
        for (i, s) in host.input.iter_mut().enumerate() {
            *s = (i as f32 * 0.21).sin();
        }
        let input = host.input.clone();

        let h = statevf_instantiate(48_000.0);
        assert!(!h.is_null());
        host.connect(h);
        statevf_activate(h);
        statevf_run(h, n as u32);
        statevf_deactivate(h);
        statevf_cleanup(h);

        let mut direct = SvfPlugin::new(48_000.0);
        direct.activate(1200.0);
        let (mut hp, mut bp, mut lp) = (vec![0.0; n], vec![0.0; n], vec![0.0; n]);
        direct.run(Ports {
            cutoff: 1200.0,
            damping: 0.4,
            input: &input,
            highpass: &mut hp,
            bandpass: &mut bp,
            lowpass: &mut lp,
        });

        assert_eq!(host.highpass, hp);
        assert_eq!(host.bandpass, bp);
        assert_eq!(host.lowpass, lp);
    }

    #[test]
    fn run_without_bound_ports_is_ignored() {
        let h = statevf_instantiate(48_000.0);
        // No ports bound: neither call may crash or touch memory.
        statevf_activate(h);
        statevf_run(h, 128);
        statevf_cleanup(h);

        // Null-handle calls are no-ops too.
        statevf_activate(std::ptr::null_mut());
        statevf_run(std::ptr::null_mut(), 128);
        statevf_cleanup(std::ptr::null_mut());
    }

    #[test]
    fn options_codes_round_trip() {
        let h = statevf_instantiate(48_000.0);

        let ok = [
            current_type_option(0, STATEVF_CLASS_CONTROL),
            current_type_option(1, STATEVF_CLASS_CV),
        ];
        assert_eq!(statevf_options_set(h, ok.as_ptr(), ok.len() as u32), 0);

        // Audio is recognized but inadmissible as a current type.
        let bad_value = [current_type_option(0, STATEVF_CLASS_AUDIO)];
        assert_eq!(
            statevf_options_set(h, bad_value.as_ptr(), 1),
            OptionFlags::BAD_VALUE.bits()
        );

        // Unknown key code.
        let mut bad_key = current_type_option(0, STATEVF_CLASS_CONTROL);
        bad_key.key = 99;
        assert_eq!(
            statevf_options_set(h, &bad_key, 1),
            OptionFlags::BAD_KEY.bits()
        );

        // Wrong payload type (float bits for a port-type declaration).
        let mut bad_type = current_type_option(1, 0);
        bad_type.value_type = STATEVF_TYPE_FLOAT;
        bad_type.value = u64::from(0.5f32.to_bits());
        assert_eq!(
            statevf_options_set(h, &bad_type, 1),
            OptionFlags::BAD_VALUE.bits()
        );

        // Output port as subject.
        let bad_subject = [current_type_option(5, STATEVF_CLASS_CV)];
        assert_eq!(
            statevf_options_set(h, bad_subject.as_ptr(), 1),
            OptionFlags::BAD_SUBJECT.bits()
        );

        // Mixed batch: union of the failures, the valid entry contributes none.
        let mixed = [ok[0], bad_value[0], bad_key];
        assert_eq!(
            statevf_options_set(h, mixed.as_ptr(), mixed.len() as u32),
            (OptionFlags::BAD_VALUE | OptionFlags::BAD_KEY).bits()
        );

        statevf_cleanup(h);
    }
}
