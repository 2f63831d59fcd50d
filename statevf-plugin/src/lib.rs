//! StateVF Plugin — ports, lifecycle, and capability negotiation.
//!
//! Crate layout:
//! - [`ports`]   : port indices and the borrowed per-block buffer view
//! - [`options`] : per-port type declarations and their batch validation
//! - [`plugin`]  : the [`Plugin`] lifecycle trait, the concrete [`SvfPlugin`],
//!   and the static descriptor registry
//!
//! The audio path is allocation-free: `run` borrows host buffers for one
//! block and advances the filter's delay state, nothing else. Options calls
//! may come from a non-realtime thread; they share no mutable state with
//! `run`.

pub mod options;
pub mod plugin;
pub mod ports;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use options::{apply_options, OptionFlags, PortClass, PortOption};
pub use plugin::{descriptor, Descriptor, Extension, OptionsInterface, Plugin, SvfPlugin};
pub use ports::{PortIndex, Ports, PORT_COUNT};
