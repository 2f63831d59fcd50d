//! Capability negotiation: per-port type declarations and their validation.
//!
//! A host may declare, per control input, whether that input is wired as a
//! block-rate control or a sample-accurate CV signal. This module validates a
//! batch of such declarations against a fixed vocabulary and accumulates
//! failures as OR-combined flags instead of failing fast.
//!
//! A successfully validated declaration is acknowledged but has no effect on
//! processing: `run` always samples cutoff/damping once per block.

use core::ops::{BitOr, BitOrAssign};

use crate::ports::PortIndex;

/// Accumulated validation failures from one batch of declarations.
///
/// Empty flags mean every declaration validated successfully.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionFlags(u32);

impl OptionFlags {
    pub const NONE: Self = Self(0);
    /// Declaration context is not per-port, or the subject is not a
    /// declarable port.
    pub const BAD_SUBJECT: Self = Self(1 << 0);
    /// Recognized but unsupported key.
    pub const BAD_KEY: Self = Self(1 << 1);
    /// Payload is not a port-class identifier, or names an inadmissible class.
    pub const BAD_VALUE: Self = Self(1 << 2);

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bit representation (stable: subject=1, key=2, value=4).
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for OptionFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for OptionFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// What a declaration applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptionContext {
    /// Applies to the plugin instance as a whole. Not admissible here.
    Instance,
    /// Applies to the port named by `subject`.
    Port,
}

/// Declaration keys. Only `CurrentPortType` is supported by this plugin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptionKey {
    /// The current wiring of a morphable control port.
    CurrentPortType,
    MinBlockLength,
    MaxBlockLength,
}

/// Port wiring classes a host can name in a declaration payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PortClass {
    /// One value per block.
    Control,
    /// Sample-accurate control voltage (one value per sample).
    Cv,
    /// Plain audio. Recognized, but not an admissible current type.
    Audio,
}

/// Declaration payload. The expected payload is a [`PortClass`] identifier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OptionValue {
    PortClass(PortClass),
    Int(i64),
    Float(f32),
}

/// One host declaration: "port `subject`'s `key` is `value`".
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PortOption {
    pub context: OptionContext,
    /// Raw port index the declaration concerns.
    pub subject: u32,
    pub key: OptionKey,
    pub value: OptionValue,
}

impl PortOption {
    /// Convenience constructor for the one supported declaration shape.
    #[inline]
    pub fn current_type(subject: PortIndex, class: PortClass) -> Self {
        Self {
            context: OptionContext::Port,
            subject: subject as u32,
            key: OptionKey::CurrentPortType,
            value: OptionValue::PortClass(class),
        }
    }
}

/// Validate a batch of declarations, OR-combining the failures.
///
/// Checks run in order per declaration: context, key, payload type, decoded
/// port class, subject. Later declarations are still examined after a failure
/// (the result is the union across the whole batch).
pub fn apply_options(options: &[PortOption]) -> OptionFlags {
    let mut flags = OptionFlags::NONE;
    for opt in options {
        if opt.context != OptionContext::Port {
            flags |= OptionFlags::BAD_SUBJECT;
        } else if opt.key != OptionKey::CurrentPortType {
            flags |= OptionFlags::BAD_KEY;
        } else {
            let class = match opt.value {
                OptionValue::PortClass(class) => class,
                _ => {
                    flags |= OptionFlags::BAD_VALUE;
                    continue;
                }
            };
            if !matches!(class, PortClass::Control | PortClass::Cv) {
                flags |= OptionFlags::BAD_VALUE;
                continue;
            }
            match PortIndex::from_index(opt.subject) {
                Some(PortIndex::Cutoff) | Some(PortIndex::Damping) => {
                    // Accepted. The distinction is not (yet) wired into the
                    // audio path; controls stay block-rate.
                }
                _ => flags |= OptionFlags::BAD_SUBJECT,
            }
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_declarations_produce_no_flags() {
        for subject in [PortIndex::Cutoff, PortIndex::Damping] {
            for class in [PortClass::Control, PortClass::Cv] {
                let flags = apply_options(&[PortOption::current_type(subject, class)]);
                assert!(flags.is_empty(), "{subject:?} {class:?} -> {flags:?}");
            }
        }
    }

    #[test]
    fn non_port_context_is_bad_subject() {
        let mut opt = PortOption::current_type(PortIndex::Cutoff, PortClass::Cv);
        opt.context = OptionContext::Instance;
        assert_eq!(apply_options(&[opt]), OptionFlags::BAD_SUBJECT);
    }

    #[test]
    fn undeclarable_subject_is_bad_subject() {
        let mut opt = PortOption::current_type(PortIndex::Cutoff, PortClass::Control);
        opt.subject = PortIndex::Input as u32;
        assert_eq!(apply_options(&[opt]), OptionFlags::BAD_SUBJECT);

        opt.subject = 42;
        assert_eq!(apply_options(&[opt]), OptionFlags::BAD_SUBJECT);
    }

    #[test]
    fn unsupported_key_is_bad_key() {
        let mut opt = PortOption::current_type(PortIndex::Damping, PortClass::Control);
        opt.key = OptionKey::MinBlockLength;
        assert_eq!(apply_options(&[opt]), OptionFlags::BAD_KEY);
    }

    #[test]
    fn wrong_payload_is_bad_value() {
        let mut opt = PortOption::current_type(PortIndex::Cutoff, PortClass::Control);
        opt.value = OptionValue::Int(1);
        assert_eq!(apply_options(&[opt]), OptionFlags::BAD_VALUE);

        // A recognized class that is not an admissible current type.
        opt.value = OptionValue::PortClass(PortClass::Audio);
        assert_eq!(apply_options(&[opt]), OptionFlags::BAD_VALUE);
    }

    #[test]
    fn batch_flags_are_the_union() {
        let valid = PortOption::current_type(PortIndex::Cutoff, PortClass::Cv);
        let mut bad_key = valid;
        bad_key.key = OptionKey::MaxBlockLength;
        let mut bad_value = valid;
        bad_value.value = OptionValue::Float(0.5);

        // The valid declaration contributes nothing.
        assert_eq!(apply_options(&[valid, bad_key]), OptionFlags::BAD_KEY);

        let flags = apply_options(&[bad_key, valid, bad_value]);
        assert!(flags.contains(OptionFlags::BAD_KEY));
        assert!(flags.contains(OptionFlags::BAD_VALUE));
        assert!(!flags.contains(OptionFlags::BAD_SUBJECT));
        assert_eq!(flags, OptionFlags::BAD_KEY | OptionFlags::BAD_VALUE);
    }

    #[test]
    fn empty_batch_is_clean() {
        assert!(apply_options(&[]).is_empty());
    }
}
