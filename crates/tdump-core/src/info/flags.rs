//! Bit sets carried by callables, fields and properties.

use bitflags::parser::WriteHex;
use bitflags::{bitflags, Flags};
use serde::{Deserialize, Serialize};

bitflags! {
    /// Function flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FunctionFlags: u32
    {
        const IS_METHOD = 1 << 0;
        const IS_CONSTRUCTOR = 1 << 1;
        const IS_GETTER = 1 << 2;
        const IS_SETTER = 1 << 3;
        const WRAPS_VFUNC = 1 << 4;
        const THROWS = 1 << 5;
    }
}

bitflags! {
    /// Signal emission flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SignalFlags: u32
    {
        const RUN_FIRST = 1 << 0;
        const RUN_LAST = 1 << 1;
        const RUN_CLEANUP = 1 << 2;
        const NO_RECURSE = 1 << 3;
        const DETAILED = 1 << 4;
        const ACTION = 1 << 5;
        const NO_HOOKS = 1 << 6;
        const MUST_COLLECT = 1 << 7;
        const DEPRECATED = 1 << 8;
    }
}

bitflags! {
    /// Virtual function override rules.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct VFuncFlags: u32
    {
        const MUST_CHAIN_UP = 1 << 0;
        const MUST_OVERRIDE = 1 << 1;
        const MUST_NOT_OVERRIDE = 1 << 2;
        const THROWS = 1 << 3;
    }
}

bitflags! {
    /// Field access flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FieldFlags: u32
    {
        const READABLE = 1 << 0;
        const WRITABLE = 1 << 1;
    }
}

bitflags! {
    /// Property (parameter spec) flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PropertyFlags: u32
    {
        const READABLE = 1 << 0;
        const WRITABLE = 1 << 1;
        const CONSTRUCT = 1 << 2;
        const CONSTRUCT_ONLY = 1 << 3;
        const LAX_VALIDATION = 1 << 4;
        const STATIC_NAME = 1 << 5;
        const STATIC_NICK = 1 << 6;
        const STATIC_BLURB = 1 << 7;
        const EXPLICIT_NOTIFY = 1 << 30;
        const DEPRECATED = 1 << 31;
    }
}

/// Render a flag set as `A | B`, in declaration order.
///
/// Bits without a name are appended as a hex literal, so unknown bits still
/// show up in a comparison. The empty set renders as the empty string.
pub fn render_flags<F>(flags: &F) -> String
where
    F: Flags,
    F::Bits: WriteHex,
{
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = bitflags::parser::to_writer(flags, &mut out);
    out
}
