// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded calls and their classification flags.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::ops::{BitOr, BitOrAssign};

use crate::sig::FunctionSig;
use crate::value::Value;

/// A bitset classifying a call.
///
/// Most bits are assigned by an external [`CallFlagSource`] when a function
/// signature is first interned; the parser itself only ever sets
/// [`CallFlags::INCOMPLETE`] and [`CallFlags::VERBOSE`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CallFlags(u32);

impl BitOr for CallFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CallFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl CallFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// The call was injected by the tracer rather than the traced program.
    pub const FAKE: Self = Self(1 << 0);
    /// Replaying the call may not reproduce the captured behavior.
    pub const NON_REPRODUCIBLE: Self = Self(1 << 1);
    /// The call has no side effects worth replaying.
    pub const NO_SIDE_EFFECTS: Self = Self(1 << 2);
    /// The call renders into the current target.
    pub const RENDER: Self = Self(1 << 3);
    /// The call swaps the render target.
    pub const SWAP_RENDERTARGET: Self = Self(1 << 4);
    /// The call ends the current frame.
    pub const END_FRAME: Self = Self(1 << 5);
    /// The capture ended before this call's leave event was seen.
    pub const INCOMPLETE: Self = Self(1 << 6);
    /// The call carries no information; viewers may hide it by default.
    pub const VERBOSE: Self = Self(1 << 7);

    /// Builds a flag set from raw bits (the external lookup table's
    /// representation).
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit in `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// Classifies well-known API names into [`CallFlags`].
///
/// The real table ships with the API-specific front end; the parser treats
/// the result as opaque bits, resolves it once per signature, and never
/// compares names per call.
pub trait CallFlagSource {
    /// Returns the flags for a function name. Unknown names map to
    /// [`CallFlags::NONE`].
    fn call_flags(&self, name: &str) -> CallFlags;
}

/// A [`CallFlagSource`] that knows no names.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoCallFlags;

impl CallFlagSource for NoCallFlags {
    fn call_flags(&self, _name: &str) -> CallFlags {
        CallFlags::NONE
    }
}

/// One captured invocation, assembled from its enter and leave events.
///
/// A call owns its value tree and a handle to its interned signature, so it
/// stays fully usable after the parser that produced it is gone.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    /// Call number: dense, strictly increasing from zero within a decoding
    /// session.
    pub no: u32,
    /// Id of the thread that made the call (zero for captures older than
    /// format version 4).
    pub thread_id: u32,
    /// The interned function signature.
    pub sig: Rc<FunctionSig>,
    /// Classification flags; starts from the signature's flags.
    pub flags: CallFlags,
    /// Arguments by position. The encoder may leave gaps, which decode as
    /// [`Value::Null`].
    pub args: Vec<Value>,
    /// Return value, if one was captured.
    pub ret: Option<Value>,
    /// Time of the call as captured in the leave event.
    pub call_time: Option<Value>,
}

impl Call {
    /// The function name, straight from the signature.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.sig.name
    }

    /// Bounds-checked argument access; gaps read as [`Value::Null`].
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::{CallFlagSource, CallFlags, NoCallFlags};

    #[test]
    fn flags_combine_and_test() {
        let mut flags = CallFlags::RENDER | CallFlags::END_FRAME;
        assert!(flags.contains(CallFlags::RENDER));
        assert!(!flags.contains(CallFlags::VERBOSE));
        flags |= CallFlags::VERBOSE;
        assert!(flags.contains(CallFlags::RENDER | CallFlags::VERBOSE));
        assert!(CallFlags::NONE.contains(CallFlags::NONE));
    }

    #[test]
    fn raw_bits_round_trip() {
        let flags = CallFlags::from_bits(0b1010_0001);
        assert_eq!(flags.bits(), 0b1010_0001);
    }

    #[test]
    fn default_lookup_knows_nothing() {
        assert_eq!(NoCallFlags.call_flags("glDrawArrays"), CallFlags::NONE);
    }
}
