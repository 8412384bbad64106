// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interned signature records.
//!
//! The capture format is self-describing: the first time a function,
//! struct, enum, or bitmask appears, its signature body is spelled out
//! inline; afterwards only the compact id is written. The parser interns
//! each body once and hands out [`Rc`] handles, so every call referencing
//! signature `i` observes the same allocation for the whole session.
//!
//! Ids are dense small integers assigned by the encoder, which is why the
//! tables below are growable indexed arrays rather than maps.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::call::CallFlags;

/// Shape of a captured function: its name and argument names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSig {
    /// Dense id assigned by the encoder.
    pub id: u32,
    /// Function name as spelled by the traced API.
    pub name: String,
    /// Argument names, in call order.
    pub arg_names: Vec<String>,
    /// Classification flags resolved from the name when the signature was
    /// first interned.
    pub flags: CallFlags,
}

/// Shape of a captured struct: its name and member names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructSig {
    /// Dense id assigned by the encoder.
    pub id: u32,
    /// Struct type name.
    pub name: String,
    /// Member names, in declaration order.
    pub member_names: Vec<String>,
}

/// One symbolic constant of an enum signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    /// Symbolic name.
    pub name: String,
    /// Concrete value.
    pub value: i64,
}

/// The symbolic constants an enum value may take.
///
/// Captures older than format version 3 carried exactly one constant per
/// signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumSig {
    /// Dense id assigned by the encoder.
    pub id: u32,
    /// Known constants, as transmitted.
    pub values: Vec<EnumValue>,
}

/// One named flag bit of a bitmask signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmaskFlag {
    /// Symbolic name.
    pub name: String,
    /// Flag bits; zero is only meaningful for the first flag.
    pub value: u64,
}

/// The named flag bits a bitmask value is composed of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmaskSig {
    /// Dense id assigned by the encoder.
    pub id: u32,
    /// Known flags, as transmitted.
    pub flags: Vec<BitmaskFlag>,
}

/// A signature slot: the interned record plus the stream offset just past
/// the body it was decoded from.
///
/// The offset detects retransmission. When the encoder repeats a body (it
/// does so after reopening its output) and the parser re-reads it after a
/// backwards seek, the current offset is below this mark and the body must
/// be skipped instead of re-interned.
#[derive(Clone, Debug)]
pub(crate) struct Interned<T> {
    pub(crate) sig: Rc<T>,
    pub(crate) end_offset: u64,
}

/// An id-indexed table of interned signatures.
#[derive(Clone, Debug)]
pub(crate) struct SigTable<T> {
    slots: Vec<Option<Interned<T>>>,
}

impl<T> SigTable<T> {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Looks up `id`, growing the table so the id's slot exists.
    ///
    /// Returns `None` for an id never interned; the caller is expected to
    /// decode the inline body and [`insert`](Self::insert) it.
    pub(crate) fn lookup(&mut self, id: usize) -> Option<&Interned<T>> {
        if id >= self.slots.len() {
            self.slots.resize_with(id + 1, || None);
            return None;
        }
        self.slots[id].as_ref()
    }

    /// Fills the slot for `id`. The slot must already exist (a preceding
    /// [`lookup`](Self::lookup) grew the table).
    pub(crate) fn insert(&mut self, id: usize, sig: Rc<T>, end_offset: u64) {
        debug_assert!(id < self.slots.len(), "insert without a prior lookup");
        self.slots[id] = Some(Interned { sig, end_offset });
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;

    use super::{EnumSig, EnumValue, SigTable};

    #[test]
    fn lookup_grows_the_table_and_misses() {
        let mut table: SigTable<EnumSig> = SigTable::new();
        assert!(table.lookup(7).is_none());
        // The grown slots are all empty, not just the requested one.
        assert!(table.lookup(3).is_none());
    }

    #[test]
    fn insert_then_lookup_returns_the_same_allocation() {
        let mut table = SigTable::new();
        let sig = Rc::new(EnumSig {
            id: 2,
            values: vec![EnumValue {
                name: "A".into(),
                value: 1,
            }],
        });
        table.lookup(2);
        table.insert(2, Rc::clone(&sig), 11);
        let entry = table.lookup(2).expect("interned");
        assert!(Rc::ptr_eq(&entry.sig, &sig));
        assert_eq!(entry.end_offset, 11);
    }
}
