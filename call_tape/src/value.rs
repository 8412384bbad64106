// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded argument and return values.
//!
//! The wire format tags every value with one of thirteen kinds; decoding
//! produces an owned [`Value`] tree with no sharing between siblings.
//! Enum, bitmask, and struct values carry a handle to their interned
//! signature so consumers can render symbolic names without going back to
//! the parser.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::sig::{BitmaskSig, EnumSig, StructSig};

/// A single decoded value.
///
/// Values form a tree: arrays and structs own their elements, and every
/// value is exclusively owned by its parent container or by the enclosing
/// [`Call`](crate::call::Call).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The encoder wrote an explicit null (absent pointer, void argument).
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer, stored negated on the wire.
    SInt(i64),
    /// Unsigned integer.
    UInt(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Length-prefixed string.
    String(String),
    /// Symbolic constant plus the concrete value observed.
    Enum(Rc<EnumSig>, i64),
    /// OR-ed flag bits described by the signature.
    Bitmask(Rc<BitmaskSig>, u64),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Member values, indexed by position in the signature.
    Struct(Rc<StructSig>, Vec<Value>),
    /// Raw byte buffer of explicit length; may be empty.
    Blob(Vec<u8>),
    /// An opaque pointer captured by address only.
    Pointer(u64),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean payload, if this is a boolean.
    #[must_use]
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as a signed integer, if it is an integer that
    /// fits.
    #[must_use]
    pub fn to_sint(&self) -> Option<i64> {
        match self {
            Self::SInt(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            Self::Enum(_, v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as an unsigned integer, if it is a non-negative
    /// integer.
    #[must_use]
    pub fn to_uint(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            Self::SInt(v) => u64::try_from(*v).ok(),
            Self::Bitmask(_, v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as a double, widening floats and integers.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            Self::SInt(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the blob payload, if this is a blob.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the captured address, if this is an opaque pointer.
    #[must_use]
    pub fn to_pointer(&self) -> Option<u64> {
        match self {
            Self::Pointer(addr) => Some(*addr),
            _ => None,
        }
    }
}
