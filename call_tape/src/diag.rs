// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Advisory diagnostics.
//!
//! Some capture oddities are worth reporting but never stop the parse.
//! Embedders that care install a [`DiagnosticSink`] on the parser; the
//! default is to stay silent.

use alloc::string::String;
use core::fmt;

/// An advisory condition noticed while decoding. Decoding continues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A bitmask signature flag other than the first decoded to zero, so
    /// it can never match an OR-ed value.
    ZeroBitmaskFlag {
        /// Id of the bitmask signature being interned.
        bitmask: u32,
        /// Name of the offending flag.
        flag: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBitmaskFlag { bitmask, flag } => {
                write!(f, "bitmask {bitmask} flag {flag} is zero but is not first")
            }
        }
    }
}

/// Receives advisory [`Diagnostic`]s as the parser encounters them.
pub trait DiagnosticSink {
    /// Called once per diagnostic, in stream order.
    fn diagnostic(&mut self, diag: &Diagnostic);
}
