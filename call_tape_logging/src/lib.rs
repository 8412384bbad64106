// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `log` integration for `call_tape` diagnostics.
//!
//! The decoder reports capture oddities through
//! [`DiagnosticSink`](call_tape::diag::DiagnosticSink) and stays silent by
//! default. Embedders that route observability through the `log` facade can
//! install a [`LogSink`]:
//!
//! ```
//! use call_tape::parser::Parser;
//! use call_tape::source::MemorySource;
//! use call_tape_logging::LogSink;
//!
//! let mut parser = Parser::new(MemorySource::new([4u8]))?;
//! parser.set_diagnostic_sink(Box::new(LogSink));
//! # Ok::<(), call_tape::parser::ParseError>(())
//! ```

use call_tape::diag::{Diagnostic, DiagnosticSink};

/// A [`DiagnosticSink`] that forwards every diagnostic as a `log` warning
/// under the `call_tape` target.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn diagnostic(&mut self, diag: &Diagnostic) {
        log::warn!(target: "call_tape", "{diag}");
    }
}
