// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `call_tape`: a streaming decoder for captured API-call traces.
//!
//! A capture is a byte stream of interleaved enter/leave events produced by
//! an API-interception tracer. The format is self-describing: function,
//! struct, enum, and bitmask signatures are spelled out inline the first
//! time they appear and referenced by compact id afterwards. The parser
//! interns signatures as it goes, pairs each leave event with its pending
//! enter (calls from concurrent threads interleave), and hands back one
//! owned [`call::Call`] at a time. [`parser::Bookmark`]s allow replay from
//! any previously observed position.
//!
//! ## Example
//! ```
//! use call_tape::parser::{ParseMode, Parser};
//! use call_tape::source::MemorySource;
//! use call_tape::value::Value;
//!
//! // Version 4; one call to "foo" on thread 0, entered and left.
//! let capture: &[u8] = &[
//!     4, // format version
//!     0, 0, 0, 3, b'f', b'o', b'o', 0, 4, // ENTER, thread 0, sig 0 = foo/0, END
//!     1, 4, 0, 0, 4, // LEAVE, call_time UINT 0, call_no 0, END
//! ];
//! let mut parser = Parser::new(MemorySource::new(capture))?;
//! let call = parser.parse_call(ParseMode::Full)?.expect("one call");
//! assert_eq!(call.name(), "foo");
//! assert_eq!(call.no, 0);
//! assert_eq!(call.call_time, Some(Value::UInt(0)));
//! assert!(parser.parse_call(ParseMode::Full)?.is_none());
//! # Ok::<(), call_tape::parser::ParseError>(())
//! ```

#![no_std]

extern crate alloc;

pub mod call;
pub mod diag;
pub mod format;
pub mod parser;
pub mod sig;
pub mod source;
pub mod value;
