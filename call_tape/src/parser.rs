// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The streaming call decoder.
//!
//! [`Parser`] pulls one-byte events off a [`ByteSource`] and assembles
//! [`Call`]s. Enter and leave events for one call may be separated by
//! events of other threads, so half-built calls wait in a pending buffer
//! keyed by call number until their leave arrives, or until EOF surfaces
//! them flagged [`CallFlags::INCOMPLETE`].
//!
//! Signature interning happens on the fly: the id tables grow as ids
//! appear, and a body re-encountered after a backwards seek (the encoder
//! retransmits signatures after reopening its output) is structurally
//! skipped instead of re-interned, keeping handles stable across
//! [`Bookmark`] restores.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::call::{Call, CallFlagSource, CallFlags, NoCallFlags};
use crate::diag::{Diagnostic, DiagnosticSink};
use crate::format::{self, DetailTag, EventTag, ValueTag, TRACE_VERSION};
use crate::sig::{
    BitmaskFlag, BitmaskSig, EnumSig, EnumValue, FunctionSig, SigTable, StructSig,
};
use crate::source::ByteSource;
use crate::value::Value;

/// A fatal decode failure.
///
/// After any of these the stream position is no longer trustworthy and
/// decoding cannot continue; truncation, by contrast, is never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The capture was written by a newer tracer than this decoder knows.
    UnsupportedVersion {
        /// Version found in the stream header.
        version: u64,
    },
    /// An event tag that is neither enter nor leave.
    UnknownEvent {
        /// The raw tag byte.
        tag: u8,
    },
    /// A call detail tag that is none of arg/ret/end.
    UnknownCallDetail {
        /// Name of the call whose details were being decoded.
        call: String,
        /// The raw tag byte.
        tag: u8,
    },
    /// A value type tag outside the known range.
    UnknownValueType {
        /// The raw tag byte.
        tag: u8,
    },
    /// An integer value carried a non-integer type tag.
    UnexpectedIntType {
        /// The raw tag byte.
        tag: u8,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported trace format version {version}")
            }
            Self::UnknownEvent { tag } => write!(f, "unknown event {tag}"),
            Self::UnknownCallDetail { call, tag } => {
                write!(f, "({call}) unknown call detail {tag}")
            }
            Self::UnknownValueType { tag } => write!(f, "unknown value type {tag}"),
            Self::UnexpectedIntType { tag } => {
                write!(f, "unexpected type {tag} for an integer value")
            }
        }
    }
}

impl core::error::Error for ParseError {}

/// Materialization hint threaded through call detail parsing.
///
/// Reserved for selective materialization of argument values; every mode
/// currently decodes in full.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Materialize every argument and return value.
    #[default]
    Full,
}

/// A resumable stream position.
///
/// Bookmarks deliberately do not snapshot the signature tables; restoring
/// one relies on the retransmission skip to reconcile any signature bodies
/// re-read after the seek.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bookmark {
    /// Stream offset to resume from.
    pub offset: u64,
    /// Call number the next enter event will be assigned.
    pub next_call_no: u32,
}

/// A streaming decoder over one capture.
///
/// See the [crate docs](crate) for an end-to-end example. The parser is
/// single-threaded and non-reentrant; decode independent captures with
/// independent parsers.
pub struct Parser<S, L = NoCallFlags> {
    source: S,
    version: u32,
    functions: SigTable<FunctionSig>,
    structs: SigTable<StructSig>,
    enums: SigTable<EnumSig>,
    bitmasks: SigTable<BitmaskSig>,
    pending: VecDeque<Call>,
    next_call_no: u32,
    flag_source: L,
    get_error_sig: Option<Rc<FunctionSig>>,
    diag: Option<Box<dyn DiagnosticSink>>,
}

impl<S: ByteSource> Parser<S> {
    /// Opens a capture, resolving no call flags.
    ///
    /// Reads the version header; fails if the capture is newer than
    /// [`TRACE_VERSION`].
    pub fn new(source: S) -> Result<Self, ParseError> {
        Self::with_flag_source(source, NoCallFlags)
    }
}

impl<S: ByteSource, L: CallFlagSource> Parser<S, L> {
    /// Opens a capture with an external name→flags table.
    ///
    /// Reads the version header; fails if the capture is newer than
    /// [`TRACE_VERSION`].
    pub fn with_flag_source(mut source: S, flag_source: L) -> Result<Self, ParseError> {
        let version = format::read_uint(&mut source);
        if version > u64::from(TRACE_VERSION) {
            return Err(ParseError::UnsupportedVersion { version });
        }
        Ok(Self {
            source,
            version: version as u32,
            functions: SigTable::new(),
            structs: SigTable::new(),
            enums: SigTable::new(),
            bitmasks: SigTable::new(),
            pending: VecDeque::new(),
            next_call_no: 0,
            flag_source,
            get_error_sig: None,
            diag: None,
        })
    }

    /// The capture's format version.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Installs a sink for advisory diagnostics.
    pub fn set_diagnostic_sink(&mut self, sink: Box<dyn DiagnosticSink>) {
        self.diag = Some(sink);
    }

    /// Consumes the parser and returns the byte source, discarding any
    /// pending calls and interned signatures.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Captures the current stream position for a later
    /// [`set_bookmark`](Self::set_bookmark).
    #[must_use]
    pub fn bookmark(&self) -> Bookmark {
        Bookmark {
            offset: self.source.offset(),
            next_call_no: self.next_call_no,
        }
    }

    /// Rewinds (or fast-forwards) to a previously captured [`Bookmark`].
    ///
    /// Pending half-built calls are discarded; interned signatures are
    /// kept, and stay valid because ids never change meaning within one
    /// capture.
    pub fn set_bookmark(&mut self, bookmark: Bookmark) {
        self.source.seek(bookmark.offset);
        self.next_call_no = bookmark.next_call_no;
        self.pending.clear();
    }

    /// Decodes until one call completes and returns it.
    ///
    /// `Ok(None)` means the stream is exhausted, or that a leave event
    /// could not be paired or finished (its call is dropped, exactly as the
    /// capture left it). Once the stream is exhausted, each remaining
    /// pending call is surfaced oldest-first with
    /// [`CallFlags::INCOMPLETE`] set before `None` becomes final.
    pub fn parse_call(&mut self, mode: ParseMode) -> Result<Option<Call>, ParseError> {
        loop {
            let Some(tag) = self.source.read_byte() else {
                return Ok(self.pending.pop_front().map(|mut call| {
                    call.flags |= CallFlags::INCOMPLETE;
                    self.adjust_call_flags(&mut call);
                    call
                }));
            };
            match EventTag::from_u8(tag) {
                Some(EventTag::Enter) => self.parse_enter(mode)?,
                Some(EventTag::Leave) => {
                    let mut call = self.parse_leave(mode)?;
                    if let Some(call) = &mut call {
                        self.adjust_call_flags(call);
                    }
                    return Ok(call);
                }
                None => return Err(ParseError::UnknownEvent { tag }),
            }
        }
    }

    fn parse_enter(&mut self, mode: ParseMode) -> Result<(), ParseError> {
        let thread_id = if self.version >= 4 {
            format::read_uint(&mut self.source) as u32
        } else {
            0
        };
        let sig = self.parse_function_sig();
        let mut call = Call {
            no: self.next_call_no,
            thread_id,
            flags: sig.flags,
            sig,
            args: Vec::new(),
            ret: None,
            call_time: None,
        };
        self.next_call_no += 1;
        if self.parse_call_details(&mut call, mode)? {
            self.pending.push_back(call);
        }
        Ok(())
    }

    fn parse_leave(&mut self, mode: ParseMode) -> Result<Option<Call>, ParseError> {
        let call_time = self.parse_value(mode)?;
        let call_no = format::read_uint(&mut self.source) as u32;
        // In-flight calls are bounded by thread count, so a scan beats a map.
        let Some(at) = self.pending.iter().position(|call| call.no == call_no) else {
            return Ok(None);
        };
        let Some(mut call) = self.pending.remove(at) else {
            return Ok(None);
        };
        call.call_time = call_time;
        if self.parse_call_details(&mut call, mode)? {
            Ok(Some(call))
        } else {
            Ok(None)
        }
    }

    fn parse_call_details(&mut self, call: &mut Call, mode: ParseMode) -> Result<bool, ParseError> {
        loop {
            let Some(tag) = self.source.read_byte() else {
                return Ok(false);
            };
            match DetailTag::from_u8(tag) {
                Some(DetailTag::End) => return Ok(true),
                Some(DetailTag::Arg) => self.parse_arg(call, mode)?,
                Some(DetailTag::Ret) => call.ret = self.parse_value(mode)?,
                None => {
                    return Err(ParseError::UnknownCallDetail {
                        call: call.name().into(),
                        tag,
                    })
                }
            }
        }
    }

    fn parse_arg(&mut self, call: &mut Call, mode: ParseMode) -> Result<(), ParseError> {
        let index = format::read_uint(&mut self.source) as usize;
        if let Some(value) = self.parse_value(mode)? {
            if index >= call.args.len() {
                call.args.resize(index + 1, Value::Null);
            }
            call.args[index] = value;
        }
        Ok(())
    }

    /// Per-call flag fixups.
    ///
    /// Runs for every call, so no name comparisons here; those happen once
    /// at signature interning time.
    fn adjust_call_flags(&self, call: &mut Call) {
        // glGetError() returning GL_NO_ERROR carries no information.
        let Some(get_error) = &self.get_error_sig else {
            return;
        };
        if Rc::ptr_eq(&call.sig, get_error)
            && call.ret.as_ref().and_then(Value::to_sint) == Some(0)
        {
            call.flags |= CallFlags::VERBOSE;
        }
    }

    fn parse_function_sig(&mut self) -> Rc<FunctionSig> {
        let id = format::read_uint(&mut self.source) as usize;
        if let Some(entry) = self.functions.lookup(id) {
            let sig = Rc::clone(&entry.sig);
            let end_offset = entry.end_offset;
            if self.source.offset() < end_offset {
                // Retransmitted body: consume it without re-interning.
                format::skip_string(&mut self.source); // name
                let num_args = format::read_uint(&mut self.source);
                for _ in 0..num_args {
                    format::skip_string(&mut self.source);
                }
            }
            return sig;
        }
        let name = format::read_string(&mut self.source);
        let num_args = format::read_uint(&mut self.source) as usize;
        let mut arg_names = Vec::with_capacity(num_args);
        for _ in 0..num_args {
            arg_names.push(format::read_string(&mut self.source));
        }
        let sig = Rc::new(FunctionSig {
            id: id as u32,
            flags: self.flag_source.call_flags(&name),
            name,
            arg_names,
        });
        self.functions
            .insert(id, Rc::clone(&sig), self.source.offset());
        // Remember signatures the per-call adjustment pass needs, so it can
        // compare handles instead of names.
        if sig.arg_names.is_empty() && sig.name == "glGetError" {
            self.get_error_sig = Some(Rc::clone(&sig));
        }
        sig
    }

    fn parse_struct_sig(&mut self) -> Rc<StructSig> {
        let id = format::read_uint(&mut self.source) as usize;
        if let Some(entry) = self.structs.lookup(id) {
            let sig = Rc::clone(&entry.sig);
            let end_offset = entry.end_offset;
            if self.source.offset() < end_offset {
                format::skip_string(&mut self.source); // name
                let num_members = format::read_uint(&mut self.source);
                for _ in 0..num_members {
                    format::skip_string(&mut self.source);
                }
            }
            return sig;
        }
        let name = format::read_string(&mut self.source);
        let num_members = format::read_uint(&mut self.source) as usize;
        let mut member_names = Vec::with_capacity(num_members);
        for _ in 0..num_members {
            member_names.push(format::read_string(&mut self.source));
        }
        let sig = Rc::new(StructSig {
            id: id as u32,
            name,
            member_names,
        });
        self.structs
            .insert(id, Rc::clone(&sig), self.source.offset());
        sig
    }

    fn parse_enum_sig(&mut self) -> Result<Rc<EnumSig>, ParseError> {
        let id = format::read_uint(&mut self.source) as usize;
        if let Some(entry) = self.enums.lookup(id) {
            let sig = Rc::clone(&entry.sig);
            let end_offset = entry.end_offset;
            if self.source.offset() < end_offset {
                let num_values = format::read_uint(&mut self.source);
                for _ in 0..num_values {
                    format::skip_string(&mut self.source); // name
                    self.skip_sint(); // value
                }
            }
            return Ok(sig);
        }
        let num_values = format::read_uint(&mut self.source) as usize;
        let mut values = Vec::with_capacity(num_values);
        for _ in 0..num_values {
            let name = format::read_string(&mut self.source);
            let value = self.read_sint()?;
            values.push(EnumValue { name, value });
        }
        let sig = Rc::new(EnumSig {
            id: id as u32,
            values,
        });
        self.enums.insert(id, Rc::clone(&sig), self.source.offset());
        Ok(sig)
    }

    /// Enum signatures before format version 3 carried a single name/value
    /// pair and no count.
    fn parse_old_enum_sig(&mut self) -> Result<Rc<EnumSig>, ParseError> {
        let id = format::read_uint(&mut self.source) as usize;
        if let Some(entry) = self.enums.lookup(id) {
            let sig = Rc::clone(&entry.sig);
            let end_offset = entry.end_offset;
            if self.source.offset() < end_offset {
                format::skip_string(&mut self.source); // name
                self.scan_value()?; // value
            }
            return Ok(sig);
        }
        let name = format::read_string(&mut self.source);
        let value = self.read_sint()?;
        let sig = Rc::new(EnumSig {
            id: id as u32,
            values: alloc::vec![EnumValue { name, value }],
        });
        self.enums.insert(id, Rc::clone(&sig), self.source.offset());
        Ok(sig)
    }

    fn parse_bitmask_sig(&mut self) -> Rc<BitmaskSig> {
        let id = format::read_uint(&mut self.source) as usize;
        if let Some(entry) = self.bitmasks.lookup(id) {
            let sig = Rc::clone(&entry.sig);
            let end_offset = entry.end_offset;
            if self.source.offset() < end_offset {
                let num_flags = format::read_uint(&mut self.source);
                for _ in 0..num_flags {
                    format::skip_string(&mut self.source); // name
                    format::skip_uint(&mut self.source); // value
                }
            }
            return sig;
        }
        let num_flags = format::read_uint(&mut self.source) as usize;
        let mut flags = Vec::with_capacity(num_flags);
        for i in 0..num_flags {
            let name = format::read_string(&mut self.source);
            let value = format::read_uint(&mut self.source);
            if value == 0 && i != 0 {
                self.emit(Diagnostic::ZeroBitmaskFlag {
                    bitmask: id as u32,
                    flag: name.clone(),
                });
            }
            flags.push(BitmaskFlag { name, value });
        }
        let sig = Rc::new(BitmaskSig {
            id: id as u32,
            flags,
        });
        self.bitmasks
            .insert(id, Rc::clone(&sig), self.source.offset());
        sig
    }

    fn emit(&mut self, diag: Diagnostic) {
        if let Some(sink) = &mut self.diag {
            sink.diagnostic(&diag);
        }
    }

    /// Reads one tagged integer. EOF reads as zero; a non-integer tag is
    /// fatal.
    fn read_sint(&mut self) -> Result<i64, ParseError> {
        let Some(tag) = self.source.read_byte() else {
            return Ok(0);
        };
        match ValueTag::from_u8(tag) {
            Some(ValueTag::Sint) => {
                Ok((format::read_uint(&mut self.source) as i64).wrapping_neg())
            }
            Some(ValueTag::Uint) => Ok(format::read_uint(&mut self.source) as i64),
            _ => Err(ParseError::UnexpectedIntType { tag }),
        }
    }

    fn skip_sint(&mut self) {
        self.source.skip(1); // tag
        format::skip_uint(&mut self.source);
    }

    /// Decodes one tagged value. `Ok(None)` means EOF before the tag.
    fn parse_value(&mut self, mode: ParseMode) -> Result<Option<Value>, ParseError> {
        let Some(tag) = self.source.read_byte() else {
            return Ok(None);
        };
        let value = match ValueTag::from_u8(tag) {
            Some(ValueTag::Null) => Value::Null,
            Some(ValueTag::False) => Value::Bool(false),
            Some(ValueTag::True) => Value::Bool(true),
            Some(ValueTag::Sint) => {
                Value::SInt((format::read_uint(&mut self.source) as i64).wrapping_neg())
            }
            Some(ValueTag::Uint) => Value::UInt(format::read_uint(&mut self.source)),
            Some(ValueTag::Float) => Value::Float(format::read_f32(&mut self.source)),
            Some(ValueTag::Double) => Value::Double(format::read_f64(&mut self.source)),
            Some(ValueTag::String) => Value::String(format::read_string(&mut self.source)),
            Some(ValueTag::Enum) => self.parse_enum()?,
            Some(ValueTag::Bitmask) => {
                let sig = self.parse_bitmask_sig();
                Value::Bitmask(sig, format::read_uint(&mut self.source))
            }
            Some(ValueTag::Array) => {
                let len = format::read_uint(&mut self.source) as usize;
                let mut values = Vec::with_capacity(len);
                for _ in 0..len {
                    values.push(self.parse_value(mode)?.unwrap_or(Value::Null));
                }
                Value::Array(values)
            }
            Some(ValueTag::Struct) => {
                let sig = self.parse_struct_sig();
                let num_members = sig.member_names.len();
                let mut members = Vec::with_capacity(num_members);
                for _ in 0..num_members {
                    members.push(self.parse_value(mode)?.unwrap_or(Value::Null));
                }
                Value::Struct(sig, members)
            }
            Some(ValueTag::Blob) => {
                let size = format::read_uint(&mut self.source) as usize;
                let mut buf = alloc::vec![0u8; size];
                if size != 0 {
                    self.source.read(&mut buf);
                }
                Value::Blob(buf)
            }
            Some(ValueTag::Opaque) => Value::Pointer(format::read_uint(&mut self.source)),
            None => return Err(ParseError::UnknownValueType { tag }),
        };
        Ok(Some(value))
    }

    fn parse_enum(&mut self) -> Result<Value, ParseError> {
        if self.version >= 3 {
            let sig = self.parse_enum_sig()?;
            let value = self.read_sint()?;
            Ok(Value::Enum(sig, value))
        } else {
            let sig = self.parse_old_enum_sig()?;
            debug_assert_eq!(sig.values.len(), 1);
            let value = sig.values.first().map_or(0, |v| v.value);
            Ok(Value::Enum(sig, value))
        }
    }

    /// Advances past one tagged value without materializing it.
    ///
    /// Signatures encountered along the way still go through the interner,
    /// since their ids must reconcile; payloads are skipped structurally.
    fn scan_value(&mut self) -> Result<(), ParseError> {
        let Some(tag) = self.source.read_byte() else {
            return Ok(());
        };
        match ValueTag::from_u8(tag) {
            Some(ValueTag::Null | ValueTag::False | ValueTag::True) => {}
            Some(ValueTag::Sint | ValueTag::Uint | ValueTag::Opaque) => {
                format::skip_uint(&mut self.source);
            }
            Some(ValueTag::Float) => self.source.skip(4),
            Some(ValueTag::Double) => self.source.skip(8),
            Some(ValueTag::String) => format::skip_string(&mut self.source),
            Some(ValueTag::Enum) => {
                if self.version >= 3 {
                    self.parse_enum_sig()?;
                    self.skip_sint();
                } else {
                    self.parse_old_enum_sig()?;
                }
            }
            Some(ValueTag::Bitmask) => {
                self.parse_bitmask_sig();
                format::skip_uint(&mut self.source);
            }
            Some(ValueTag::Array) => {
                let len = format::read_uint(&mut self.source);
                for _ in 0..len {
                    self.scan_value()?;
                }
            }
            Some(ValueTag::Struct) => {
                let sig = self.parse_struct_sig();
                for _ in 0..sig.member_names.len() {
                    self.scan_value()?;
                }
            }
            Some(ValueTag::Blob) => {
                let size = format::read_uint(&mut self.source);
                if size != 0 {
                    self.source.skip(size);
                }
            }
            None => return Err(ParseError::UnknownValueType { tag }),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{Bookmark, ParseError, ParseMode, Parser};
    use crate::source::{ByteSource, MemorySource};
    use crate::value::Value;

    fn uint(out: &mut Vec<u8>, mut v: u64) {
        loop {
            let mut b = (v & 0x7f) as u8;
            v >>= 7;
            if v != 0 {
                b |= 0x80;
            }
            out.push(b);
            if v == 0 {
                return;
            }
        }
    }

    fn string(out: &mut Vec<u8>, s: &str) {
        uint(out, s.len() as u64);
        out.extend_from_slice(s.as_bytes());
    }

    fn parser(bytes: Vec<u8>) -> Parser<MemorySource> {
        Parser::new(MemorySource::new(bytes)).expect("header")
    }

    #[test]
    fn too_new_a_version_is_rejected() {
        let err = Parser::new(MemorySource::new([5u8])).err();
        assert_eq!(err, Some(ParseError::UnsupportedVersion { version: 5 }));
    }

    #[test]
    fn version_header_is_exposed() {
        let p = parser(alloc::vec![2]);
        assert_eq!(p.version(), 2);
    }

    #[test]
    fn unknown_event_is_fatal() {
        let mut p = parser(alloc::vec![4, 9]);
        assert_eq!(
            p.parse_call(ParseMode::Full),
            Err(ParseError::UnknownEvent { tag: 9 })
        );
    }

    #[test]
    fn unknown_call_detail_is_fatal() {
        let mut bytes = alloc::vec![4, 0, 0]; // version, ENTER, thread 0
        uint(&mut bytes, 0); // sig id
        string(&mut bytes, "f");
        uint(&mut bytes, 0); // no args
        bytes.push(9); // bogus detail tag
        let mut p = parser(bytes);
        assert_eq!(
            p.parse_call(ParseMode::Full),
            Err(ParseError::UnknownCallDetail {
                call: "f".into(),
                tag: 9
            })
        );
    }

    #[test]
    fn unknown_value_type_is_fatal() {
        let mut bytes = alloc::vec![4, 0, 0];
        uint(&mut bytes, 0);
        string(&mut bytes, "f");
        uint(&mut bytes, 0);
        bytes.push(2); // CALL_ARG
        uint(&mut bytes, 0); // index
        bytes.push(0x0E); // bogus value tag
        let mut p = parser(bytes);
        assert_eq!(
            p.parse_call(ParseMode::Full),
            Err(ParseError::UnknownValueType { tag: 0x0E })
        );
    }

    #[test]
    fn eof_surfaces_pending_calls_oldest_first() {
        let mut bytes = alloc::vec![4u8];
        for name in ["first", "second"] {
            bytes.push(0); // ENTER
            uint(&mut bytes, 7); // thread
            uint(&mut bytes, if name == "first" { 0 } else { 1 });
            string(&mut bytes, name);
            uint(&mut bytes, 0);
            bytes.push(4); // CALL_END
        }
        let mut p = parser(bytes);
        let first = p.parse_call(ParseMode::Full).unwrap().expect("first");
        assert_eq!(first.name(), "first");
        assert_eq!(first.no, 0);
        assert!(first.flags.contains(crate::call::CallFlags::INCOMPLETE));
        let second = p.parse_call(ParseMode::Full).unwrap().expect("second");
        assert_eq!(second.name(), "second");
        assert_eq!(second.no, 1);
        assert!(p.parse_call(ParseMode::Full).unwrap().is_none());
    }

    #[test]
    fn old_captures_default_the_thread_id_and_enum_shape() {
        // Version 2: no thread id on enter, single-constant enum sigs whose
        // value comes from the signature itself.
        let mut bytes = alloc::vec![2u8, 0]; // version, ENTER
        uint(&mut bytes, 0);
        string(&mut bytes, "f");
        uint(&mut bytes, 1);
        string(&mut bytes, "e");
        bytes.push(2); // CALL_ARG
        uint(&mut bytes, 0); // index
        bytes.push(0x08); // ENUM
        uint(&mut bytes, 0); // enum sig id
        string(&mut bytes, "GL_DEPTH_TEST");
        bytes.push(0x04); // value: UINT 2929
        uint(&mut bytes, 2929);
        bytes.push(4); // CALL_END
        bytes.push(1); // LEAVE
        bytes.push(0x04); // call time: UINT 0
        uint(&mut bytes, 0);
        uint(&mut bytes, 0); // call no
        bytes.push(4); // CALL_END
        let mut p = parser(bytes);
        let call = p.parse_call(ParseMode::Full).unwrap().expect("call");
        assert_eq!(call.thread_id, 0);
        match &call.args[0] {
            Value::Enum(sig, value) => {
                assert_eq!(*value, 2929);
                assert_eq!(sig.values[0].name, "GL_DEPTH_TEST");
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn scan_advances_exactly_as_far_as_parse() {
        // One value of every kind, nested where the format allows.
        let mut value = Vec::new();
        value.push(0x0A); // ARRAY
        uint(&mut value, 11);
        value.push(0x00); // NULL
        value.push(0x01); // FALSE
        value.push(0x02); // TRUE
        value.push(0x03); // SINT 7
        uint(&mut value, 7);
        value.push(0x04); // UINT 300
        uint(&mut value, 300);
        value.push(0x05); // FLOAT
        value.extend_from_slice(&1.0f32.to_le_bytes());
        value.push(0x06); // DOUBLE
        value.extend_from_slice(&2.0f64.to_le_bytes());
        value.push(0x07); // STRING
        string(&mut value, "str");
        value.push(0x08); // ENUM, sig id 0, first sighting
        uint(&mut value, 0);
        uint(&mut value, 1);
        string(&mut value, "E");
        value.push(0x03);
        uint(&mut value, 1);
        value.push(0x03); // enum value: SINT 1
        uint(&mut value, 1);
        value.push(0x09); // BITMASK, sig id 0, first sighting
        uint(&mut value, 0);
        uint(&mut value, 1);
        string(&mut value, "BIT");
        uint(&mut value, 1);
        uint(&mut value, 3); // bitmask value
        value.push(0x0B); // STRUCT, sig id 0, first sighting
        uint(&mut value, 0);
        string(&mut value, "pair");
        uint(&mut value, 2);
        string(&mut value, "a");
        string(&mut value, "b");
        value.push(0x0C); // member a: BLOB
        uint(&mut value, 3);
        value.extend_from_slice(&[1, 2, 3]);
        value.push(0x0D); // member b: OPAQUE
        uint(&mut value, 0xbeef);

        let mut stream = alloc::vec![4u8];
        stream.extend_from_slice(&value);

        let mut parse_side = parser(stream.clone());
        let parsed = parse_side.parse_value(ParseMode::Full).unwrap();
        assert!(parsed.is_some());

        let mut scan_side = parser(stream);
        scan_side.scan_value().unwrap();

        assert_eq!(
            parse_side.source.offset(),
            scan_side.source.offset(),
            "scan and parse must agree on value extent"
        );
        assert_eq!(scan_side.source.read_byte(), None);
    }

    #[test]
    fn tagged_int_reads_are_eof_tolerant_but_tag_checked() {
        let mut p = parser(alloc::vec![4]);
        assert_eq!(p.read_sint(), Ok(0));

        let mut bytes = alloc::vec![4u8, 0x03];
        uint(&mut bytes, 9);
        let mut p = parser(bytes);
        assert_eq!(p.read_sint(), Ok(-9));

        let mut p = parser(alloc::vec![4, 0x07]);
        assert_eq!(
            p.read_sint(),
            Err(ParseError::UnexpectedIntType { tag: 0x07 })
        );
    }

    #[test]
    fn bookmarks_capture_offset_and_numbering() {
        let p = parser(alloc::vec![4]);
        assert_eq!(
            p.bookmark(),
            Bookmark {
                offset: 1,
                next_call_no: 0
            }
        );
    }
}
