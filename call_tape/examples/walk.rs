// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decodes a small in-memory capture and prints each call.
//!
//! Run with:
//! `cargo run -p call_tape --example walk`

use call_tape::parser::{ParseMode, Parser};
use call_tape::source::MemorySource;

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

/// A capture with two calls on different threads, the second still in
/// flight when the capture ends.
fn build_capture() -> Vec<u8> {
    let mut bytes = vec![4u8];

    bytes.push(0); // ENTER, thread 1: glClear(0x4000)
    uint(&mut bytes, 1);
    uint(&mut bytes, 0);
    string(&mut bytes, "glClear");
    uint(&mut bytes, 1);
    string(&mut bytes, "mask");
    bytes.push(2); // CALL_ARG 0
    uint(&mut bytes, 0);
    bytes.push(0x09); // BITMASK
    uint(&mut bytes, 0);
    uint(&mut bytes, 1);
    string(&mut bytes, "GL_COLOR_BUFFER_BIT");
    uint(&mut bytes, 0x4000);
    uint(&mut bytes, 0x4000);
    bytes.push(4); // CALL_END

    bytes.push(0); // ENTER, thread 2: glGetError()
    uint(&mut bytes, 2);
    uint(&mut bytes, 1);
    string(&mut bytes, "glGetError");
    uint(&mut bytes, 0);
    bytes.push(4); // CALL_END

    bytes.push(1); // LEAVE for glClear
    bytes.push(0x04); // call_time: UINT 1200
    uint(&mut bytes, 1200);
    uint(&mut bytes, 0);
    bytes.push(4); // CALL_END

    bytes
}

fn main() {
    let mut parser = Parser::new(MemorySource::new(build_capture())).expect("readable capture");
    while let Some(call) = parser.parse_call(ParseMode::Full).expect("well-formed capture") {
        println!(
            "#{no} thread {thread} {name} args {args:?} -> {ret:?} [{flags:?}]",
            no = call.no,
            thread = call.thread_id,
            name = call.name(),
            args = call.args,
            ret = call.ret,
            flags = call.flags,
        );
    }
}
