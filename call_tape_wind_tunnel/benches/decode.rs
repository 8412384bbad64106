// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use call_tape::parser::{ParseMode, Parser};
use call_tape::source::MemorySource;

fn bench_decode(c: &mut Criterion) {
    bench_call_stream(c);
    bench_array_arguments(c);
    bench_signature_reuse(c);
}

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

/// A capture of `num_calls` calls, each with a couple of scalar arguments.
/// Every call uses its own function signature to stress interning.
fn build_call_stream(num_calls: u64, unique_sigs: u64) -> Vec<u8> {
    let mut bytes = vec![4u8];
    for no in 0..num_calls {
        let id = no % unique_sigs;
        bytes.push(0); // ENTER
        uint(&mut bytes, no % 4); // thread
        uint(&mut bytes, id);
        if no < unique_sigs {
            string(&mut bytes, &format!("api_call_{id}"));
            uint(&mut bytes, 2);
            string(&mut bytes, "target");
            string(&mut bytes, "count");
        }
        bytes.push(2); // CALL_ARG
        uint(&mut bytes, 0);
        bytes.push(0x04); // UINT
        uint(&mut bytes, no);
        bytes.push(2); // CALL_ARG
        uint(&mut bytes, 1);
        bytes.push(0x03); // SINT
        uint(&mut bytes, 9);
        bytes.push(4); // CALL_END
        bytes.push(1); // LEAVE
        bytes.push(0x04); // call_time: UINT
        uint(&mut bytes, no * 10);
        uint(&mut bytes, no);
        bytes.push(4); // CALL_END
    }
    bytes
}

/// A capture whose single call carries one large array argument.
fn build_array_stream(len: u64) -> Vec<u8> {
    let mut bytes = vec![4u8];
    bytes.push(0); // ENTER
    uint(&mut bytes, 0);
    uint(&mut bytes, 0);
    string(&mut bytes, "upload");
    uint(&mut bytes, 1);
    string(&mut bytes, "data");
    bytes.push(2); // CALL_ARG
    uint(&mut bytes, 0);
    bytes.push(0x0A); // ARRAY
    uint(&mut bytes, len);
    for i in 0..len {
        bytes.push(0x04); // UINT
        uint(&mut bytes, i);
    }
    bytes.push(4); // CALL_END
    bytes.push(1); // LEAVE
    bytes.push(0x04);
    uint(&mut bytes, 1);
    uint(&mut bytes, 0);
    bytes.push(4); // CALL_END
    bytes
}

fn drain(parser: &mut Parser<MemorySource>) -> usize {
    let mut count = 0;
    while let Some(call) = parser.parse_call(ParseMode::Full).unwrap() {
        black_box(&call);
        count += 1;
    }
    count
}

fn bench_call_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_calls");
    for &num_calls in &[10u64, 100, 1000] {
        let bytes = build_call_stream(num_calls, num_calls);
        let mut parser = Parser::new(MemorySource::new(bytes)).unwrap();
        let start = parser.bookmark();
        group.bench_with_input(BenchmarkId::from_parameter(num_calls), &num_calls, |b, &n| {
            b.iter(|| {
                parser.set_bookmark(start);
                assert_eq!(drain(&mut parser) as u64, n);
            });
        });
    }
    group.finish();
}

fn bench_array_arguments(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_array_argument");
    for &len in &[16u64, 256, 4096] {
        let bytes = build_array_stream(len);
        let mut parser = Parser::new(MemorySource::new(bytes)).unwrap();
        let start = parser.bookmark();
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| {
                parser.set_bookmark(start);
                assert_eq!(drain(&mut parser), 1);
            });
        });
    }
    group.finish();
}

fn bench_signature_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("signature_reuse");
    // Same call volume, shrinking signature table: measures the interner's
    // repeat-sighting fast path against first-sighting decodes.
    for &unique_sigs in &[1u64, 10, 1000] {
        let bytes = build_call_stream(1000, unique_sigs);
        let mut parser = Parser::new(MemorySource::new(bytes)).unwrap();
        let start = parser.bookmark();
        group.bench_with_input(
            BenchmarkId::from_parameter(unique_sigs),
            &unique_sigs,
            |b, _| {
                b.iter(|| {
                    parser.set_bookmark(start);
                    assert_eq!(drain(&mut parser), 1000);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
