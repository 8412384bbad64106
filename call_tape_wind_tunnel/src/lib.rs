// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmark crate for `call_tape`.
//!
//! The library target is intentionally empty; the benchmarks live in
//! `benches/decode.rs`.
