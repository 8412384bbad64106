// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conformance tests for the `call_tape` decoder.
//!
//! The library target is intentionally empty; the tests live in
//! `tests/conformance.rs`.
