//! Swaps plain `core`/`std` atomics for loom's model-checked equivalents
//! when built with `--cfg loom` (only reachable via the `loom` feature's
//! test harness, see `tests/loom_clh.rs`).
//!
//! Only the spin-lock module uses this: the epoch-based queues build on
//! `crossbeam-epoch`, which loom cannot instrument, so they are exercised
//! by ordinary concurrent tests instead (see `tests/concurrent.rs`).

#[cfg(not(loom))]
pub(crate) use core::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

#[cfg(not(loom))]
pub(crate) fn spin_loop_hint() {
    core::hint::spin_loop();
}

#[cfg(loom)]
pub(crate) fn spin_loop_hint() {
    loom::thread::yield_now();
}
