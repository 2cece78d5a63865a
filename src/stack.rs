//! Stack growth for the recursive parts of the pipeline.
//!
//! Parsing, evaluation and compilation recurse once per nesting level.
//! Their depth is capped separately (`parser::MAX_NESTING` and
//! `interpreter::executor::MAX_CALL_DEPTH`). This only makes sure the native
//! stack can hold that many frames on any thread.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first moving to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
