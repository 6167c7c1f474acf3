//! Stack growth for deep recursion.
//!
//! Nested expressions and recursive user functions both recurse through
//! the evaluator. `stacker` grows the stack on demand instead of letting a
//! deep script overflow the native stack.

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Stack to keep free before recursing further (100KB).
    const RED_ZONE: usize = 100 * 1024;

    /// Size of each new stack segment (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
