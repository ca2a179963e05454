//! Native stack growth for deeply nested programs.
//!
//! Parsing and execution both recurse once per nested block and once per
//! subroutine call. Each recursive step runs through
//! [`ensure_sufficient_stack`], which moves onto a freshly allocated
//! segment when the current one runs low, so nesting is bounded by the
//! configured limits rather than by the thread's stack size.

/// Grow the stack when less than this much remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each additional stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
    }

    #[test]
    fn passes_result_through() {
        assert_eq!(ensure_sufficient_stack(|| 42), 42);
        let r: Result<i32, &str> = ensure_sufficient_stack(|| Err("no"));
        assert_eq!(r, Err("no"));
    }

    #[test]
    fn deep_recursion_does_not_overflow() {
        assert_eq!(depth(200_000), 200_000);
    }
}
