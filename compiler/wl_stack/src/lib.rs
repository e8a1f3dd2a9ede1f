//! Stack growth for deeply nested input.
//!
//! The syntax analyzer is recursive descent, so nesting depth in the source
//! (`((((...))))`, blocks inside blocks) turns directly into call depth.
//! Input is untrusted, so every recursive grammar entry goes through
//! [`ensure_sufficient_stack`], which grows the stack on native targets
//! instead of letting a hostile file overflow it.
//!
//! - **Red zone**: 128 KiB. Below this much remaining stack, a new segment is
//!   allocated before running the closure.
//! - **Segment size**: 2 MiB per growth.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if the remaining space is below the red zone.
///
/// ```text
/// fn parse_rule(&mut self, rule: RuleId) -> Outcome {
///     ensure_sufficient_stack(|| self.parse_rule_inner(rule))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; call through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Remaining stack in bytes, if the platform can tell.
///
/// Used by debug tracing in the parser to report how close a unit came to
/// the red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

/// WASM has no way to query the stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}

#[cfg(test)]
mod tests;
