use super::*;

/// Nested list depth, computed the way the parser walks nesting.
fn nesting_depth(input: &[u8]) -> usize {
    fn walk(input: &[u8], pos: &mut usize) -> usize {
        ensure_sufficient_stack(|| {
            let mut deepest = 0;
            while *pos < input.len() {
                let byte = input[*pos];
                *pos += 1;
                match byte {
                    b'(' => deepest = deepest.max(1 + walk(input, pos)),
                    b')' => return deepest,
                    _ => {}
                }
            }
            deepest
        })
    }
    let mut pos = 0;
    walk(input, &mut pos)
}

#[test]
fn shallow_nesting() {
    assert_eq!(nesting_depth(b"(()(()))"), 3);
    assert_eq!(nesting_depth(b""), 0);
}

#[test]
fn deep_nesting_does_not_overflow() {
    // Far deeper than a default 8 MiB thread stack allows without growth.
    let depth = 200_000;
    let mut input = vec![b'('; depth];
    input.extend(std::iter::repeat(b')').take(depth));
    assert_eq!(nesting_depth(&input), depth);
}

#[test]
fn passes_result_through() {
    let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("bad"));
    assert_eq!(result, Err("bad"));
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn remaining_stack_is_known_on_native() {
    assert!(remaining_stack().is_some_and(|bytes| bytes > 0));
}
