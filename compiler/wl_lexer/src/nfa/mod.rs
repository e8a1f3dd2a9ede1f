//! Thompson NFA for lexeme patterns.
//!
//! Patterns compile into a flat state vector. Matching runs every live
//! state in lock-step over the input (no backtracking), so finding the
//! longest accepting prefix costs `O(input × states)` and never blows up on
//! adversarial patterns.
//!
//! The simulation stops as soon as no state is alive, so a rule that cannot
//! continue gives up after the first mismatching character rather than
//! scanning to the end of the input.

use crate::pattern::{Ast, CharClass};

type StateId = u32;

const MATCH: StateId = 0;

#[derive(Clone, Debug)]
enum State {
    /// Consume one character in the class, then go to `next`.
    Char { class: CharClass, next: StateId },
    /// Epsilon fork.
    Split(StateId, StateId),
    /// Accepting state; always at index 0.
    Match,
}

/// Compiled pattern.
#[derive(Clone, Debug)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
    /// Classes reachable from `start` without consuming input; a character
    /// outside all of them cannot begin a match.
    first: Vec<CharClass>,
}

impl Nfa {
    pub fn compile(ast: &Ast) -> Nfa {
        let mut states = vec![State::Match];
        let start = compile_node(ast, MATCH, &mut states);
        let mut nfa = Nfa {
            states,
            start,
            first: Vec::new(),
        };
        let mut scratch = Scratch::new();
        scratch.reset(nfa.states.len());
        nfa.add_state(&mut scratch, start, false);
        nfa.first = scratch
            .current
            .iter()
            .filter_map(|&s| match &nfa.states[s as usize] {
                State::Char { class, .. } => Some(class.clone()),
                _ => None,
            })
            .collect();
        nfa
    }

    /// Number of states, for sizing scratch space.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// `true` if some match could begin with `c`.
    #[inline]
    pub fn can_start_with(&self, c: char) -> bool {
        self.first.iter().any(|class| class.matches(c))
    }

    /// `true` if the empty string is accepted.
    pub fn matches_empty(&self) -> bool {
        let mut scratch = Scratch::new();
        scratch.reset(self.states.len());
        self.add_state(&mut scratch, self.start, false);
        scratch.current.contains(&MATCH)
    }

    /// Byte length of the longest prefix of `text` the pattern accepts.
    ///
    /// `None` if no prefix matches (the empty prefix counts only for
    /// nullable patterns, which the token table rejects).
    pub fn longest_match(&self, text: &str, scratch: &mut Scratch) -> Option<usize> {
        scratch.reset(self.states.len());
        self.add_state(scratch, self.start, false);
        let mut longest = scratch.current.contains(&MATCH).then_some(0);

        for (at, c) in text.char_indices() {
            scratch.next.clear();
            scratch.generation += 1;
            let current = std::mem::take(&mut scratch.current);
            for &s in &current {
                if let State::Char { class, next } = &self.states[s as usize] {
                    if class.matches(c) {
                        self.add_state(scratch, *next, true);
                    }
                }
            }
            scratch.current = current;
            std::mem::swap(&mut scratch.current, &mut scratch.next);
            if scratch.current.is_empty() {
                break;
            }
            if scratch.current.contains(&MATCH) {
                longest = Some(at + c.len_utf8());
            }
        }
        longest
    }

    /// Add `state` and its epsilon closure to the list being built.
    fn add_state(&self, scratch: &mut Scratch, state: StateId, into_next: bool) {
        scratch.stack.push(state);
        while let Some(s) = scratch.stack.pop() {
            let mark = &mut scratch.marks[s as usize];
            if *mark == scratch.generation {
                continue;
            }
            *mark = scratch.generation;
            match self.states[s as usize] {
                State::Split(a, b) => {
                    // Push `b` first so `a` is explored first.
                    scratch.stack.push(b);
                    scratch.stack.push(a);
                }
                State::Char { .. } | State::Match => {
                    if into_next {
                        scratch.next.push(s);
                    } else {
                        scratch.current.push(s);
                    }
                }
            }
        }
    }
}

/// Reusable buffers for [`Nfa::longest_match`].
///
/// The analyzer keeps one and hands it to every rule, so matching does not
/// allocate once the buffers have grown to the largest rule.
#[derive(Debug, Default)]
pub struct Scratch {
    current: Vec<StateId>,
    next: Vec<StateId>,
    stack: Vec<StateId>,
    /// `marks[s] == generation` means `s` is already in the list being
    /// built for the current step.
    marks: Vec<u32>,
    generation: u32,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scratch already sized for NFAs of up to `states` states.
    pub fn with_states(states: usize) -> Self {
        Scratch {
            marks: vec![0; states],
            ..Self::default()
        }
    }

    fn reset(&mut self, states: usize) {
        self.current.clear();
        self.next.clear();
        self.stack.clear();
        if self.marks.len() < states {
            self.marks.resize(states, 0);
        }
        if self.generation >= u32::MAX - 1 {
            self.marks.iter_mut().for_each(|m| *m = 0);
            self.generation = 0;
        }
        self.generation += 1;
    }
}

fn push(states: &mut Vec<State>, state: State) -> StateId {
    let id = StateId::try_from(states.len()).unwrap_or(StateId::MAX);
    states.push(state);
    id
}

/// Compile `ast` so that it continues to `out` on success. Returns the
/// entry state.
fn compile_node(ast: &Ast, out: StateId, states: &mut Vec<State>) -> StateId {
    match ast {
        Ast::Empty => out,
        Ast::Class(class) => push(
            states,
            State::Char {
                class: class.clone(),
                next: out,
            },
        ),
        Ast::Concat(items) => items
            .iter()
            .rev()
            .fold(out, |next, item| compile_node(item, next, states)),
        Ast::Alt(alts) => {
            let mut entries: Vec<StateId> = alts
                .iter()
                .map(|alt| compile_node(alt, out, states))
                .collect();
            let mut entry = entries.pop().unwrap_or(out);
            while let Some(prev) = entries.pop() {
                entry = push(states, State::Split(prev, entry));
            }
            entry
        }
        Ast::Opt(inner) => {
            let body = compile_node(inner, out, states);
            push(states, State::Split(body, out))
        }
        Ast::Star(inner) => {
            let fork = push(states, State::Split(MATCH, out));
            let body = compile_node(inner, fork, states);
            states[fork as usize] = State::Split(body, out);
            fork
        }
        Ast::Plus(inner) => {
            let fork = push(states, State::Split(MATCH, out));
            let body = compile_node(inner, fork, states);
            states[fork as usize] = State::Split(body, out);
            body
        }
    }
}

#[cfg(test)]
mod tests;
