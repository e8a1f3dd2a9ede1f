//! Lexeme pattern language.
//!
//! A small regular-expression dialect for token rules:
//!
//! | syntax | meaning |
//! |---|---|
//! | `abc` | literal characters |
//! | `.` | any character except `\n` |
//! | `[a-z_]`, `[^\n]` | character class, negated class |
//! | `\n \r \t` | control characters |
//! | `\d \w \s` | ASCII digit, word, whitespace (`\D \W \S` negate) |
//! | `\.` `\\` `\[` ... | any escaped ASCII punctuation is literal |
//! | `( )` | grouping |
//! | `a\|b` | alternation |
//! | `* + ?` | zero-or-more, one-or-more, optional |
//!
//! There are no anchors, counted repetitions or backreferences: a pattern
//! always matches at the analyzer's cursor and the analyzer wants the
//! longest accepting prefix, which [`crate::nfa`] computes in linear time.

use smallvec::SmallVec;
use thiserror::Error;

/// Why a pattern failed to parse. Offsets are byte offsets into the pattern.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("unmatched `)` at offset {0}")]
    UnmatchedParen(usize),
    #[error("group opened at offset {0} is never closed")]
    UnclosedGroup(usize),
    #[error("character class opened at offset {0} is never closed")]
    UnclosedClass(usize),
    #[error("empty character class at offset {0}")]
    EmptyClass(usize),
    #[error("`{op}` at offset {at} has nothing to repeat")]
    NothingToRepeat { op: char, at: usize },
    #[error("unknown escape `\\{0}`")]
    UnknownEscape(char),
    #[error("pattern ends with a lone `\\`")]
    TrailingBackslash,
    #[error("invalid range `{lo}-{hi}`")]
    InvalidRange { lo: char, hi: char },
}

/// A set of characters as inclusive ranges, optionally negated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharClass {
    ranges: SmallVec<[(char, char); 4]>,
    negated: bool,
}

impl CharClass {
    pub fn single(c: char) -> Self {
        CharClass {
            ranges: smallvec::smallvec![(c, c)],
            negated: false,
        }
    }

    /// `.`: everything but a line feed.
    pub fn any_but_newline() -> Self {
        CharClass {
            ranges: smallvec::smallvec![('\n', '\n')],
            negated: true,
        }
    }

    fn from_ranges(ranges: &[(char, char)], negated: bool) -> Self {
        CharClass {
            ranges: ranges.iter().copied().collect(),
            negated,
        }
    }

    #[inline]
    pub fn matches(&self, c: char) -> bool {
        let inside = self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
        inside != self.negated
    }

    /// The single character this class matches, if it is a plain literal.
    pub fn as_char(&self) -> Option<char> {
        match self.ranges.as_slice() {
            [(lo, hi)] if lo == hi && !self.negated => Some(*lo),
            _ => None,
        }
    }
}

const DIGIT: &[(char, char)] = &[('0', '9')];
const WORD: &[(char, char)] = &[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')];
const SPACE: &[(char, char)] = &[('\t', '\r'), (' ', ' ')];

/// Parsed pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ast {
    /// Matches the empty string; produced by `()` and empty alternatives.
    Empty,
    Class(CharClass),
    Concat(Vec<Ast>),
    Alt(Vec<Ast>),
    Star(Box<Ast>),
    Plus(Box<Ast>),
    Opt(Box<Ast>),
}

impl Ast {
    /// Parse `pattern`.
    pub fn parse(pattern: &str) -> Result<Ast, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let mut parser = Parser {
            chars: pattern.char_indices().collect(),
            pos: 0,
        };
        let ast = parser.alternation()?;
        match parser.peek() {
            None => Ok(ast),
            Some((at, _)) => Err(PatternError::UnmatchedParen(at)),
        }
    }

    /// `true` if this pattern can match the empty string.
    pub fn is_nullable(&self) -> bool {
        match self {
            Ast::Empty | Ast::Star(_) | Ast::Opt(_) => true,
            Ast::Class(_) => false,
            Ast::Plus(inner) => inner.is_nullable(),
            Ast::Concat(items) => items.iter().all(Ast::is_nullable),
            Ast::Alt(alts) => alts.iter().any(Ast::is_nullable),
        }
    }
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.peek()?;
        self.pos += 1;
        Some(next)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek().map(|(_, p)| p) == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// alternation := concat ('|' concat)*
    fn alternation(&mut self) -> Result<Ast, PatternError> {
        let mut alts = vec![self.concat()?];
        while self.eat('|') {
            alts.push(self.concat()?);
        }
        Ok(if alts.len() == 1 {
            alts.pop().unwrap_or(Ast::Empty)
        } else {
            Ast::Alt(alts)
        })
    }

    /// concat := repeat*
    fn concat(&mut self) -> Result<Ast, PatternError> {
        let mut items = Vec::new();
        while let Some((_, c)) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            items.push(self.repeat()?);
        }
        Ok(match items.len() {
            0 => Ast::Empty,
            1 => items.pop().unwrap_or(Ast::Empty),
            _ => Ast::Concat(items),
        })
    }

    /// repeat := atom ('*' | '+' | '?')*
    fn repeat(&mut self) -> Result<Ast, PatternError> {
        let mut atom = self.atom()?;
        while let Some((_, c)) = self.peek() {
            atom = match c {
                '*' => Ast::Star(Box::new(atom)),
                '+' => Ast::Plus(Box::new(atom)),
                '?' => Ast::Opt(Box::new(atom)),
                _ => break,
            };
            self.pos += 1;
        }
        Ok(atom)
    }

    fn atom(&mut self) -> Result<Ast, PatternError> {
        let Some((at, c)) = self.bump() else {
            return Ok(Ast::Empty);
        };
        match c {
            '(' => {
                let inner = self.alternation()?;
                if self.eat(')') {
                    Ok(inner)
                } else {
                    Err(PatternError::UnclosedGroup(at))
                }
            }
            '[' => self.class(at).map(Ast::Class),
            '.' => Ok(Ast::Class(CharClass::any_but_newline())),
            '\\' => self.escape().map(Ast::Class),
            '*' | '+' | '?' => Err(PatternError::NothingToRepeat { op: c, at }),
            c => Ok(Ast::Class(CharClass::single(c))),
        }
    }

    /// Escape after `\`, outside a class.
    fn escape(&mut self) -> Result<CharClass, PatternError> {
        let (_, c) = self.bump().ok_or(PatternError::TrailingBackslash)?;
        Ok(match c {
            'd' => CharClass::from_ranges(DIGIT, false),
            'w' => CharClass::from_ranges(WORD, false),
            's' => CharClass::from_ranges(SPACE, false),
            'D' => CharClass::from_ranges(DIGIT, true),
            'W' => CharClass::from_ranges(WORD, true),
            'S' => CharClass::from_ranges(SPACE, true),
            c => CharClass::single(escaped_char(c)?),
        })
    }

    /// Class body after `[`; `open` is the offset of the `[`.
    fn class(&mut self, open: usize) -> Result<CharClass, PatternError> {
        let negated = self.eat('^');
        let mut ranges: SmallVec<[(char, char); 4]> = SmallVec::new();
        let mut first = true;
        loop {
            let (_, c) = self.bump().ok_or(PatternError::UnclosedClass(open))?;
            let lo = match c {
                ']' if first => return Err(PatternError::EmptyClass(open)),
                ']' => break,
                '\\' => {
                    let (_, e) = self.bump().ok_or(PatternError::UnclosedClass(open))?;
                    match e {
                        'd' => {
                            ranges.extend_from_slice(DIGIT);
                            first = false;
                            continue;
                        }
                        'w' => {
                            ranges.extend_from_slice(WORD);
                            first = false;
                            continue;
                        }
                        's' => {
                            ranges.extend_from_slice(SPACE);
                            first = false;
                            continue;
                        }
                        e => escaped_char(e)?,
                    }
                }
                c => c,
            };
            first = false;
            // `a-z`; a `-` right before `]` is literal.
            let is_range = self.peek().map(|(_, p)| p) == Some('-')
                && self
                    .chars
                    .get(self.pos + 1)
                    .is_some_and(|&(_, after)| after != ']');
            if is_range {
                self.pos += 1;
                let (_, hi) = self.bump().ok_or(PatternError::UnclosedClass(open))?;
                let hi = if hi == '\\' {
                    let (_, e) = self.bump().ok_or(PatternError::UnclosedClass(open))?;
                    escaped_char(e)?
                } else {
                    hi
                };
                if hi < lo {
                    return Err(PatternError::InvalidRange { lo, hi });
                }
                ranges.push((lo, hi));
            } else {
                ranges.push((lo, lo));
            }
        }
        Ok(CharClass { ranges, negated })
    }
}

/// Character denoted by `\c` when it is a single character.
fn escaped_char(c: char) -> Result<char, PatternError> {
    match c {
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        '0' => Ok('\0'),
        c if c.is_ascii_punctuation() => Ok(c),
        c => Err(PatternError::UnknownEscape(c)),
    }
}

#[cfg(test)]
mod tests;
