//! Sets of token ids.
//!
//! A bitset indexed by [`TokenId::index`], used for FIRST/follow sets and
//! the synchronization set. Membership is one shift and mask. The bit
//! vector grows to fit the largest id inserted; two words cover a table of
//! up to 126 rules without touching the heap.

use std::fmt;

use smallvec::SmallVec;
use wl_ir::{Names, TokenId};

const WORD_BITS: usize = 64;

#[derive(Clone, Default)]
pub struct TokenSet {
    words: SmallVec<[u64; 2]>,
}

impl TokenSet {
    /// Create an empty token set.
    #[inline]
    pub fn new() -> Self {
        TokenSet {
            words: SmallVec::new(),
        }
    }

    /// Create a token set containing a single id.
    pub fn single(id: TokenId) -> Self {
        let mut set = Self::new();
        set.insert(id);
        set
    }

    /// Add an id (builder form).
    #[must_use]
    pub fn with(mut self, id: TokenId) -> Self {
        self.insert(id);
        self
    }

    /// Add an id.
    pub fn insert(&mut self, id: TokenId) {
        let (word, bit) = (id.index() / WORD_BITS, id.index() % WORD_BITS);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << bit;
    }

    /// Check if this set contains an id.
    #[inline]
    pub fn contains(&self, id: TokenId) -> bool {
        let (word, bit) = (id.index() / WORD_BITS, id.index() % WORD_BITS);
        self.words.get(word).is_some_and(|w| w & (1 << bit) != 0)
    }

    /// Union with another set, in place. Returns `true` if anything was
    /// added.
    pub fn union_with(&mut self, other: &TokenSet) -> bool {
        if self.words.len() < other.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        let mut changed = false;
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            let merged = *mine | theirs;
            changed |= merged != *mine;
            *mine = merged;
        }
        changed
    }

    /// Union of two token sets.
    #[must_use]
    pub fn union(&self, other: &TokenSet) -> TokenSet {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    /// Intersection of two token sets.
    #[must_use]
    pub fn intersection(&self, other: &TokenSet) -> TokenSet {
        TokenSet {
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
        }
    }

    /// `true` if the two sets share an id.
    pub fn intersects(&self, other: &TokenSet) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .any(|(a, b)| a & b != 0)
    }

    /// Check if this set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Count the number of ids in this set.
    pub fn count(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            BitIter(word).filter_map(move |bit| TokenId::from_index(i * WORD_BITS + bit))
        })
    }

    /// Format this token set as a human-readable list for error messages.
    ///
    /// Names come from `names` and are used as-is, so a literal rule named
    /// `` `;` `` renders with its backticks: "`,`, `)`, or identifier".
    pub fn format_expected(&self, names: &dyn Names) -> String {
        let names: Vec<&str> = self.iter().map(|id| names.token_name(id)).collect();

        match names.as_slice() {
            [] => "nothing".to_string(),
            [single] => (*single).to_string(),
            [first, second] => format!("{first} or {second}"),
            [rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
        }
    }
}

/// Iterator over set bit positions of one word.
struct BitIter(u64);

impl Iterator for BitIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1; // Clear the lowest set bit
        Some(bit)
    }
}

impl PartialEq for TokenSet {
    /// Equal when the same ids are present, whatever the word count.
    fn eq(&self, other: &Self) -> bool {
        let len = self.words.len().max(other.words.len());
        let word = |set: &TokenSet, i: usize| set.words.get(i).copied().unwrap_or(0);
        (0..len).all(|i| word(self, i) == word(other, i))
    }
}

impl Eq for TokenSet {}

impl FromIterator<TokenId> for TokenSet {
    fn from_iter<I: IntoIterator<Item = TokenId>>(iter: I) -> Self {
        let mut set = TokenSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl Extend<TokenId> for TokenSet {
    fn extend<I: IntoIterator<Item = TokenId>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Skip tokens until one in `sync` (or the end of input) is next.
///
/// Returns the skipped tokens in order.
pub fn synchronize<'src>(
    stream: &mut wl_lexer::TokenStream<'src>,
    sync: &TokenSet,
) -> SmallVec<[wl_ir::Token<'src>; 8]> {
    let mut skipped = SmallVec::new();
    while !stream.at_end() {
        if sync.contains(stream.peek_id(0)) {
            break;
        }
        skipped.push(stream.consume());
    }
    skipped
}
