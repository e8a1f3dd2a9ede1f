//! WL IR - data shared by every stage of the front end.
//!
//! - [`Position`] and [`Span`] for source locations
//! - [`TokenId`] and [`Token`] for tokenizer output
//! - [`SyntaxTree`] and friends for parser output (arena of nodes, ids
//!   instead of boxes)
//!
//! Nothing in here knows about any particular language: token and rule
//! names come from the language definition through the [`Names`] trait.

/// Compile-time assertion that a type has a specific size.
///
/// Used to catch accidental growth of types that are allocated per token
/// or per node.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod span;
mod token;
mod tree;

pub use span::{Position, Span};
pub use token::{Token, TokenId};
pub use tree::{
    ChildRange, Names, Node, NodeId, NodeKind, Preorder, RuleId, SyntaxTree, TreeBuilder,
};
