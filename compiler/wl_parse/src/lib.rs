//! Grammar model and recursive descent syntax analyzer for the WL front end.
//!
//! - [`Grammar`]: rules over token ids, validated and analyzed once by
//!   [`GrammarBuilder::build`]
//! - [`TokenSet`]: FIRST/follow/synchronization sets
//! - [`SyntaxAnalyzer`]: turns a [`TokenStream`](wl_lexer::TokenStream)
//!   into a [`SyntaxTree`](wl_ir::SyntaxTree) plus diagnostics, recovering
//!   from errors instead of stopping at the first one
//!
//! Like the token table, the grammar is data supplied by the caller; nothing
//! here knows about a particular language.

mod grammar;
mod names;
mod parser;
mod token_set;

pub use grammar::{
    Assoc, BinaryOp, Conflict, Grammar, GrammarBuilder, GrammarError, InfixRule, Production,
    Symbol,
};
pub use names::LanguageNames;
pub use parser::SyntaxAnalyzer;
pub use token_set::{synchronize, TokenSet};
