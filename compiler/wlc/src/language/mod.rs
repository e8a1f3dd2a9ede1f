//! The demonstration language.
//!
//! A small statement language used by the `wl` binary and the end-to-end
//! tests:
//!
//! ```text
//! // comments run to the end of the line
//! let total = 0;
//! total = total + 2 ^ 3 ^ 2;
//! while total < 100 { total = total * 2; }
//! if total >= 100 { print "big"; } else { print total; }
//! ```
//!
//! Statements: `let`, assignment (told apart from an expression statement
//! by two tokens of lookahead), `print`, `if`/`else`, `while`, blocks and
//! expression statements. Expressions use the precedence table below, loosest
//! first; all operators are left-associative except `^`.
//!
//! | precedence | operators |
//! |---|---|
//! | 1 | `==` `!=` |
//! | 2 | `<` `<=` `>` `>=` |
//! | 3 | `+` `-` |
//! | 4 | `*` `/` `%` |
//! | 5 | `^` (right) |
//! | 6 | prefix `-` `!` |

use std::sync::Arc;

use thiserror::Error;
use wl_ir::TokenId;
use wl_lexer::{TableError, TokenTable};
use wl_parse::{Assoc, Grammar, GrammarError, InfixRule, Production, Symbol, TokenSet};

use crate::{ConfigError, FrontendConfig};

/// The language definition did not build.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LanguageError {
    #[error("token table: {0}")]
    Table(#[from] TableError),
    #[error("grammar: {0}")]
    Grammar(#[from] GrammarError),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("token `{0}` is missing from the table")]
    MissingToken(String),
}

const KEYWORDS: &[&str] = &["let", "print", "if", "else", "while", "true", "false"];

const OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "=", "<", ">", "+", "-", "*", "/", "%", "^", "!", ";", "{", "}", "(",
    ")",
];

/// Statement starters that recovery resumes at, plus block delimiters and `;`.
const SYNC: &[&str] = &[";", "{", "}", "let", "print", "if", "while"];

/// Token table of the demonstration language.
pub fn demo_table() -> Result<TokenTable, TableError> {
    TokenTable::builder()
        .trivia("whitespace", "\\s+")
        .trivia("comment", "//[^\\n]*")
        .literals(KEYWORDS)
        .literals(OPERATORS)
        .pattern("number", "\\d+(\\.\\d+)?")
        .pattern("string", "\"([^\"\\\\\\n]|\\\\.)*\"")
        .pattern("identifier", "[a-zA-Z_]\\w*")
        .build()
}

struct Tokens<'a>(&'a TokenTable);

impl Tokens<'_> {
    fn id(&self, name: &str) -> Result<TokenId, LanguageError> {
        self.0
            .id(name)
            .ok_or_else(|| LanguageError::MissingToken(name.to_owned()))
    }

    /// Id of a literal rule, by its text.
    fn lit(&self, text: &str) -> Result<TokenId, LanguageError> {
        self.id(&format!("`{text}`"))
    }

    fn sym(&self, text: &str) -> Result<Symbol, LanguageError> {
        self.lit(text).map(Symbol::Token)
    }
}

/// Grammar of the demonstration language over `table`.
pub fn demo_grammar(table: &TokenTable) -> Result<Grammar, LanguageError> {
    let t = Tokens(table);
    let number = Symbol::Token(t.id("number")?);
    let string = Symbol::Token(t.id("string")?);
    let ident_id = t.id("identifier")?;
    let ident = Symbol::Token(ident_id);

    let mut g = Grammar::builder();
    let program = g.declare("program");
    let stmt = g.declare("stmt");
    let assign_stmt = g.declare("assign_stmt");
    let let_stmt = g.declare("let_stmt");
    let print_stmt = g.declare("print_stmt");
    let if_stmt = g.declare("if_stmt");
    let else_clause = g.declare("else_clause");
    let else_body = g.declare("else_body");
    let while_stmt = g.declare("while_stmt");
    let block = g.declare("block");
    let expr_stmt = g.declare("expr_stmt");
    let expr = g.declare("expr");
    let primary = g.declare("primary");
    let group = g.declare("group");

    g.define(program, [Production::new([Symbol::Many(stmt)])]);
    g.define(
        stmt,
        [
            Production::new([Symbol::Rule(assign_stmt)]).guarded([ident_id, t.lit("=")?]),
            Production::new([Symbol::Rule(let_stmt)]),
            Production::new([Symbol::Rule(print_stmt)]),
            Production::new([Symbol::Rule(if_stmt)]),
            Production::new([Symbol::Rule(while_stmt)]),
            Production::new([Symbol::Rule(block)]),
            Production::new([Symbol::Rule(expr_stmt)]),
        ],
    );
    g.define(
        assign_stmt,
        [Production::new([
            ident,
            t.sym("=")?,
            Symbol::Rule(expr),
            t.sym(";")?,
        ])],
    );
    g.define(
        let_stmt,
        [Production::new([
            t.sym("let")?,
            ident,
            t.sym("=")?,
            Symbol::Rule(expr),
            t.sym(";")?,
        ])],
    );
    g.define(
        print_stmt,
        [Production::new([
            t.sym("print")?,
            Symbol::Rule(expr),
            t.sym(";")?,
        ])],
    );
    g.define(
        if_stmt,
        [Production::new([
            t.sym("if")?,
            Symbol::Rule(expr),
            Symbol::Rule(block),
            Symbol::Opt(else_clause),
        ])],
    );
    g.define(
        else_clause,
        [Production::new([t.sym("else")?, Symbol::Rule(else_body)])],
    );
    g.define(
        else_body,
        [
            Production::new([Symbol::Rule(block)]),
            Production::new([Symbol::Rule(if_stmt)]),
        ],
    );
    g.define(
        while_stmt,
        [Production::new([
            t.sym("while")?,
            Symbol::Rule(expr),
            Symbol::Rule(block),
        ])],
    );
    g.define(
        block,
        [Production::new([
            t.sym("{")?,
            Symbol::Many(stmt),
            t.sym("}")?,
        ])],
    );
    g.define(
        expr_stmt,
        [Production::new([Symbol::Rule(expr), t.sym(";")?])],
    );

    let mut infix = InfixRule::new(primary);
    for op in ["-", "!"] {
        infix = infix.prefix(t.lit(op)?, 6);
    }
    let levels: [(&[&str], u8, Assoc); 5] = [
        (&["==", "!="], 1, Assoc::Left),
        (&["<", "<=", ">", ">="], 2, Assoc::Left),
        (&["+", "-"], 3, Assoc::Left),
        (&["*", "/", "%"], 4, Assoc::Left),
        (&["^"], 5, Assoc::Right),
    ];
    for (ops, precedence, assoc) in levels {
        for op in ops {
            infix = infix.binary(t.lit(op)?, precedence, assoc);
        }
    }
    g.define_infix(expr, infix);

    g.define(
        primary,
        [
            Production::new([number]),
            Production::new([string]),
            Production::new([ident]),
            Production::new([t.sym("true")?]),
            Production::new([t.sym("false")?]),
            Production::new([Symbol::Rule(group)]),
        ],
    );
    g.define(
        group,
        [Production::new([
            t.sym("(")?,
            Symbol::Rule(expr),
            t.sym(")")?,
        ])],
    );

    for rule in [program, stmt, else_body, primary] {
        g.set_transparent(rule);
    }
    g.set_start(program);
    Ok(g.build()?)
}

/// Synchronization set of the demonstration language.
pub fn demo_sync(table: &TokenTable) -> Result<TokenSet, LanguageError> {
    let t = Tokens(table);
    SYNC.iter().map(|text| t.lit(text)).collect()
}

/// Complete configuration for the demonstration language.
pub fn demo_config() -> Result<FrontendConfig, LanguageError> {
    let table = demo_table()?;
    let grammar = demo_grammar(&table)?;
    let sync = demo_sync(&table)?;
    Ok(FrontendConfig::builder()
        .table(Arc::new(table))
        .grammar(Arc::new(grammar))
        .sync(sync)
        .build()?)
}
