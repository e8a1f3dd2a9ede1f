//! One compilation unit.
//!
//! A [`CompilerContext`] exclusively owns the token stream (and through it
//! the token analyzer) and the syntax analyzer for a single source buffer.
//! [`compile`](CompilerContext::compile) consumes it, so a context can never
//! be reused for a second unit.

use rayon::prelude::*;
use tracing::debug;
use wl_diagnostic::DiagnosticSink;
use wl_ir::SyntaxTree;
use wl_lexer::{TokenAnalyzer, TokenStream};
use wl_lexer_core::SourceBuffer;
use wl_parse::SyntaxAnalyzer;

use crate::FrontendConfig;

/// Result of compiling one unit.
#[derive(Debug)]
pub struct CompileOutput<'src> {
    pub tree: SyntaxTree<'src>,
    pub diagnostics: DiagnosticSink,
}

impl CompileOutput<'_> {
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

pub struct CompilerContext<'src> {
    source: &'src SourceBuffer,
    stream: TokenStream<'src>,
    analyzer: SyntaxAnalyzer,
}

impl<'src> CompilerContext<'src> {
    pub fn new(config: &FrontendConfig, source: &'src SourceBuffer) -> Self {
        let tokens = TokenAnalyzer::new(std::sync::Arc::clone(config.table()), source);
        CompilerContext {
            source,
            stream: TokenStream::new(tokens, config.lookahead()),
            analyzer: config.syntax_analyzer(),
        }
    }

    #[inline]
    pub fn source(&self) -> &'src SourceBuffer {
        self.source
    }

    /// Tokenize and parse the whole unit.
    pub fn compile(self) -> CompileOutput<'src> {
        let CompilerContext {
            source,
            stream,
            analyzer,
        } = self;
        let (tree, reported) = analyzer.parse(stream);
        let mut diagnostics = DiagnosticSink::new();
        diagnostics.extend(reported);
        debug!(
            unit = source.name().unwrap_or("<input>"),
            bytes = source.len(),
            nodes = tree.len(),
            errors = diagnostics.error_count(),
            "compiled unit"
        );
        CompileOutput { tree, diagnostics }
    }
}

/// Compile one unit with `config`.
pub fn compile<'src>(config: &FrontendConfig, source: &'src SourceBuffer) -> CompileOutput<'src> {
    CompilerContext::new(config, source).compile()
}

/// Compile every unit in parallel, one context each, sharing the language
/// definition. Results are in input order.
pub fn compile_all<'src>(
    config: &FrontendConfig,
    sources: &'src [SourceBuffer],
) -> Vec<CompileOutput<'src>> {
    sources
        .par_iter()
        .map(|source| compile(config, source))
        .collect()
}
