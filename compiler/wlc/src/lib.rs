//! WL compiler front end.
//!
//! Ties the pieces together for one compilation unit and for batches of
//! them:
//!
//! ```text
//! SourceBuffer
//!     │
//!     ▼
//! TokenAnalyzer ──► TokenStream (bounded lookahead)
//!     │
//!     ▼
//! SyntaxAnalyzer ──► SyntaxTree + diagnostics
//! ```
//!
//! A [`FrontendConfig`] holds the language definition and is shared; a
//! [`CompilerContext`] owns everything mutable for one unit. Units never
//! share mutable state, so [`compile_all`] runs them on the rayon pool.

pub mod commands;
mod config;
mod context;
mod language;

use std::sync::Once;

pub use config::{ConfigError, FrontendConfig, FrontendConfigBuilder};
pub use context::{compile, compile_all, CompileOutput, CompilerContext};
pub use language::{demo_config, demo_grammar, demo_sync, demo_table, LanguageError};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
