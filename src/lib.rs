//! pegc - PEG Parser Compiler with a Packrat Runtime
//!
//! pegc compiles parsing-expression grammars written inside Rust source
//! comments into recursive-descent matcher functions. It provides:
//! - A grammar language with ordered choice, repetition, lookahead, tag
//!   capture, whitespace tokens and `$name` interpolation
//! - Textual rule inheritance (`extends` with replacement lists)
//! - Semantic-action hooks attached to rules
//! - Four interchangeable memoization strategies, from none to full packrat
//! - An in-process interpreter with the same semantics as generated code
//!
//! ## Quick Start
//!
//! ```rust
//! use pegc::runtime::{Grammar, Packrat};
//!
//! let grammar = Grammar::from_source("Repeated: item:('a'|'b')+").unwrap();
//! let node = grammar.parse::<Packrat>("abba", "Repeated").unwrap();
//! assert_eq!(node.texts("item"), vec!["a", "b", "b", "a"]);
//! ```
//!
//! ## Generating Rust
//!
//! ```rust
//! let source = "/*!* Hello\nGreeting: 'hello' [ name:/\\w+/ ]\n*/\n";
//! let out = pegc::compile(source).unwrap();
//! assert!(out.code.contains("pub fn match_Greeting"));
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` (default) - Enable debug logging using the `log` crate

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

// Prelude module for convenient imports
pub mod prelude;

// Grammar compiler: blocks in host source to Rust
pub mod compiler;

// Matching runtime used by generated code and by in-process grammars
pub mod runtime;

/// Re-export commonly used types for convenience
pub use compiler::{
    compile, compile_file, CompileError, CompileOutput, CompileWarning, Compiler, CompilerOptions,
};
pub use runtime::{
    ConservativePackrat, FalseOnlyPackrat, Grammar, Hooks, Memo, NoMemo, Node, Packrat,
    ParseError, Parser, ParserConfig, Value,
};
