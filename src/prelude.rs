//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from pegc. Generated
//! parsers and hand-written hooks usually start with:
//!
//! ```
//! use pegc::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Runtime
//! - [`Parser`] - Matcher state for one parse
//! - [`Node`] / [`Value`] - Result records and captured fields
//! - [`ParserConfig`] - Resource limits
//! - [`ParseError`] - Parse error type
//!
//! ## Memoization
//! - [`Memo`], [`NoMemo`], [`Packrat`], [`FalseOnlyPackrat`], [`ConservativePackrat`]
//!
//! ## In-Process Grammars
//! - [`Grammar`] - Executable rule set
//! - [`Hooks`] - Semantic actions as closures
//!
//! ## Compiler
//! - [`compile()`] - Compile host source
//! - [`Compiler`] / [`CompilerOptions`] - Configured compiler
//! - [`CompileError`] / [`CompileWarning`] - Diagnostics

pub use crate::compiler::{
    compile, CompileError, CompileOutput, CompileWarning, Compiler, CompilerOptions, WarningKind,
};
pub use crate::runtime::{
    ConservativePackrat, FalseOnlyPackrat, Grammar, Hooks, Matcher, Memo, NoMemo, Node, Packrat,
    ParseError, Parser, ParserConfig, Value,
};
