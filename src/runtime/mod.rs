//! Matching runtime
//!
//! Everything generated matcher functions call, plus an interpreter that
//! runs a rule set without generating code.
//!
//! # Module Organization
//!
//! ## Core Types
//! - [`Parser`] - cursor, primitives and rule dispatch
//! - [`Node`] - result records
//! - [`ParserConfig`] - resource limits
//!
//! ## Memoization
//! - [`Memo`] - the `packhas`/`packread`/`packwrite` contract
//! - [`NoMemo`], [`Packrat`], [`FalseOnlyPackrat`], [`ConservativePackrat`]
//!
//! ## In-Process Grammars
//! - [`Grammar`] - executable rule set
//! - [`Hooks`] - semantic actions as closures
//!
//! ## Diagnostics
//! - [`error`] - [`ParseError`]
//! - [`trace`] - rule-call tracing
//! - [`source_location`] - line/column tracking

// ============================================================================
// Module Declarations
// ============================================================================

pub mod error;
pub mod grammar;
pub mod hooks;
mod interp;
pub mod memo;
pub mod node;
pub mod parser;
pub mod regex_cache;
pub mod source_location;
pub mod trace;

// ============================================================================
// Core Types
// ============================================================================

pub use node::{Node, Value};
pub use parser::{
    Matcher, ParseStats, Parser, ParserConfig, DEFAULT_MAX_INPUT_SIZE,
    DEFAULT_MAX_RECURSION_DEPTH,
};

// ============================================================================
// Memoization
// ============================================================================

pub use memo::{ConservativePackrat, FalseOnlyPackrat, Memo, MemoEntry, MemoKey, NoMemo, Packrat};

// ============================================================================
// In-Process Grammars
// ============================================================================

pub use grammar::Grammar;
pub use hooks::{AccessorHook, Hooks, NodeHook, RuleHooks, StoreHook};

// ============================================================================
// Diagnostics
// ============================================================================

pub use error::ParseError;
pub use source_location::SourcePosition;
pub use trace::{ParseTrace, TraceAction, TraceEntry};

// ============================================================================
// Regex Cache
// ============================================================================

pub use regex_cache::{get_or_compile as get_regex, RegexCursor};
