//! Grammar compiler
//!
//! Turns grammar blocks embedded in host Rust source into packrat matcher
//! functions.
//!
//! # Module Organization
//!
//! ## Front End
//! - [`tokenizer`] - expression text to [`Token`] tree
//! - [`rule`] - rule headers, replacement rules, attached functions
//! - [`ruleset`] - the ordered rules of one target
//!
//! ## Back End
//! - [`code`] - structured code builder
//! - [`emit`] - continuation-passing code emission
//!
//! ## Driver
//! - [`extract`] - block scanning, pragmas, two-pass rendering
//!
//! ## Diagnostics
//! - [`error`] - [`CompileError`] and [`CompileWarning`]

// ============================================================================
// Module Declarations
// ============================================================================

pub mod code;
pub mod emit;
pub mod error;
pub mod extract;
pub mod rule;
pub mod ruleset;
pub mod token;
pub mod tokenizer;

// ============================================================================
// Driver
// ============================================================================

pub use extract::{
    compile, compile_file, compile_file_with, CompileOutput, Compiler, CompilerOptions,
};

// ============================================================================
// Grammar Model
// ============================================================================

pub use rule::{AttachedFn, Rule, RuleMode};
pub use ruleset::RuleSet;
pub use token::{Callee, Modifiers, Segment, Template, Token, TokenKind, Wrapper};
pub use tokenizer::tokenize;

// ============================================================================
// Code Generation
// ============================================================================

pub use code::{Code, Line};
pub use emit::{Continuations, Emitter};

// ============================================================================
// Diagnostics
// ============================================================================

pub use error::{CompileError, CompileWarning, WarningKind};
