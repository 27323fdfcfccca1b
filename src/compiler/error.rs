//! Compile-time diagnostics
//!
//! [`CompileError`] aborts a compile; [`CompileWarning`] is collected and
//! returned next to the generated code.

use std::fmt;

/// Fatal compile error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A rule definition does not match the rule header grammar
    MalformedRule {
        /// The offending definition
        spec: String,
    },

    /// `extends` names a rule that has not been declared yet
    UndefinedParent {
        /// Rule being defined
        rule: String,
        /// Missing parent
        parent: String,
    },

    /// A rule name defined twice in one target
    DuplicateRule {
        /// Rule name
        rule: String,
    },

    /// A replacement rule without an `extends` clause
    ReplaceWithoutExtends {
        /// Rule being defined
        rule: String,
    },

    /// A `!pragma` that is not recognised
    UnknownPragma {
        /// Pragma name including the `!`
        name: String,
    },

    /// An `@flag` in an expression
    UnsupportedFlag {
        /// Rule being tokenized
        rule: String,
        /// Flag name
        flag: String,
    },

    /// A postfix quantifier with nothing before it
    DanglingModifier {
        /// Rule being tokenized
        rule: String,
        /// The modifier character (`:` for a tag)
        modifier: char,
    },

    /// A grammar line that does not start with the block's indentation
    InconsistentIndent {
        /// The offending line
        line: String,
    },

    /// A rule call to a rule the target never defines
    UnknownRule {
        /// Calling rule
        rule: String,
        /// Called name
        callee: String,
    },

    /// A regex that does not compile
    InvalidRegex {
        /// Rule containing the regex
        rule: String,
        /// The pattern
        pattern: String,
        /// Message from the regex engine
        message: String,
    },

    /// Reading or writing a file failed
    Io {
        /// Path involved (`-` for standard streams)
        path: String,
        /// Error message
        message: String,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::MalformedRule { spec } => {
                write!(f, "Malformed rule spec: {}", spec)
            }
            CompileError::UndefinedParent { rule, parent } => write!(
                f,
                "Rule {} extends {}, which has not been defined yet",
                rule, parent
            ),
            CompileError::DuplicateRule { rule } => {
                write!(f, "Rule {} is defined more than once", rule)
            }
            CompileError::ReplaceWithoutExtends { rule } => write!(
                f,
                "Replace matcher {} used without extends clause",
                rule
            ),
            CompileError::UnknownPragma { name } => {
                write!(f, "Unknown pragma {} encountered when compiling parser", name)
            }
            CompileError::UnsupportedFlag { rule, flag } => {
                write!(f, "Flags are not supported: @{} in rule {}", flag, rule)
            }
            CompileError::DanglingModifier { rule, modifier } => write!(
                f,
                "Modifier '{}' in rule {} is not attached to a token",
                modifier, rule
            ),
            CompileError::InconsistentIndent { line } => write!(
                f,
                "Non-blank line with inconsistent indent in parser block: {:?}",
                line
            ),
            CompileError::UnknownRule { rule, callee } => {
                write!(f, "Rule {} calls undefined rule {}", rule, callee)
            }
            CompileError::InvalidRegex {
                rule,
                pattern,
                message,
            } => write!(
                f,
                "Invalid regex /{}/ in rule {}: {}",
                pattern, rule, message
            ),
            CompileError::Io { path, message } => write!(f, "{}: {}", path, message),
        }
    }
}

impl std::error::Error for CompileError {}

/// Kind of compile warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A control character the tokenizer does not know was skipped
    UnrecognizedControl,

    /// A grammar block contained no rules
    EmptyBlock,

    /// A rule can reach itself without consuming input
    ///
    /// PEG matchers loop forever on left recursion.
    LeftRecursion,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedControl => write!(f, "unrecognized control character"),
            Self::EmptyBlock => write!(f, "empty block"),
            Self::LeftRecursion => write!(f, "left recursion"),
        }
    }
}

/// A non-fatal compile diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileWarning {
    /// The kind of warning
    pub kind: WarningKind,
    /// Rule (or target, for block warnings) the warning is about
    pub rule: String,
    /// Human-readable message
    pub message: String,
}

impl CompileWarning {
    /// Create a new warning
    pub fn new(kind: WarningKind, rule: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.rule, self.kind, self.message)
    }
}
