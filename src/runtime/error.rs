//! Runtime error types
//!
//! A rule that does not match is ordinary control flow and never produces an
//! error value. `ParseError` only describes the outcome of a whole parse and the
//! resource limits that abort one.

use super::source_location::SourcePosition;
use std::fmt;

/// Error returned by the top-level parse entry points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The start rule did not match
    Failed {
        /// The byte offset of the cursor when the start rule failed
        position: usize,
    },

    /// The start rule matched but did not consume the entire input
    Incomplete {
        /// Number of bytes in the input
        expected: usize,
        /// Number of bytes consumed by the match
        actual: usize,
    },

    /// Input exceeds the configured maximum size
    InputTooLarge {
        /// Size of the input in bytes
        input_size: usize,
        /// Maximum allowed size
        max_size: usize,
    },

    /// Rule call nesting exceeded the configured maximum depth
    RecursionLimitExceeded {
        /// Depth at which the limit tripped
        depth: usize,
        /// Maximum allowed depth
        max_depth: usize,
    },

    /// A rule name could not be resolved
    UnknownRule {
        /// The name that was looked up
        name: String,
    },
}

impl ParseError {
    /// Create a new Failed error
    #[inline]
    pub fn at_position(position: usize) -> Self {
        ParseError::Failed { position }
    }

    /// Render the error with line and column information taken from `input`
    pub fn format_with_position(&self, input: &str) -> String {
        match self {
            ParseError::Failed { position } => {
                let sp = SourcePosition::from_offset(input, *position);
                format!(
                    "Parse failed at line {}, column {} (byte offset {})",
                    sp.line, sp.column, position
                )
            }
            ParseError::Incomplete { actual, .. } => {
                let sp = SourcePosition::from_offset(input, *actual);
                format!("{} (stopped at {})", self, sp)
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Failed { position } => {
                write!(f, "Parse failed at byte offset {}", position)
            }
            ParseError::Incomplete { expected, actual } => {
                write!(
                    f,
                    "Parse incomplete: expected {} bytes, parsed {}",
                    expected, actual
                )
            }
            ParseError::InputTooLarge {
                input_size,
                max_size,
            } => write!(
                f,
                "Input too large: {} bytes exceeds limit of {} bytes",
                input_size, max_size
            ),
            ParseError::RecursionLimitExceeded { depth, max_depth } => write!(
                f,
                "Recursion limit exceeded: depth {} exceeds limit of {}",
                depth, max_depth
            ),
            ParseError::UnknownRule { name } => write!(f, "Unknown rule: {}", name),
        }
    }
}

impl std::error::Error for ParseError {}
