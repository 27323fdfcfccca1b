//! Rule-call tracing
//!
//! Rules compiled after a `!debug` pragma report every rule call they make.
//! The parser logs each event and, when tracing is enabled, records it in a
//! [`ParseTrace`] that can be inspected or rendered after the parse.

use std::fmt::Write;

/// Recorded trace of rule calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseTrace {
    /// Trace entries
    pub entries: Vec<TraceEntry>,
}

/// A single trace entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    /// Position in input
    pub position: usize,
    /// Rule being called
    pub rule: String,
    /// What happened
    pub action: TraceAction,
    /// Call depth
    pub depth: usize,
}

/// Trace action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceAction {
    /// About to try the rule; carries a preview of the upcoming input
    Enter {
        /// Next few characters of input
        preview: String,
    },
    /// The rule matched
    Match,
    /// The rule failed
    Fail,
}

impl ParseTrace {
    /// Create a new empty trace
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an entry
    pub fn add(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    /// Render one entry as an indented line
    pub fn format_entry(entry: &TraceEntry) -> String {
        let indent = "  ".repeat(entry.depth);
        match &entry.action {
            TraceAction::Enter { preview } => {
                format!("{}Matching against {} ({})", indent, entry.rule, preview)
            }
            TraceAction::Match => format!("{}MATCH", indent),
            TraceAction::Fail => format!("{}FAIL", indent),
        }
    }

    /// Format the whole trace, one line per entry
    pub fn format(&self) -> String {
        let mut output = String::new();
        for entry in &self.entries {
            let _ = writeln!(output, "{}", Self::format_entry(entry));
        }
        output
    }

    /// Number of rule calls that were entered
    pub fn calls(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.action, TraceAction::Enter { .. }))
            .count()
    }
}
