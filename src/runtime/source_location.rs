//! Byte offset to line/column conversion for runtime error messages and
//! debug traces.

use std::fmt;

/// A line/column position in parser input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    /// Byte offset into the input
    pub offset: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in chars
    pub column: usize,
}

impl SourcePosition {
    /// Locate `offset` in `input`
    ///
    /// Offsets past the end clamp to the end; an offset inside a multi-byte
    /// char is moved back to that char's start.
    pub fn from_offset(input: &str, offset: usize) -> Self {
        let mut offset = offset.min(input.len());
        while !input.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &input.as_bytes()[..offset];
        let line = memchr::memchr_iter(b'\n', before).count() + 1;
        let line_start = memchr::memrchr(b'\n', before).map_or(0, |nl| nl + 1);
        let column = input[line_start..offset].chars().count() + 1;
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// At most `limit` chars of `input` from `offset`, newlines shown as ` {NL} `
pub fn preview(input: &str, offset: usize, limit: usize) -> String {
    input
        .get(offset..)
        .unwrap_or("")
        .chars()
        .take(limit)
        .fold(String::new(), |mut out, ch| {
            match ch {
                '\n' => out.push_str(" {NL} "),
                _ => out.push(ch),
            }
            out
        })
}
