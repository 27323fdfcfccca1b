//! Structured code builder
//!
//! Generated Rust is assembled as a tree of lines and brace-delimited blocks
//! and only turned into text at the end, so nesting and indentation are
//! always consistent. [`Code::branch`] prunes empty arms the way a hand
//! writer would.

/// One element of a code fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A single line of code
    Text(String),
    /// `open {` body `}close`
    Block {
        /// Text before the opening brace
        open: String,
        /// Block contents
        body: Code,
        /// Text after the closing brace (`;` for `let x = { .. };`)
        close: String,
    },
    /// `if cond {` then `} else {` otherwise `}`
    Branch {
        /// Condition
        cond: String,
        /// Taken arm
        then: Code,
        /// Else arm, omitted when empty
        otherwise: Code,
    },
}

/// A fragment of generated code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    lines: Vec<Line>,
}

impl Code {
    /// Empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment holding one line
    pub fn of(line: impl Into<String>) -> Self {
        Self::new().line(line)
    }

    /// Append a line
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(Line::Text(line.into()));
        self
    }

    /// Append several lines
    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines
            .extend(lines.into_iter().map(|l| Line::Text(l.into())));
        self
    }

    /// Append a braced block
    pub fn block(mut self, open: impl Into<String>, body: Code, close: impl Into<String>) -> Self {
        self.lines.push(Line::Block {
            open: open.into(),
            body,
            close: close.into(),
        });
        self
    }

    /// Append another fragment
    pub fn append(mut self, other: Code) -> Self {
        self.lines.extend(other.lines);
        self
    }

    /// Append a conditional, pruning empty arms
    ///
    /// `cond` must be a boolean expression whenever `then` may be empty, since
    /// that case is emitted as `if !(cond) { otherwise }`. With both arms empty
    /// the condition is still evaluated for its side effects.
    pub fn branch(mut self, cond: impl Into<String>, then: Code, otherwise: Code) -> Self {
        let cond = cond.into();
        match (then.is_empty(), otherwise.is_empty()) {
            (true, true) => {
                self.lines.push(Line::Text(format!("let _ = {};", cond)));
            }
            (true, false) => self.lines.push(Line::Branch {
                cond: negate(&cond),
                then: otherwise,
                otherwise: Code::new(),
            }),
            _ => self.lines.push(Line::Branch {
                cond,
                then,
                otherwise,
            }),
        }
        self
    }

    /// Whether the fragment holds no code
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render with every line prefixed by `indent`, nested blocks indented
    /// four more spaces per level
    pub fn render(&self, indent: &str) -> String {
        let mut out = String::new();
        self.render_into(indent, &mut out);
        out
    }

    fn render_into(&self, indent: &str, out: &mut String) {
        let inner = format!("{}    ", indent);
        for line in &self.lines {
            match line {
                Line::Text(text) if text.is_empty() => out.push('\n'),
                Line::Text(text) => {
                    for part in text.lines() {
                        if part.is_empty() {
                            out.push('\n');
                        } else {
                            out.push_str(indent);
                            out.push_str(part);
                            out.push('\n');
                        }
                    }
                }
                Line::Block { open, body, close } => {
                    out.push_str(&format!("{}{} {{\n", indent, open));
                    body.render_into(&inner, out);
                    out.push_str(&format!("{}}}{}\n", indent, close));
                }
                Line::Branch {
                    cond,
                    then,
                    otherwise,
                } => {
                    out.push_str(&format!("{}if {} {{\n", indent, cond));
                    then.render_into(&inner, out);
                    if otherwise.is_empty() {
                        out.push_str(&format!("{}}}\n", indent));
                    } else {
                        out.push_str(&format!("{}}} else {{\n", indent));
                        otherwise.render_into(&inner, out);
                        out.push_str(&format!("{}}}\n", indent));
                    }
                }
            }
        }
    }
}

/// Negate a boolean condition, simplifying `!x` and plain identifiers
fn negate(cond: &str) -> String {
    let is_simple = cond
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '(' || c == ')');
    match cond.strip_prefix('!') {
        Some(inner) if is_simple_operand(inner) => inner.to_string(),
        _ if is_simple => format!("!{}", cond),
        _ => format!("!({})", cond),
    }
}

fn is_simple_operand(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested() {
        let code = Code::new()
            .line("let a = 1;")
            .block("loop", Code::of("break;"), "")
            .block("let b =", Code::of("2"), ";");
        assert_eq!(
            code.render("  "),
            "  let a = 1;\n  loop {\n      break;\n  }\n  let b = {\n      2\n  };\n"
        );
    }

    #[test]
    fn test_branch_full() {
        let code = Code::new().branch("ok", Code::of("a();"), Code::of("b();"));
        assert_eq!(code.render(""), "if ok {\n    a();\n} else {\n    b();\n}\n");
    }

    #[test]
    fn test_branch_prunes_empty_then() {
        let code = Code::new().branch("ok_0", Code::new(), Code::of("return None;"));
        assert_eq!(code.render(""), "if !ok_0 {\n    return None;\n}\n");

        let code = Code::new().branch("!ok_0", Code::new(), Code::of("f();"));
        assert_eq!(code.render(""), "if ok_0 {\n    f();\n}\n");

        let code = Code::new().branch("count_0 > 0", Code::new(), Code::of("f();"));
        assert_eq!(code.render(""), "if !(count_0 > 0) {\n    f();\n}\n");
    }

    #[test]
    fn test_branch_prunes_empty_else() {
        let code = Code::new().branch("ok", Code::of("a();"), Code::new());
        assert_eq!(code.render(""), "if ok {\n    a();\n}\n");
    }

    #[test]
    fn test_branch_both_empty_keeps_side_effects() {
        let code = Code::new().branch("p.literal(\"x\").is_some()", Code::new(), Code::new());
        assert_eq!(code.render(""), "let _ = p.literal(\"x\").is_some();\n");
    }

    #[test]
    fn test_empty_line_is_kept() {
        let code = Code::of("a();").line("").line("b();");
        assert_eq!(code.render("    "), "    a();\n\n    b();\n");
    }

    #[test]
    fn test_multiline_text_is_indented() {
        let code = Code::of("fn f() {\n    g();\n}");
        assert_eq!(code.render("  "), "  fn f() {\n      g();\n  }\n");
    }
}
