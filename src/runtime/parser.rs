//! Recursive-descent matcher state
//!
//! Generated `match_<Rule>` functions and the in-process interpreter drive a
//! [`Parser`]: a cursor over an immutable input plus the primitives they need
//! (literals, regexes, whitespace), the result-record lifecycle
//! (`construct`/`store`, ancestor frames, semantic values) and memoized rule
//! dispatch through the parser's [`Memo`] strategy.

use super::{
    error::ParseError,
    memo::{Memo, MemoEntry, NoMemo},
    node::Node,
    regex_cache::RegexCursor,
    source_location::preview,
    trace::{ParseTrace, TraceAction, TraceEntry},
};
use hashbrown::HashMap;

/// Default maximum input size: 100 MB
pub const DEFAULT_MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;

/// Default maximum rule-call nesting depth
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 1000;

/// Characters of upcoming input shown in trace lines
const TRACE_PREVIEW_CHARS: usize = 20;

/// A compiled rule: tries to match at the cursor, returning the finalised
/// result or `None` with the cursor untouched
pub type Matcher<'i, M> = fn(&mut Parser<'i, M>) -> Option<Node>;

/// Parser configuration
///
/// A limit of `0` disables that limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum input size in bytes
    pub max_input_size: usize,
    /// Maximum rule-call nesting depth
    pub max_recursion_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum input size
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// Set maximum recursion depth
    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }
}

/// Work counters for one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Literal match attempts
    pub literal_attempts: usize,
    /// Regex match attempts
    pub regex_attempts: usize,
    /// Whitespace match attempts
    pub whitespace_attempts: usize,
    /// Rule calls, including those answered by the memo
    pub calls: usize,
    /// Rule calls answered by the memo
    pub memo_hits: usize,
}

impl ParseStats {
    /// Total primitive match attempts
    pub fn primitive_attempts(&self) -> usize {
        self.literal_attempts + self.regex_attempts + self.whitespace_attempts
    }
}

/// Matcher state for one parse of one input
pub struct Parser<'i, M: Memo = NoMemo> {
    input: &'i str,
    pos: usize,
    depth: usize,
    config: ParserConfig,
    memo: M,
    /// Partial results of the enclosing rule invocations, innermost last
    frames: Vec<Node>,
    regexes: HashMap<String, RegexCursor>,
    vars: HashMap<String, String>,
    stats: ParseStats,
    trace: Option<ParseTrace>,
    /// Set when a resource limit aborts the parse
    error: Option<ParseError>,
}

impl<'i, M: Memo> Parser<'i, M> {
    /// Create a parser over `input` with the default configuration
    pub fn new(input: &'i str) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    /// Create a parser with an explicit configuration
    pub fn with_config(input: &'i str, config: ParserConfig) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            config,
            memo: M::default(),
            frames: Vec::new(),
            regexes: HashMap::new(),
            vars: HashMap::new(),
            stats: ParseStats::default(),
            trace: None,
            error: None,
        }
    }

    /// The input being matched
    #[inline]
    pub fn input(&self) -> &'i str {
        self.input
    }

    /// Current cursor position
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor back to a saved position
    #[inline]
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    /// Whether the cursor is at the end of input
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Current rule-call nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The configuration in effect
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Work counters so far
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// The memo table
    pub fn memo(&self) -> &M {
        &self.memo
    }

    /// The error that aborted the parse, if any
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Define a parser-level semantic value, consulted by `expression` after
    /// the result records
    pub fn set_var(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    /// Start recording rule-call traces
    pub fn enable_trace(&mut self) {
        self.trace.get_or_insert_with(ParseTrace::new);
    }

    /// The recorded trace, if tracing is enabled
    pub fn trace(&self) -> Option<&ParseTrace> {
        self.trace.as_ref()
    }

    // ========================================================================
    // Primitives
    // ========================================================================

    /// Match `lit` at the cursor
    pub fn literal(&mut self, lit: &str) -> Option<&'i str> {
        self.stats.literal_attempts += 1;
        let input = self.input;
        let end = self.pos + lit.len();
        if input.as_bytes().get(self.pos..end)? != lit.as_bytes() {
            return None;
        }
        let text = input.get(self.pos..end)?;
        self.pos = end;
        Some(text)
    }

    /// Match the regex `pattern` anchored at the cursor
    pub fn rx(&mut self, pattern: &str) -> Option<&'i str> {
        self.stats.regex_attempts += 1;
        if !self.regexes.contains_key(pattern) {
            let Some(cursor) = RegexCursor::new(pattern) else {
                log_warn!("invalid regex /{}/ treated as a failed match", pattern);
                return None;
            };
            self.regexes.insert(pattern.to_string(), cursor);
        }
        let input = self.input;
        let end = self.regexes.get_mut(pattern)?.match_at(input, self.pos)?;
        let text = input.get(self.pos..end)?;
        self.pos = end;
        Some(text)
    }

    /// Match spaces and tabs
    ///
    /// Consumed whitespace is reported as a single `" "`. With nothing to
    /// consume, optional whitespace succeeds with `""`; mandatory whitespace
    /// succeeds with `""` only when the cursor does not sit between two word
    /// characters.
    pub fn whitespace(&mut self, optional: bool) -> Option<&'static str> {
        self.stats.whitespace_attempts += 1;
        let rest = self.input.as_bytes().get(self.pos..).unwrap_or(&[]);
        let run = rest
            .iter()
            .take_while(|b| matches!(b, b' ' | b'\t'))
            .count();
        if run > 0 {
            self.pos += run;
            return Some(" ");
        }
        if optional || !self.between_word_chars() {
            Some("")
        } else {
            None
        }
    }

    fn between_word_chars(&self) -> bool {
        let before = self
            .input
            .get(..self.pos)
            .and_then(|s| s.chars().next_back());
        let after = self.input.get(self.pos..).and_then(|s| s.chars().next());
        matches!((before, after), (Some(b), Some(a)) if is_word_char(b) && is_word_char(a))
    }

    // ========================================================================
    // Result records
    // ========================================================================

    /// Start a result record, seeded with default arguments
    pub fn construct(&self, matchrule: &str, name: &str, args: &[(&str, &str)]) -> Node {
        Node::with_args(matchrule, name, args)
    }

    /// Default store: append `sub`'s text to `result` and capture it under
    /// `tag`, accumulating repeated tags into a list
    pub fn store(&self, result: &mut Node, sub: Node, tag: Option<&str>) {
        result.absorb(sub, tag);
    }

    /// Resolve the semantic value `name`
    ///
    /// Searches the current record, then each enclosing rule's record from
    /// the innermost outwards. On every record a captured field (or the
    /// built-in `text`, `name`, `matchrule`) wins, then `accessor` for that
    /// record's rule. Parser variables come last.
    ///
    /// # Arguments
    /// * `result` - The record being built by the current rule
    /// * `name` - Value to look up, as written after `$`
    /// * `accessor` - Computed values per record, usually the generated
    ///   `<Target>_accessor`
    ///
    /// # Returns
    /// The value as a string; `""` when nothing defines `name`.
    ///
    /// # Example
    ///
    /// ```
    /// use pegc::runtime::{Node, Parser};
    ///
    /// let mut parser: Parser = Parser::new("");
    /// parser.push_frame(Node::with_args("Outer", "Outer", &[("close", ">")]));
    /// let inner = Node::new("Inner", "Inner");
    /// assert_eq!(parser.expression(&inner, "close", |_, _| None), ">");
    /// assert_eq!(parser.expression(&inner, "missing", |_, _| None), "");
    /// ```
    pub fn expression<F>(&self, result: &Node, name: &str, accessor: F) -> String
    where
        F: Fn(&Node, &str) -> Option<String>,
    {
        for node in std::iter::once(result).chain(self.frames.iter().rev()) {
            if let Some(value) = node.lookup(name) {
                return value.to_string();
            }
            if let Some(value) = accessor(node, name) {
                return value;
            }
        }
        self.vars.get(name).cloned().unwrap_or_default()
    }

    /// Park the current record while a nested match builds its own
    pub fn push_frame(&mut self, node: Node) {
        self.frames.push(node);
    }

    /// Take back the most recently parked record
    pub fn pop_frame(&mut self) -> Node {
        self.frames.pop().unwrap_or_default()
    }

    /// Records of the enclosing rule invocations, outermost first
    pub fn frames(&self) -> &[Node] {
        &self.frames
    }

    // ========================================================================
    // Rule dispatch
    // ========================================================================

    /// Call the rule with id `rule`, consulting the memo first
    ///
    /// # Arguments
    /// * `rule` - Memo key of the rule, its id within the target
    /// * `matcher` - The rule's generated `match_<Rule>` function
    ///
    /// # Returns
    /// * `Some(node)` with the cursor after the match
    /// * `None` with the cursor where it was, or once a resource limit has
    ///   aborted the parse (see [`Parser::error`])
    ///
    /// # Example
    ///
    /// ```
    /// use pegc::runtime::{Memo, Node, Packrat, Parser};
    ///
    /// fn match_digits<M: Memo>(p: &mut Parser<'_, M>) -> Option<Node> {
    ///     let mut result = p.construct("Digits", "Digits", &[]);
    ///     result.text.push_str(p.rx("[0-9]+")?);
    ///     Some(result)
    /// }
    ///
    /// let mut parser = Parser::<Packrat>::new("42");
    /// assert_eq!(parser.call(0, match_digits).unwrap().text, "42");
    /// parser.seek(0);
    /// parser.call(0, match_digits);
    /// assert_eq!(parser.stats().memo_hits, 1);
    /// ```
    pub fn call(&mut self, rule: usize, matcher: Matcher<'i, M>) -> Option<Node> {
        self.call_with(Some(rule), matcher)
    }

    /// Call a rule that must not be memoized
    ///
    /// Used for rules whose match depends on semantic values of the records
    /// that enclose them; see [`RuleSet::memo_keys`](crate::compiler::RuleSet::memo_keys).
    pub fn call_unmemoized(&mut self, matcher: Matcher<'i, M>) -> Option<Node> {
        self.call_with(None, matcher)
    }

    /// Call a rule whose body is given as a closure
    ///
    /// `rule` is the memo key; with `None` the memo is neither read nor
    /// written. Depth limits apply either way.
    pub fn call_with<F>(&mut self, rule: Option<usize>, body: F) -> Option<Node>
    where
        F: FnOnce(&mut Self) -> Option<Node>,
    {
        if self.error.is_some() {
            return None;
        }
        let start = self.pos;
        self.stats.calls += 1;

        if let Some(rule) = rule.filter(|&rule| self.memo.packhas(rule, start)) {
            if let Some(entry) = self.memo.packread(rule, start) {
                self.stats.memo_hits += 1;
                return match entry {
                    MemoEntry::Failed => None,
                    MemoEntry::Matched { node, end } => {
                        self.pos = end;
                        Some(node)
                    }
                };
            }
        }

        let max_depth = self.config.max_recursion_depth;
        if max_depth > 0 && self.depth >= max_depth {
            log_warn!("rule call depth {} exceeds limit {}", self.depth + 1, max_depth);
            self.error = Some(ParseError::RecursionLimitExceeded {
                depth: self.depth + 1,
                max_depth,
            });
            return None;
        }

        self.depth += 1;
        let result = body(self);
        self.depth -= 1;

        if self.error.is_some() {
            self.pos = start;
            return None;
        }
        if let Some(rule) = rule {
            self.memo.packwrite(rule, start, result.as_ref(), self.pos);
        }
        result
    }

    /// Report that a traced rule call is about to start
    pub fn trace_enter(&mut self, rule: &str) {
        let entry = TraceEntry {
            position: self.pos,
            rule: rule.to_string(),
            action: TraceAction::Enter {
                preview: preview(self.input, self.pos, TRACE_PREVIEW_CHARS),
            },
            depth: self.depth,
        };
        self.record(entry);
    }

    /// Report the outcome of a traced rule call
    pub fn trace_exit(&mut self, rule: &str, matched: bool) {
        let entry = TraceEntry {
            position: self.pos,
            rule: rule.to_string(),
            action: if matched {
                TraceAction::Match
            } else {
                TraceAction::Fail
            },
            depth: self.depth,
        };
        self.record(entry);
    }

    fn record(&mut self, entry: TraceEntry) {
        log_debug!("{}", ParseTrace::format_entry(&entry));
        if let Some(trace) = self.trace.as_mut() {
            trace.add(entry);
        }
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Run a start rule at the cursor
    pub fn run(&mut self, matcher: Matcher<'i, M>) -> Result<Node, ParseError> {
        self.run_with(matcher)
    }

    /// Run a start rule given as a closure
    pub fn run_with<F>(&mut self, body: F) -> Result<Node, ParseError>
    where
        F: FnOnce(&mut Self) -> Option<Node>,
    {
        self.check_input_size()?;
        log_debug!(
            "parse start: {} bytes at {} with {} memo",
            self.input.len(),
            self.pos,
            M::NAME
        );
        let result = body(self);
        if let Some(err) = self.error.clone() {
            return Err(err);
        }
        log_debug!(
            "parse end: matched={} pos={} stats={:?}",
            result.is_some(),
            self.pos,
            self.stats
        );
        result.ok_or(ParseError::Failed { position: self.pos })
    }

    /// Run a start rule and require it to consume the whole input
    pub fn parse_all(&mut self, matcher: Matcher<'i, M>) -> Result<Node, ParseError> {
        self.parse_all_with(matcher)
    }

    /// Closure form of [`Parser::parse_all`]
    pub fn parse_all_with<F>(&mut self, body: F) -> Result<Node, ParseError>
    where
        F: FnOnce(&mut Self) -> Option<Node>,
    {
        let node = self.run_with(body)?;
        if self.pos != self.input.len() {
            return Err(ParseError::Incomplete {
                expected: self.input.len(),
                actual: self.pos,
            });
        }
        Ok(node)
    }

    fn check_input_size(&self) -> Result<(), ParseError> {
        let max_size = self.config.max_input_size;
        if max_size > 0 && self.input.len() > max_size {
            return Err(ParseError::InputTooLarge {
                input_size: self.input.len(),
                max_size,
            });
        }
        Ok(())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::memo::Packrat;

    fn match_digits<M: Memo>(p: &mut Parser<'_, M>) -> Option<Node> {
        let mut result = p.construct("Digits", "Digits", &[]);
        let text = p.rx(r"[0-9]+")?;
        result.text.push_str(text);
        Some(result)
    }

    fn match_deep<M: Memo>(p: &mut Parser<'_, M>) -> Option<Node> {
        p.call(1, match_deep)
    }

    #[test]
    fn test_literal_advances_only_on_match() {
        let mut p: Parser = Parser::new("hello world");
        assert_eq!(p.literal("help"), None);
        assert_eq!(p.pos(), 0);
        assert_eq!(p.literal("hello"), Some("hello"));
        assert_eq!(p.pos(), 5);
        assert_eq!(p.literal(" world!"), None);
        assert_eq!(p.pos(), 5);
    }

    #[test]
    fn test_rx_is_anchored() {
        let mut p: Parser = Parser::new("ab12");
        assert_eq!(p.rx(r"\d+"), None);
        p.seek(2);
        assert_eq!(p.rx(r"\d+"), Some("12"));
        assert!(p.at_end());
        assert_eq!(p.stats().regex_attempts, 2);
    }

    #[test]
    fn test_invalid_regex_fails() {
        let mut p: Parser = Parser::new("abc");
        assert_eq!(p.rx("(abc"), None);
        assert_eq!(p.pos(), 0);
    }

    #[test]
    fn test_whitespace_modes() {
        let mut p: Parser = Parser::new("a  b");
        p.seek(1);
        assert_eq!(p.whitespace(false), Some(" "));
        assert_eq!(p.pos(), 3);

        let mut p: Parser = Parser::new("ab");
        p.seek(1);
        assert_eq!(p.whitespace(false), None);
        assert_eq!(p.whitespace(true), Some(""));

        let mut p: Parser = Parser::new("a!");
        p.seek(1);
        assert_eq!(p.whitespace(false), Some(""));
        p.seek(2);
        assert_eq!(p.whitespace(false), Some(""));
    }

    #[test]
    fn test_expression_search_order() {
        let mut p: Parser = Parser::new("");
        p.set_var("mode", "from-parser");

        let mut outer = Node::with_args("Outer", "Outer", &[("mode", "outer")]);
        outer.text = "outer text".to_string();
        p.push_frame(outer);
        let inner = Node::new("Inner", "Inner");

        assert_eq!(p.expression(&inner, "mode", |_, _| None), "outer");
        assert_eq!(
            p.expression(&inner, "other", |node, name| {
                (node.matchrule == "Inner" && name == "other").then(|| "acc".to_string())
            }),
            "acc"
        );

        p.pop_frame();
        assert_eq!(p.expression(&inner, "mode", |_, _| None), "from-parser");
        assert_eq!(p.expression(&inner, "nothing", |_, _| None), "");
    }

    #[test]
    fn test_call_uses_memo() {
        let mut p: Parser<'_, Packrat> = Parser::new("123");
        let first = p.call(0, match_digits);
        assert_eq!(p.pos(), 3);
        p.seek(0);
        let second = p.call(0, match_digits);
        assert_eq!(first, second);
        assert_eq!(p.pos(), 3);
        assert_eq!(p.stats().memo_hits, 1);
        assert_eq!(p.stats().regex_attempts, 1);
    }

    #[test]
    fn test_unmemoized_call_bypasses_memo() {
        let mut p: Parser<'_, Packrat> = Parser::new("123");
        assert!(p.call_unmemoized(match_digits).is_some());
        p.seek(0);
        assert!(p.call_unmemoized(match_digits).is_some());
        assert_eq!(p.pos(), 3);
        assert_eq!(p.stats().memo_hits, 0);
        assert_eq!(p.stats().regex_attempts, 2);
        assert!(p.memo().is_empty());
    }

    #[test]
    fn test_recursion_limit_poisons_parse() {
        let config = ParserConfig::new().with_max_recursion_depth(8);
        let mut p: Parser = Parser::with_config("x", config);
        let err = p.run(match_deep).unwrap_err();
        assert_eq!(
            err,
            ParseError::RecursionLimitExceeded {
                depth: 9,
                max_depth: 8
            }
        );
    }

    #[test]
    fn test_input_too_large() {
        let config = ParserConfig::new().with_max_input_size(2);
        let mut p: Parser = Parser::with_config("123", config);
        assert!(matches!(
            p.run(match_digits),
            Err(ParseError::InputTooLarge { input_size: 3, .. })
        ));
    }

    #[test]
    fn test_parse_all_reports_incomplete() {
        let mut p: Parser = Parser::new("12ab");
        assert_eq!(
            p.parse_all(match_digits),
            Err(ParseError::Incomplete {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_trace_records_calls() {
        let mut p: Parser = Parser::new("42\n");
        p.enable_trace();
        p.trace_enter("Digits");
        let matched = p.call(0, match_digits).is_some();
        p.trace_exit("Digits", matched);

        let trace = p.trace().unwrap();
        assert_eq!(trace.calls(), 1);
        assert_eq!(
            trace.format(),
            "Matching against Digits (42 {NL} )\nMATCH\n"
        );
    }
}
