//! In-process grammars
//!
//! A [`Grammar`] runs a compiled [`RuleSet`] directly, without generating
//! Rust first. Matching goes through the same [`Parser`] (and therefore the
//! same memo strategies and limits) as generated code.
//!
//! # Example
//!
//! ```
//! use pegc::runtime::{Grammar, NoMemo};
//!
//! let grammar = Grammar::from_source("Greeting: 'hello' [ name:/\\w+/ ] '!'").unwrap();
//! let node = grammar.parse::<NoMemo>("hello world!", "Greeting").unwrap();
//! assert_eq!(node.child("name").unwrap().text, "world");
//! ```

use super::error::ParseError;
use super::hooks::{Hooks, RuleHooks};
use super::interp::RuleInterpreter;
use super::memo::Memo;
use super::node::Node;
use super::parser::{Parser, ParserConfig};
use crate::compiler::error::{CompileError, CompileWarning};
use crate::compiler::ruleset::RuleSet;

/// Target name of grammars built from bare rule text
const GRAMMAR_TARGET: &str = "Grammar";

/// An executable rule set
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: RuleSet,
    memo_keys: Vec<Option<usize>>,
    hooks: Vec<RuleHooks>,
    warnings: Vec<CompileWarning>,
}

impl Grammar {
    /// Wrap a rule set, checking that every called rule exists
    pub fn new(rules: RuleSet) -> Result<Self, CompileError> {
        rules.validate()?;
        let mut warnings = Vec::new();
        rules.analyze(&mut warnings);
        Ok(Self {
            memo_keys: rules.memo_keys(),
            hooks: vec![RuleHooks::default(); rules.len()],
            rules,
            warnings,
        })
    }

    /// Compile rule definitions written at column zero
    pub fn from_source(text: &str) -> Result<Self, CompileError> {
        Self::from_source_with_debug(text, false)
    }

    /// [`Grammar::from_source`], optionally tracing every rule call
    pub fn from_source_with_debug(text: &str, debug: bool) -> Result<Self, CompileError> {
        let mut rules = RuleSet::new(GRAMMAR_TARGET);
        let mut warnings = Vec::new();
        rules.parse_block("", text, debug, &mut warnings)?;
        let mut grammar = Self::new(rules)?;
        warnings.append(&mut grammar.warnings);
        grammar.warnings = warnings;
        Ok(grammar)
    }

    /// Attach semantic-action hooks, resolving them once per rule
    pub fn with_hooks(mut self, hooks: &Hooks) -> Self {
        self.hooks = self
            .rules
            .rules()
            .iter()
            .map(|rule| {
                let typestack: Vec<String> = self
                    .rules
                    .typestack(&rule.name)
                    .iter()
                    .map(|r| r.name.clone())
                    .collect();
                hooks.resolve(&typestack)
            })
            .collect();
        self
    }

    /// The underlying rules
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Diagnostics collected while compiling
    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    /// Call the named rule at the parser's cursor
    ///
    /// Goes through the parser's memo like any other rule call, unless the
    /// rule reads `$name` values. An unknown name simply fails.
    pub fn match_rule<M: Memo>(&self, parser: &mut Parser<'_, M>, name: &str) -> Option<Node> {
        self.call(parser, name)
    }

    /// Parse the whole of `input` with `rule` as the start rule
    ///
    /// # Arguments
    /// * `input` - Text to parse
    /// * `rule` - Name of the start rule
    ///
    /// The memo strategy is chosen by the type parameter and never changes
    /// the outcome, only the work done.
    ///
    /// # Returns
    /// * `Ok(node)` - The start rule's result record
    /// * `Err(ParseError::UnknownRule)` - No rule is called `rule`
    /// * `Err(ParseError::Failed)` / `Err(ParseError::Incomplete)` - The rule
    ///   did not match, or matched only a prefix of `input`
    ///
    /// # Example
    ///
    /// ```
    /// use pegc::runtime::{Grammar, Packrat, ParseError};
    ///
    /// let grammar = Grammar::from_source("Word: /[a-z]+/\nList: Word (',' Word)*").unwrap();
    /// let node = grammar.parse::<Packrat>("a,bc", "List").unwrap();
    /// assert_eq!(node.texts("Word"), vec!["a", "bc"]);
    /// assert!(matches!(
    ///     grammar.parse::<Packrat>("a,", "List"),
    ///     Err(ParseError::Incomplete { expected: 2, actual: 1 })
    /// ));
    /// ```
    pub fn parse<M: Memo>(&self, input: &str, rule: &str) -> Result<Node, ParseError> {
        self.parse_with_config::<M>(input, rule, ParserConfig::default())
    }

    /// [`Grammar::parse`] with explicit parser limits
    pub fn parse_with_config<M: Memo>(
        &self,
        input: &str,
        rule: &str,
        config: ParserConfig,
    ) -> Result<Node, ParseError> {
        if self.rules.id_of(rule).is_none() {
            return Err(ParseError::UnknownRule {
                name: rule.to_string(),
            });
        }
        let mut parser = Parser::<M>::with_config(input, config);
        parser.parse_all_with(|p| self.call(p, rule))
    }

    /// Serialize the rules (headers, expressions, token trees) as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.rules)
    }

    pub(crate) fn call<M: Memo>(&self, parser: &mut Parser<'_, M>, name: &str) -> Option<Node> {
        let id = self.rules.id_of(name)?;
        parser.call_with(self.memo_keys[id], |p| self.run_rule(id, p))
    }

    fn run_rule<M: Memo>(&self, id: usize, parser: &mut Parser<'_, M>) -> Option<Node> {
        let rule = &self.rules.rules()[id];
        RuleInterpreter::new(self, rule, &self.hooks[id]).run(parser)
    }

    /// Semantic value `name` of `node` from its rule's accessor hooks
    pub(crate) fn accessor(&self, node: &Node, name: &str) -> Option<String> {
        let id = self.rules.id_of(&node.matchrule)?;
        self.hooks[id].accessors.get(name).and_then(|hook| hook(node))
    }
}
