//! Rule sets
//!
//! A [`RuleSet`] collects the rules of one target (one generated parser) in
//! declaration order. A rule's id is its index, which is also its memo key
//! component at run time, unless the rule's match depends on its callers'
//! records (see [`RuleSet::memo_keys`]).

use super::code::Code;
use super::emit::Emitter;
use super::error::{CompileError, CompileWarning, WarningKind};
use super::rule::{sanitize, Rule};
use super::token::{Token, TokenKind};
use crate::runtime::regex_cache;
use hashbrown::{HashMap, HashSet};
use serde::Serialize;

/// The rules of one target
#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    target: String,
    rules: Vec<Rule>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl RuleSet {
    /// Empty rule set for `target`
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            rules: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Target name as written
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Target name usable as a Rust identifier prefix
    pub fn target_ident(&self) -> String {
        sanitize(&self.target)
    }

    /// Split a grammar block into rule definitions and add them
    ///
    /// Every non-blank line must start with `indent`. A line with nothing
    /// but `indent` before its first character starts a new rule; deeper
    /// lines continue the current one. Blank lines and `#` comment lines are
    /// skipped. Returns the ids of the rules added.
    pub fn parse_block(
        &mut self,
        indent: &str,
        text: &str,
        debug: bool,
        warnings: &mut Vec<CompileWarning>,
    ) -> Result<Vec<usize>, CompileError> {
        let mut definitions: Vec<Vec<String>> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || is_comment(trimmed) {
                continue;
            }
            let rest = line
                .strip_prefix(indent)
                .ok_or_else(|| CompileError::InconsistentIndent {
                    line: line.to_string(),
                })?;
            if rest.starts_with(|c: char| c.is_whitespace()) {
                match definitions.last_mut() {
                    Some(current) => current.push(rest.to_string()),
                    None => {
                        return Err(CompileError::MalformedRule {
                            spec: rest.to_string(),
                        })
                    }
                }
            } else {
                definitions.push(vec![rest.to_string()]);
            }
        }

        let mut ids = Vec::with_capacity(definitions.len());
        for lines in &definitions {
            let rule = Rule::parse(lines, self, debug, warnings)?;
            ids.push(self.add_rule(rule)?);
        }
        log_debug!(
            "{}: {} rule(s) parsed from block",
            self.target,
            ids.len()
        );
        Ok(ids)
    }

    /// Append a rule, returning its id
    pub fn add_rule(&mut self, rule: Rule) -> Result<usize, CompileError> {
        if self.index.contains_key(&rule.name) {
            return Err(CompileError::DuplicateRule { rule: rule.name });
        }
        let id = self.rules.len();
        self.index.insert(rule.name.clone(), id);
        self.rules.push(rule);
        Ok(id)
    }

    /// Rule by name
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.id_of(name).map(|id| &self.rules[id])
    }

    /// Id of the named rule
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// All rules in declaration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The named rule followed by its ancestors, most specific first
    pub fn typestack(&self, name: &str) -> Vec<&Rule> {
        let mut stack = Vec::new();
        let mut current = self.get(name);
        while let Some(rule) = current {
            stack.push(rule);
            current = rule.extends.as_deref().and_then(|parent| self.get(parent));
        }
        stack
    }

    /// Check that every called rule exists and every fixed regex compiles
    pub fn validate(&self) -> Result<(), CompileError> {
        for rule in &self.rules {
            for callee in rule.root.named_calls() {
                if !self.index.contains_key(callee) {
                    return Err(CompileError::UnknownRule {
                        rule: rule.name.clone(),
                        callee: callee.to_string(),
                    });
                }
            }
            let mut patterns = Vec::new();
            static_regexes(&rule.root, &mut patterns);
            for pattern in patterns {
                if let Err(e) = regex_cache::get_or_compile(pattern) {
                    return Err(CompileError::InvalidRegex {
                        rule: rule.name.clone(),
                        pattern: pattern.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Report rules that can reach themselves without consuming input
    pub fn analyze(&self, warnings: &mut Vec<CompileWarning>) {
        for rule in &self.rules {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut pending: Vec<&str> = rule.root.leading_calls();
            while let Some(name) = pending.pop() {
                if name == rule.name {
                    let warning = CompileWarning::new(
                        WarningKind::LeftRecursion,
                        &rule.name,
                        format!("{} can call itself without consuming input", rule.name),
                    );
                    log_warn!("{}", warning);
                    warnings.push(warning);
                    break;
                }
                if !seen.insert(name) {
                    continue;
                }
                if let Some(callee) = self.get(name) {
                    pending.extend(callee.root.leading_calls());
                }
            }
        }
    }

    /// Memo key of every rule, indexed by rule id
    ///
    /// A rule that looks up `$name` values, or calls a rule that does, can
    /// resolve them from the records of whoever called it, so the same
    /// `(rule, position)` may match differently under different callers.
    /// Such rules get `None` and are never memoized; every other rule is
    /// keyed by its id.
    pub fn memo_keys(&self) -> Vec<Option<usize>> {
        let mut dependent: Vec<bool> = self.rules.iter().map(|r| r.root.reads_values()).collect();
        let callees: Vec<Vec<usize>> = self
            .rules
            .iter()
            .map(|r| {
                r.root
                    .named_calls()
                    .into_iter()
                    .filter_map(|name| self.id_of(name))
                    .collect()
            })
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for (id, calls) in callees.iter().enumerate() {
                if !dependent[id] && calls.iter().any(|&callee| dependent[callee]) {
                    dependent[id] = true;
                    changed = true;
                }
            }
        }

        dependent
            .into_iter()
            .enumerate()
            .map(|(id, dependent)| (!dependent).then_some(id))
            .collect()
    }

    /// Emitted code for the rules with the given ids
    pub fn render_rules(&self, ids: &[usize], runtime: &str) -> Code {
        let emitter = Emitter::new(self, runtime);
        let mut code = Code::new();
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                code = code.line("");
            }
            code = code.append(emitter.rule(&self.rules[*id]));
        }
        code
    }

    /// Emitted dispatch and accessor functions for the whole target
    pub fn render_epilogue(&self, runtime: &str) -> Code {
        Emitter::new(self, runtime).epilogue()
    }
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') && !trimmed.starts_with("#[") && !trimmed.starts_with("#![")
}

fn static_regexes<'t>(token: &'t Token, out: &mut Vec<&'t str>) {
    match &token.kind {
        TokenKind::Regex(template) if template.is_static() => out.push(template.raw()),
        TokenKind::Sequence(children) | TokenKind::Choice(children) => {
            for child in children {
                static_regexes(child, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> Result<RuleSet, CompileError> {
        let mut rs = RuleSet::new("Calc");
        let mut warnings = Vec::new();
        rs.parse_block("    ", text, false, &mut warnings)?;
        Ok(rs)
    }

    #[test]
    fn test_block_splitting() {
        let rs = block(
            "    Number: /[0-9]+/\n\n    # a comment\n    Sum: Number\n        ('+' Number)*\n        fn __finalise(res: &mut Node) {}\n",
        )
        .unwrap();
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.id_of("Sum"), Some(1));
        let sum = rs.get("Sum").unwrap();
        assert_eq!(sum.expression_line(), "Number ('+' Number)*");
        assert_eq!(sum.functions.len(), 1);
    }

    #[test]
    fn test_inconsistent_indent() {
        let err = block("    A: 'a'\n  B: 'b'").unwrap_err();
        assert_eq!(
            err,
            CompileError::InconsistentIndent {
                line: "  B: 'b'".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_rule() {
        let err = block("    A: 'a'\n    A: 'b'").unwrap_err();
        assert_eq!(
            err,
            CompileError::DuplicateRule {
                rule: "A".to_string()
            }
        );
    }

    #[test]
    fn test_typestack() {
        let rs = block("    A: 'a'\n    B extends A\n    C extends B; 'a' => 'c'").unwrap();
        let names: Vec<&str> = rs.typestack("C").iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
        assert!(rs.typestack("Missing").is_empty());
    }

    #[test]
    fn test_validate() {
        let rs = block("    A: B 'a'").unwrap();
        assert_eq!(
            rs.validate().unwrap_err(),
            CompileError::UnknownRule {
                rule: "A".to_string(),
                callee: "B".to_string()
            }
        );

        let rs = block("    A: /[a-/").unwrap();
        assert!(matches!(
            rs.validate(),
            Err(CompileError::InvalidRegex { .. })
        ));

        let rs = block("    A: B | 'a'\n    B: 'b'").unwrap();
        assert!(rs.validate().is_ok());
    }

    #[test]
    fn test_memo_keys_skip_value_readers() {
        let rs = block(
            "    T: '$k'\n    R1(k=b): 'a' T 'c'\n    R2(k=a): 'a' T\n    S: R1 | R2\n    Plain: 'p' Word\n    Word: /\\w+/\n    Dyn: $k",
        )
        .unwrap();
        assert_eq!(
            rs.memo_keys(),
            vec![None, None, None, None, Some(4), Some(5), None]
        );
    }

    #[test]
    fn test_left_recursion_warning() {
        let rs =
            block("    Expr: Term | Expr '+' Term\n    Term: Expr? 'x'\n    Ok: 'a' Ok").unwrap();
        let mut warnings = Vec::new();
        rs.analyze(&mut warnings);
        let rules: Vec<&str> = warnings.iter().map(|w| w.rule.as_str()).collect();
        assert_eq!(rules, vec!["Expr", "Term"]);
        assert!(warnings.iter().all(|w| w.kind == WarningKind::LeftRecursion));
    }
}
