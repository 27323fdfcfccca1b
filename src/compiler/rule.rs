//! Rule definitions
//!
//! A rule definition is a header line (plus indented continuation lines)
//! followed by optional attached functions:
//!
//! ```text
//! Name [extends Parent] [(arg=default, ...)] : expression
//! Name extends Parent [(arg=default, ...)] ; search => replacement, ...
//!     fn hook(res: &mut Node, sub: Node) { ... }
//! ```
//!
//! A replacement rule rewrites its parent's expression text and tokenizes the
//! result, so inheritance happens once, at compile time, on strings.

use super::error::{CompileError, CompileWarning};
use super::ruleset::RuleSet;
use super::token::Token;
use super::tokenizer::tokenize;
use crate::runtime::regex_cache;
use regex::Regex;
use serde::Serialize;

const RULE_RX: &str = r"(?x)
    ^(?P<name>[\w-]+)
    (?:\s+extends\s+(?P<extends>[\w-]+))?
    (?:\s*\((?P<arguments>[^)]*)\))?
    (?:\s*(?P<matchmark>:)|\s*(?P<replacemark>;)|\s*$)
    (?P<rule>[\s\S]*)";

const ARGUMENT_RX: &str = r"([^=]+)=([^=,]+)(,|$)";

const REPLACEMENT_RX: &str = r"(([^=]|=[^>])+)=>([^,]+)(,|$)";

const FUNCTION_RX: &str = r"^(\s+)fn\s+([^\s(<]+)\s*(.*)";

/// How a rule obtained its expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleMode {
    /// Expression written directly after `:`
    Primary,
    /// Parent expression rewritten by a `;` replacement list
    Replace,
}

/// A function attached to a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedFn {
    /// Sanitized name (`$x` becomes `DLRx`, `*` becomes `STR`)
    pub name: String,
    /// Everything after the name on the `fn` line
    pub signature: String,
    /// Following lines, with the `fn` line's indentation removed
    pub body: Vec<String>,
}

/// One parsed rule
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    /// Rule name as written
    pub name: String,
    /// Parent rule, for `extends`
    pub extends: Option<String>,
    /// Default arguments in declaration order
    pub arguments: Vec<(String, String)>,
    /// Primary or replacement
    pub mode: RuleMode,
    /// Expression text the token tree was built from
    pub expression: String,
    /// Tokenized expression
    pub root: Token,
    /// Attached functions
    pub functions: Vec<AttachedFn>,
    /// Emit rule-call tracing
    pub debug: bool,
}

fn compiled(pattern: &str, spec: &str) -> Result<Regex, CompileError> {
    regex_cache::get_or_compile(pattern).map_err(|_| CompileError::MalformedRule {
        spec: spec.to_string(),
    })
}

impl Rule {
    /// Parse one rule definition
    ///
    /// `lines` has the block indentation already removed. Parents are looked
    /// up in `ruleset`, so they must be declared earlier.
    pub fn parse(
        lines: &[String],
        ruleset: &RuleSet,
        debug: bool,
        warnings: &mut Vec<CompileWarning>,
    ) -> Result<Self, CompileError> {
        let spec = lines.join("\n");
        let function_rx = compiled(FUNCTION_RX, &spec)?;

        let fn_start = lines
            .iter()
            .skip(1)
            .position(|l| function_rx.is_match(l))
            .map(|i| i + 1)
            .unwrap_or(lines.len());
        let header = lines[..fn_start].join("\n");
        let functions = parse_functions(&function_rx, &lines[fn_start..]);

        let caps = compiled(RULE_RX, &spec)?
            .captures(&header)
            .ok_or_else(|| CompileError::MalformedRule { spec: spec.clone() })?;
        let name = caps["name"].to_string();
        let extends = caps.name("extends").map(|m| m.as_str().to_string());
        let body = caps.name("rule").map(|m| m.as_str()).unwrap_or("");

        let mut arguments = Vec::new();
        if let Some(args) = caps.name("arguments") {
            for arg in compiled(ARGUMENT_RX, &spec)?.captures_iter(args.as_str()) {
                arguments.push((arg[1].trim().to_string(), arg[2].trim().to_string()));
            }
        }

        let mode = if caps.name("matchmark").is_some() {
            RuleMode::Primary
        } else {
            RuleMode::Replace
        };

        let parent = match &extends {
            Some(parent) => Some(ruleset.get(parent).ok_or_else(|| {
                CompileError::UndefinedParent {
                    rule: name.clone(),
                    parent: parent.clone(),
                }
            })?),
            None => None,
        };

        let expression = match mode {
            RuleMode::Primary => body.trim().to_string(),
            RuleMode::Replace => {
                let parent = parent.ok_or_else(|| CompileError::ReplaceWithoutExtends {
                    rule: name.clone(),
                })?;
                let mut expression = parent.expression.clone();
                for pair in compiled(REPLACEMENT_RX, &spec)?.captures_iter(body) {
                    let search = pair[1].trim();
                    let mut replace = pair[3].trim();
                    if replace == "''" || replace == "\"\"" {
                        replace = "";
                    }
                    expression = expression.replace(search, &format!(" {} ", replace));
                }
                expression
            }
        };

        let root = tokenize(&name, &expression, warnings)?;

        // Arguments are inherited, overridden by the child's own
        let mut merged = parent.map(|p| p.arguments.clone()).unwrap_or_default();
        for (key, value) in arguments {
            match merged.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => merged.push((key, value)),
            }
        }

        Ok(Self {
            name,
            extends,
            arguments: merged,
            mode,
            expression,
            root,
            functions,
            debug,
        })
    }

    /// Name usable as part of a Rust identifier
    pub fn ident(&self) -> String {
        sanitize(&self.name)
    }

    /// Whether a function with the (sanitized) name is attached
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f.name == name)
    }

    /// Emitted identifier of an attached function
    pub fn function_ident(&self, name: &str) -> String {
        if name.starts_with('_') {
            format!("{}{}", self.ident(), name)
        } else {
            format!("{}_{}", self.ident(), name)
        }
    }

    /// Expression on one line, for comments
    pub fn expression_line(&self) -> String {
        self.expression.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Make a rule or hook name usable in a Rust identifier
pub fn sanitize(name: &str) -> String {
    name.replace('-', "_").replace('$', "DLR").replace('*', "STR")
}

fn parse_functions(function_rx: &Regex, lines: &[String]) -> Vec<AttachedFn> {
    let mut functions: Vec<AttachedFn> = Vec::new();
    let mut fn_indent = String::new();

    for line in lines {
        let header = function_rx.captures(line).filter(|caps| {
            functions.is_empty() || caps[1] == *fn_indent
        });
        match header {
            Some(caps) => {
                fn_indent = caps[1].to_string();
                functions.push(AttachedFn {
                    name: sanitize(&caps[2]),
                    signature: caps[3].to_string(),
                    body: Vec::new(),
                });
            }
            None => {
                if let Some(current) = functions.last_mut() {
                    let stripped = line
                        .strip_prefix(fn_indent.as_str())
                        .unwrap_or_else(|| line.trim_start());
                    current.body.push(stripped.to_string());
                }
            }
        }
    }
    functions
}
