//! Token model for rule expressions
//!
//! A rule expression tokenizes into a tree of [`Token`]s. Each token is a base
//! match ([`TokenKind`]) plus [`Modifiers`]. Modifiers are never merged into the
//! base match: they become [`Wrapper`]s nested around it in one fixed order,
//! see [`Token::wrappers`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Part of a literal or regex body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// Verbatim text
    Text(String),
    /// `$name` or `{$name}`, resolved through `expression` at match time
    Var(String),
}

/// Literal or regex body with optional `$name` interpolation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Split a body into text and variable segments
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = raw;

        while let Some(idx) = rest.find('$') {
            let braced = idx > 0 && rest[..idx].ends_with('{');
            let after = &rest[idx + 1..];
            let name_len = after
                .char_indices()
                .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
                .map(|(i, _)| i)
                .unwrap_or(after.len());

            if name_len == 0 {
                text.push_str(&rest[..=idx]);
                rest = after;
                continue;
            }

            let name = &after[..name_len];
            if braced && after[name_len..].starts_with('}') {
                text.push_str(&rest[..idx - 1]);
                rest = &after[name_len + 1..];
            } else {
                text.push_str(&rest[..idx]);
                rest = &after[name_len..];
            }
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Var(name.to_string()));
        }
        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The body as written
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the body has no interpolation
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Text(_)))
    }
}

/// Target of a rule-call token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Callee {
    /// A rule named directly
    Named(String),
    /// `$name`: the rule name is the semantic value `name`
    Expression(String),
}

/// Base match of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Quoted literal
    Literal(Template),
    /// `/regex/`
    Regex(Template),
    /// Rule call
    Recurse(Callee),
    /// Tokens matched in order
    Sequence(Vec<Token>),
    /// Ordered choice between alternatives
    Choice(Vec<Token>),
    /// `<` `>` (optional) or `[` `]` (mandatory) whitespace
    Whitespace {
        /// Whether an absent separator still matches
        optional: bool,
    },
}

/// Modifier flags attached to a token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// `?`
    pub optional: bool,
    /// `*`
    pub zero_or_more: bool,
    /// `+`
    pub one_or_more: bool,
    /// `&`
    pub positive_lookahead: bool,
    /// `!`
    pub negative_lookahead: bool,
    /// `.`: match without contributing text or captures
    pub silent: bool,
    /// `name:` capture; empty for the `:Rule` shorthand
    pub tag: Option<String>,
}

/// A layer wrapped around a token's base match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrapper {
    /// Capture into a fresh record stored under the tag
    Tag(String),
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `&`
    PositiveLookahead,
    /// `!`
    NegativeLookahead,
}

/// One node of a tokenized expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Base match
    pub kind: TokenKind,
    /// Modifier flags
    pub modifiers: Modifiers,
}

impl Token {
    /// Token without modifiers
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            modifiers: Modifiers::default(),
        }
    }

    /// Whether this is a rule call
    pub fn is_rule_call(&self) -> bool {
        matches!(self.kind, TokenKind::Recurse(_))
    }

    /// Wrappers around the base match, innermost first
    ///
    /// The order is tag, `?`, `*`, `+`, `&`, `!`. A rule call carries its tag
    /// into its own store instead of a tag wrapper, and an empty tag on any
    /// other token is ignored.
    pub fn wrappers(&self) -> Vec<Wrapper> {
        let m = &self.modifiers;
        let mut layers = Vec::new();
        if let Some(tag) = &m.tag {
            if !tag.is_empty() && !self.is_rule_call() {
                layers.push(Wrapper::Tag(tag.clone()));
            }
        }
        if m.optional {
            layers.push(Wrapper::Optional);
        }
        if m.zero_or_more {
            layers.push(Wrapper::ZeroOrMore);
        }
        if m.one_or_more {
            layers.push(Wrapper::OneOrMore);
        }
        if m.positive_lookahead {
            layers.push(Wrapper::PositiveLookahead);
        }
        if m.negative_lookahead {
            layers.push(Wrapper::NegativeLookahead);
        }
        layers
    }

    /// Key a rule call stores its result under: the tag, or the callee's
    /// name for the `:Rule` shorthand
    pub fn store_tag(&self) -> Option<String> {
        let TokenKind::Recurse(callee) = &self.kind else {
            return None;
        };
        match self.modifiers.tag.as_deref() {
            None => None,
            Some("") => Some(match callee {
                Callee::Named(name) | Callee::Expression(name) => name.clone(),
            }),
            Some(tag) => Some(tag.to_string()),
        }
    }

    /// Whether matching this token looks up semantic values: an
    /// interpolated literal or regex, or a `$name` call
    pub fn reads_values(&self) -> bool {
        match &self.kind {
            TokenKind::Literal(template) | TokenKind::Regex(template) => !template.is_static(),
            TokenKind::Recurse(Callee::Expression(_)) => true,
            TokenKind::Recurse(Callee::Named(_)) | TokenKind::Whitespace { .. } => false,
            TokenKind::Sequence(children) | TokenKind::Choice(children) => {
                children.iter().any(Token::reads_values)
            }
        }
    }

    /// Every rule named directly anywhere in this token
    pub fn named_calls(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_calls(&mut out);
        out
    }

    fn collect_calls<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            TokenKind::Recurse(Callee::Named(name)) => out.push(name),
            TokenKind::Sequence(children) | TokenKind::Choice(children) => {
                for child in children {
                    child.collect_calls(out);
                }
            }
            _ => {}
        }
    }

    /// Rules this token may call before consuming any input
    ///
    /// Conservative: a sequence contributes the calls of its leading
    /// children up to the first one that must consume input.
    pub fn leading_calls(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leading(&mut out);
        out
    }

    /// Returns whether the token can match without consuming input
    fn collect_leading<'a>(&'a self, out: &mut Vec<&'a str>) -> bool {
        let m = &self.modifiers;
        let zero_width_ok =
            m.optional || m.zero_or_more || m.positive_lookahead || m.negative_lookahead;
        let nullable = match &self.kind {
            TokenKind::Recurse(Callee::Named(name)) => {
                out.push(name);
                false
            }
            TokenKind::Recurse(Callee::Expression(_)) => false,
            TokenKind::Literal(t) => t.raw().is_empty(),
            TokenKind::Regex(_) => false,
            TokenKind::Whitespace { .. } => true,
            TokenKind::Sequence(children) => {
                let mut all = true;
                for child in children {
                    if !child.collect_leading(out) {
                        all = false;
                        break;
                    }
                }
                all
            }
            TokenKind::Choice(children) => {
                let mut any = false;
                for child in children {
                    any |= child.collect_leading(out);
                }
                any
            }
        };
        nullable || zero_width_ok
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        if let Some(tag) = &m.tag {
            write!(f, "{}:", tag)?;
        }
        if m.silent {
            write!(f, ".")?;
        }
        if m.positive_lookahead {
            write!(f, "&")?;
        }
        if m.negative_lookahead {
            write!(f, "!")?;
        }
        match &self.kind {
            TokenKind::Literal(t) => {
                if t.raw().contains('\'') {
                    write!(f, "\"{}\"", t.raw())?
                } else {
                    write!(f, "'{}'", t.raw())?
                }
            }
            TokenKind::Regex(t) => write!(f, "/{}/", t.raw().replace('/', "\\/"))?,
            TokenKind::Recurse(Callee::Named(name)) => write!(f, "{}", name)?,
            TokenKind::Recurse(Callee::Expression(name)) => write!(f, "${}", name)?,
            TokenKind::Sequence(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")?;
            }
            TokenKind::Choice(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")?;
            }
            TokenKind::Whitespace { optional: true } => write!(f, "<")?,
            TokenKind::Whitespace { optional: false } => write!(f, "[")?,
        }
        if m.optional {
            write!(f, "?")?;
        }
        if m.zero_or_more {
            write!(f, "*")?;
        }
        if m.one_or_more {
            write!(f, "+")?;
        }
        Ok(())
    }
}
