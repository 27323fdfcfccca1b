//! Token-tree interpreter
//!
//! Executes a rule's token tree directly against a [`Parser`], with the
//! same observable behaviour as the code the compiler emits for it: the
//! same wrapper order, frame handling, store keys and hook resolution. A
//! failing fragment leaves the cursor and the partial result as it found
//! them.

use super::grammar::Grammar;
use super::hooks::RuleHooks;
use super::memo::Memo;
use super::node::Node;
use super::parser::Parser;
use crate::compiler::rule::Rule;
use crate::compiler::token::{Callee, Segment, Template, Token, TokenKind, Wrapper};
use std::borrow::Cow;

/// Interpreter for the body of one rule
pub(crate) struct RuleInterpreter<'g> {
    grammar: &'g Grammar,
    rule: &'g Rule,
    hooks: &'g RuleHooks,
}

impl<'g> RuleInterpreter<'g> {
    pub(crate) fn new(grammar: &'g Grammar, rule: &'g Rule, hooks: &'g RuleHooks) -> Self {
        Self {
            grammar,
            rule,
            hooks,
        }
    }

    /// Match the rule at the cursor
    pub(crate) fn run<M: Memo>(&self, p: &mut Parser<'_, M>) -> Option<Node> {
        let args: Vec<(&str, &str)> = self
            .rule
            .arguments
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let mut result = p.construct(&self.rule.name, &self.rule.name, &args);
        if let Some(hook) = &self.hooks.construct {
            hook(&mut result);
        }
        if !self.token(p, &mut result, &self.rule.root) {
            return None;
        }
        if let Some(hook) = &self.hooks.finalise {
            hook(&mut result);
        }
        Some(result)
    }

    fn token<M: Memo>(&self, p: &mut Parser<'_, M>, result: &mut Node, token: &Token) -> bool {
        let wrappers = token.wrappers();
        self.layer(p, result, token, &wrappers)
    }

    fn layer<M: Memo>(
        &self,
        p: &mut Parser<'_, M>,
        result: &mut Node,
        token: &Token,
        wrappers: &[Wrapper],
    ) -> bool {
        let Some((outer, inner)) = wrappers.split_last() else {
            return self.base(p, result, token);
        };
        match outer {
            Wrapper::Optional => {
                self.layer(p, result, token, inner);
                true
            }
            Wrapper::ZeroOrMore | Wrapper::OneOrMore => {
                let mut count = 0usize;
                loop {
                    let pos = p.pos();
                    if !self.layer(p, result, token, inner) {
                        break;
                    }
                    count += 1;
                    if p.pos() == pos {
                        break;
                    }
                }
                matches!(outer, Wrapper::ZeroOrMore) || count > 0
            }
            Wrapper::PositiveLookahead | Wrapper::NegativeLookahead => {
                let pos = p.pos();
                let saved = result.clone();
                let ok = self.layer(p, result, token, inner);
                p.seek(pos);
                *result = saved;
                ok == matches!(outer, Wrapper::PositiveLookahead)
            }
            Wrapper::Tag(tag) => {
                let record = p.construct(&self.rule.name, tag, &[]);
                p.push_frame(std::mem::replace(result, record));
                if let Some(hook) = &self.hooks.construct {
                    hook(result);
                }
                let ok = self.layer(p, result, token, inner);
                let sub = std::mem::replace(result, p.pop_frame());
                if ok {
                    self.store(p, result, sub, Some(tag), tag);
                }
                ok
            }
        }
    }

    fn base<M: Memo>(&self, p: &mut Parser<'_, M>, result: &mut Node, token: &Token) -> bool {
        let silent = token.modifiers.silent;
        match &token.kind {
            TokenKind::Literal(template) => {
                let text = self.resolve(p, result, template);
                append(result, p.literal(&text), silent)
            }
            TokenKind::Regex(template) => {
                let pattern = self.resolve(p, result, template);
                append(result, p.rx(&pattern), silent)
            }
            TokenKind::Whitespace { optional } => append(result, p.whitespace(*optional), silent),
            TokenKind::Recurse(callee) => self.call(p, result, token, callee),
            TokenKind::Sequence(_) | TokenKind::Choice(_) if silent => {
                let len = result.text.len();
                let fields = result.fields.clone();
                let ok = self.composite(p, result, token);
                if ok {
                    result.text.truncate(len);
                    result.fields = fields;
                }
                ok
            }
            TokenKind::Sequence(_) | TokenKind::Choice(_) => self.composite(p, result, token),
        }
    }

    fn composite<M: Memo>(&self, p: &mut Parser<'_, M>, result: &mut Node, token: &Token) -> bool {
        match &token.kind {
            TokenKind::Sequence(children) if children.len() <= 1 => children
                .first()
                .map_or(true, |child| self.token(p, result, child)),
            TokenKind::Sequence(children) => {
                let pos = p.pos();
                let saved = result.clone();
                for child in children {
                    if !self.token(p, result, child) {
                        p.seek(pos);
                        *result = saved;
                        return false;
                    }
                }
                true
            }
            TokenKind::Choice(alternatives) => {
                alternatives.iter().any(|alt| self.token(p, result, alt))
            }
            _ => self.base(p, result, token),
        }
    }

    fn call<M: Memo>(
        &self,
        p: &mut Parser<'_, M>,
        result: &mut Node,
        token: &Token,
        callee: &Callee,
    ) -> bool {
        let name = match callee {
            Callee::Named(name) => Cow::Borrowed(name.as_str()),
            Callee::Expression(expr) => Cow::Owned(self.expression(p, result, expr)),
        };

        p.push_frame(std::mem::take(result));
        if self.rule.debug {
            p.trace_enter(&name);
        }
        let subres = self.grammar.call(p, &name);
        if self.rule.debug {
            p.trace_exit(&name, subres.is_some());
        }
        *result = p.pop_frame();

        let Some(sub) = subres else {
            return false;
        };
        if token.modifiers.silent {
            return true;
        }
        let tag = token.store_tag();
        let key = tag.clone().unwrap_or_else(|| sub.name.clone());
        self.store(p, result, sub, tag.as_deref(), &key);
        true
    }

    fn store<M: Memo>(
        &self,
        p: &mut Parser<'_, M>,
        result: &mut Node,
        sub: Node,
        tag: Option<&str>,
        key: &str,
    ) {
        match self.hooks.store_for(key) {
            Some(hook) => {
                result.text.push_str(&sub.text);
                hook(result, sub);
            }
            None => p.store(result, sub, tag),
        }
    }

    fn expression<M: Memo>(&self, p: &Parser<'_, M>, result: &Node, name: &str) -> String {
        p.expression(result, name, |node, name| self.grammar.accessor(node, name))
    }

    fn resolve<'t, M: Memo>(
        &self,
        p: &Parser<'_, M>,
        result: &Node,
        template: &'t Template,
    ) -> Cow<'t, str> {
        if template.is_static() {
            return Cow::Borrowed(template.raw());
        }
        let mut out = String::new();
        for segment in template.segments() {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Var(name) => out.push_str(&self.expression(p, result, name)),
            }
        }
        Cow::Owned(out)
    }
}

/// Append a primitive's match to the result unless silent
fn append(result: &mut Node, matched: Option<&str>, silent: bool) -> bool {
    match matched {
        Some(text) => {
            if !silent {
                result.text.push_str(text);
            }
            true
        }
        None => false,
    }
}
