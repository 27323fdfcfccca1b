//! Rust code emission
//!
//! Every token emits a fragment that ends in exactly one of two
//! continuations supplied by its parent: `on_match` or `on_fail`. An empty
//! continuation means "fall through to whatever follows the fragment".
//! Composite tokens build their children's continuations from their own,
//! using labeled blocks and loops for the jumps.
//!
//! Every fragment leaves the cursor and the partial result exactly as it
//! found them when it takes `on_fail`.
//!
//! Hooks (`__construct`, `__finalise`, store hooks, `STR`, `DLR` accessors)
//! are attached functions looked up along the rule's typestack while
//! emitting, so the generated code calls them directly.

use super::code::Code;
use super::rule::Rule;
use super::ruleset::RuleSet;
use super::token::{Callee, Segment, Template, Token, TokenKind, Wrapper};

/// Lints silenced on generated matcher functions
const MATCHER_ALLOWS: &str = "#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, \
unused_assignments, unreachable_code, clippy::all)]";

/// Where a fragment continues after matching or failing
#[derive(Debug, Clone, Default)]
pub struct Continuations {
    /// Code run after a match
    pub on_match: Code,
    /// Code run after a failure
    pub on_fail: Code,
}

impl Continuations {
    /// Build from both continuations
    pub fn new(on_match: Code, on_fail: Code) -> Self {
        Self { on_match, on_fail }
    }
}

/// How a rule call's store hook is chosen
enum StoreKey<'k> {
    /// Known while emitting
    Static(&'k str),
    /// The callee's name, known only at match time
    Dynamic,
}

/// Emits the Rust code of one target
pub struct Emitter<'a> {
    ruleset: &'a RuleSet,
    runtime: &'a str,
    memo_keys: Vec<Option<usize>>,
}

impl<'a> Emitter<'a> {
    /// Emitter for `ruleset`, reaching the runtime through `runtime` (for
    /// example `::pegc::runtime`)
    pub fn new(ruleset: &'a RuleSet, runtime: &'a str) -> Self {
        Self {
            ruleset,
            runtime,
            memo_keys: ruleset.memo_keys(),
        }
    }

    /// Matcher function for `rule`, followed by its attached functions
    pub fn rule(&self, rule: &Rule) -> Code {
        let mut emitter = RuleEmitter {
            ruleset: self.ruleset,
            runtime: self.runtime,
            memo_keys: &self.memo_keys,
            target: self.ruleset.target_ident(),
            rule,
            typestack: self.ruleset.typestack(&rule.name),
            next_label: 0,
        };
        let mut code = emitter.matcher();
        for function in &rule.functions {
            let header = format!(
                "#[allow(non_snake_case, dead_code)]\nfn {}{}",
                rule.function_ident(&function.name),
                function.signature
            );
            code = code.line("").line(header).lines(function.body.iter().cloned());
        }
        code
    }

    /// Name-based dispatch and accessor lookup for the whole target
    pub fn epilogue(&self) -> Code {
        let rt = self.runtime;
        let target = self.ruleset.target_ident();

        let mut arms = Code::new();
        for (rule, key) in self.ruleset.rules().iter().zip(&self.memo_keys) {
            arms = arms.line(format!(
                "{:?} => Some(({:?}, match_{}::<M> as {}::Matcher<'i, M>)),",
                rule.name,
                key,
                rule.ident(),
                rt
            ));
        }
        arms = arms.line("_ => None,");
        let dispatch = Code::new().block("match name", arms, "");

        let mut arms = Code::new();
        for rule in self.ruleset.rules() {
            let typestack = self.ruleset.typestack(&rule.name);
            let mut seen: Vec<&str> = Vec::new();
            for owner in &typestack {
                for function in &owner.functions {
                    let Some(accessor) = function.name.strip_prefix("DLR") else {
                        continue;
                    };
                    if seen.contains(&accessor) {
                        continue;
                    }
                    seen.push(accessor);
                    arms = arms.line(format!(
                        "({:?}, {:?}) => {}(node),",
                        rule.name,
                        accessor,
                        owner.function_ident(&function.name)
                    ));
                }
            }
        }
        arms = arms.line("_ => None,");
        let accessor = Code::new().block("match (node.matchrule.as_str(), name)", arms, "");

        Code::new()
            .line(format!("// {}: rule dispatch", target))
            .line("#[allow(non_snake_case, dead_code, clippy::all)]")
            .block(
                format!(
                    "pub fn {target}_dispatch<'i, M: {rt}::Memo>(name: &str) \
                     -> Option<(Option<usize>, {rt}::Matcher<'i, M>)>"
                ),
                dispatch,
                "",
            )
            .line("")
            .line(format!("// {}: semantic value accessors", target))
            .line("#[allow(non_snake_case, dead_code, unused_variables, clippy::all)]")
            .block(
                format!(
                    "pub fn {}_accessor(node: &{rt}::Node, name: &str) -> Option<String>",
                    target
                ),
                accessor,
                "",
            )
    }
}

struct RuleEmitter<'a> {
    ruleset: &'a RuleSet,
    runtime: &'a str,
    memo_keys: &'a [Option<usize>],
    target: String,
    rule: &'a Rule,
    typestack: Vec<&'a Rule>,
    next_label: usize,
}

impl<'a> RuleEmitter<'a> {
    fn fresh(&mut self) -> usize {
        let n = self.next_label;
        self.next_label += 1;
        n
    }

    /// First attached function called `name` along the typestack
    fn hook(&self, name: &str) -> Option<String> {
        self.typestack
            .iter()
            .find(|r| r.has_function(name))
            .map(|r| r.function_ident(name))
    }

    /// Store hook for `key`: per type, a specific hook beats `STR`, and the
    /// most specific type wins
    fn store_hook(&self, key: &str) -> Option<String> {
        let key = super::rule::sanitize(key);
        for owner in &self.typestack {
            if owner.has_function(&key) {
                return Some(owner.function_ident(&key));
            }
            if owner.has_function("STR") {
                return Some(owner.function_ident("STR"));
            }
        }
        None
    }

    fn matcher(&mut self) -> Code {
        let rt = self.runtime;
        let rule = self.rule;
        let args: Vec<String> = rule
            .arguments
            .iter()
            .map(|(k, v)| format!("({:?}, {:?})", k, v))
            .collect();

        let mut on_match = Code::new();
        if let Some(hook) = self.hook("__finalise") {
            on_match = on_match.line(format!("{}(&mut result);", hook));
        }
        on_match = on_match.line("return Some(result);");
        let k = Continuations::new(on_match, Code::of("return None;"));

        let mut body = Code::new()
            .line(format!("let matchrule = {:?};", rule.name))
            .line(format!(
                "let mut result = p.construct(matchrule, matchrule, &[{}]);",
                args.join(", ")
            ));
        if let Some(hook) = self.hook("__construct") {
            body = body.line(format!("{}(&mut result);", hook));
        }
        body = body.append(self.token(&rule.root, k)).line("None");

        Code::new()
            .line(format!("// {}: {}", rule.name, rule.expression_line()))
            .line(MATCHER_ALLOWS)
            .block(
                format!(
                    "pub fn match_{}<M: {rt}::Memo>(p: &mut {rt}::Parser<'_, M>) \
                     -> Option<{rt}::Node>",
                    rule.ident()
                ),
                body,
                "",
            )
    }

    fn token(&mut self, token: &Token, k: Continuations) -> Code {
        let wrappers = token.wrappers();
        self.layer(token, &wrappers, k)
    }

    fn layer(&mut self, token: &Token, wrappers: &[Wrapper], k: Continuations) -> Code {
        let Some((outer, inner)) = wrappers.split_last() else {
            return self.base(token, k);
        };
        match outer {
            Wrapper::Optional => self
                .layer(token, inner, Continuations::default())
                .append(k.on_match),
            Wrapper::ZeroOrMore | Wrapper::OneOrMore => {
                let n = self.fresh();
                let counted = matches!(outer, Wrapper::OneOrMore);
                let mut step = Code::new();
                if counted {
                    step = step.line(format!("count_{} += 1;", n));
                }
                step = step.branch(
                    format!("p.pos() == pos_{}", n),
                    Code::of(format!("break 'rep_{};", n)),
                    Code::new(),
                );
                let body = Code::of(format!("let pos_{} = p.pos();", n)).append(self.layer(
                    token,
                    inner,
                    Continuations::new(step, Code::of(format!("break 'rep_{};", n))),
                ));
                let mut code = Code::new();
                if counted {
                    code = code.line(format!("let mut count_{} = 0usize;", n));
                }
                code = code.block(format!("'rep_{}: loop", n), body, "");
                if counted {
                    code.branch(format!("count_{} > 0", n), k.on_match, k.on_fail)
                } else {
                    code.append(k.on_match)
                }
            }
            Wrapper::PositiveLookahead | Wrapper::NegativeLookahead => {
                let n = self.fresh();
                let fail = Code::of(format!("break 'look_{} false;", n));
                let probe = self
                    .layer(token, inner, Continuations::new(Code::new(), fail))
                    .line("true");
                let code = save(n)
                    .block(format!("let ok_{} = 'look_{}:", n, n), probe, ";")
                    .line(format!("p.seek(pos_{});", n))
                    .line(format!("result = res_{};", n));
                if matches!(outer, Wrapper::PositiveLookahead) {
                    code.branch(format!("ok_{}", n), k.on_match, k.on_fail)
                } else {
                    code.branch(format!("ok_{}", n), k.on_fail, k.on_match)
                }
            }
            Wrapper::Tag(tag) => {
                let n = self.fresh();
                let mut code = Code::new()
                    .line("p.push_frame(result);")
                    .line(format!("result = p.construct(matchrule, {:?}, &[]);", tag));
                if let Some(hook) = self.hook("__construct") {
                    code = code.line(format!("{}(&mut result);", hook));
                }
                let fail = Code::of(format!("break 'tag_{} false;", n));
                let probe = self
                    .layer(token, inner, Continuations::new(Code::new(), fail))
                    .line("true");
                let stored = Code::new()
                    .line("let subres = result;")
                    .line("result = p.pop_frame();")
                    .append(self.store(Some(tag), StoreKey::Static(tag)))
                    .append(k.on_match);
                let dropped = Code::of("result = p.pop_frame();").append(k.on_fail);
                code.block(format!("let ok_{} = 'tag_{}:", n, n), probe, ";")
                    .branch(format!("ok_{}", n), stored, dropped)
            }
        }
    }

    fn base(&mut self, token: &Token, k: Continuations) -> Code {
        let silent = token.modifiers.silent;
        match &token.kind {
            TokenKind::Literal(template) => self.primitive("literal", template, silent, k),
            TokenKind::Regex(template) => self.primitive("rx", template, silent, k),
            TokenKind::Whitespace { optional } => {
                terminal(format!("p.whitespace({})", optional), Code::new(), silent, k)
            }
            TokenKind::Recurse(callee) => self.call(token, callee, k),
            TokenKind::Sequence(_) | TokenKind::Choice(_) if silent => {
                let n = self.fresh();
                let on_match = Code::new()
                    .line(format!("result.text.truncate(text_{});", n))
                    .line(format!("result.fields = fields_{};", n))
                    .append(k.on_match);
                Code::new()
                    .line(format!("let text_{} = result.text.len();", n))
                    .line(format!("let fields_{} = result.fields.clone();", n))
                    .append(self.composite(token, Continuations::new(on_match, k.on_fail)))
            }
            TokenKind::Sequence(_) | TokenKind::Choice(_) => self.composite(token, k),
        }
    }

    fn composite(&mut self, token: &Token, k: Continuations) -> Code {
        match &token.kind {
            TokenKind::Sequence(children) if children.is_empty() => k.on_match,
            TokenKind::Sequence(children) if children.len() == 1 => self.token(&children[0], k),
            TokenKind::Sequence(children) => {
                let n = self.fresh();
                let mut probe = Code::new();
                for child in children {
                    let fail = Code::of(format!("break 'seq_{} false;", n));
                    probe = probe.append(self.token(child, Continuations::new(Code::new(), fail)));
                }
                let restore = Code::new()
                    .line(format!("p.seek(pos_{});", n))
                    .line(format!("result = res_{};", n))
                    .append(k.on_fail);
                save(n)
                    .block(format!("let ok_{} = 'seq_{}:", n, n), probe.line("true"), ";")
                    .branch(format!("ok_{}", n), k.on_match, restore)
            }
            TokenKind::Choice(alternatives) => {
                let n = self.fresh();
                let mut probe = Code::new();
                for alternative in alternatives {
                    let matched = Code::of(format!("break 'alt_{} true;", n));
                    let k = Continuations::new(matched, Code::new());
                    probe = probe.append(self.token(alternative, k));
                }
                Code::new()
                    .block(format!("let ok_{} = 'alt_{}:", n, n), probe.line("false"), ";")
                    .branch(format!("ok_{}", n), k.on_match, k.on_fail)
            }
            _ => self.base(token, k),
        }
    }

    /// Literal or regex, interpolating `$name` segments at match time
    fn primitive(
        &mut self,
        method: &str,
        template: &Template,
        silent: bool,
        k: Continuations,
    ) -> Code {
        if template.is_static() {
            return terminal(
                format!("p.{}({:?})", method, template.raw()),
                Code::new(),
                silent,
                k,
            );
        }
        let n = self.fresh();
        let parts: Vec<String> = template
            .segments()
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => format!("String::from({:?})", text),
                Segment::Var(name) => self.expression(name),
            })
            .collect();
        let setup = Code::of(format!("let lit_{} = [{}].concat();", n, parts.join(", ")));
        terminal(format!("p.{}(&lit_{})", method, n), setup, silent, k)
    }

    fn expression(&self, name: &str) -> String {
        format!("p.expression(&result, {:?}, {}_accessor)", name, self.target)
    }

    fn call(&mut self, token: &Token, callee: &Callee, k: Continuations) -> Code {
        let mut code = Code::new();
        let (trace_name, invoke) = match callee {
            Callee::Named(name) => {
                let matcher = format!("match_{}::<M>", super::rule::sanitize(name));
                let key = self.ruleset.id_of(name).and_then(|id| self.memo_keys[id]);
                let invoke = match key {
                    Some(id) => format!("let subres = p.call({}, {});", id, matcher),
                    None => format!("let subres = p.call_unmemoized({});", matcher),
                };
                (format!("{:?}", name), Code::of(invoke))
            }
            Callee::Expression(name) => {
                let n = self.fresh();
                code = code.line(format!("let callee_{} = {};", n, self.expression(name)));
                let arms = Code::new()
                    .line("Some((key, matcher)) => p.call_with(key, matcher),")
                    .line("None => None,");
                let invoke = Code::new().block(
                    format!("let subres = match {}_dispatch::<M>(&callee_{})", self.target, n),
                    arms,
                    ";",
                );
                (format!("&callee_{}", n), invoke)
            }
        };

        code = code.line("p.push_frame(result);");
        if self.rule.debug {
            code = code.line(format!("p.trace_enter({});", trace_name));
        }
        code = code.append(invoke);
        if self.rule.debug {
            code = code.line(format!("p.trace_exit({}, subres.is_some());", trace_name));
        }
        code = code.line("result = p.pop_frame();");

        if token.modifiers.silent {
            return code.branch("subres.is_some()", k.on_match, k.on_fail);
        }

        let tag = token.store_tag();
        let store = match (&tag, callee) {
            (Some(tag), _) => self.store(Some(tag), StoreKey::Static(tag)),
            (None, Callee::Named(name)) => self.store(None, StoreKey::Static(name)),
            (None, Callee::Expression(_)) => self.store(None, StoreKey::Dynamic),
        };
        code.branch("let Some(subres) = subres", store.append(k.on_match), k.on_fail)
    }

    /// Store `subres` into `result`
    fn store(&self, tag: Option<&str>, key: StoreKey<'_>) -> Code {
        let default = format!("p.store(&mut result, subres, {});", tag_arg(tag));
        match key {
            StoreKey::Static(key) => match self.store_hook(key) {
                Some(hook) => Code::new()
                    .line("result.text.push_str(&subres.text);")
                    .line(format!("{}(&mut result, subres);", hook)),
                None => Code::of(default),
            },
            StoreKey::Dynamic => {
                let mut arms = Code::new();
                let mut seen: Vec<String> = Vec::new();
                for owner in &self.typestack {
                    for function in &owner.functions {
                        let name = &function.name;
                        if is_reserved_hook(name) || seen.contains(name) {
                            continue;
                        }
                        seen.push(name.clone());
                        if let Some(hook) = self.store_hook(name) {
                            arms = arms.line(format!("{:?} => {{ {} }}", name, hooked(&hook)));
                        }
                    }
                }
                let fallback = match self.hook("STR") {
                    Some(hook) => format!("_ => {{ {} }}", hooked(&hook)),
                    None => format!("_ => {}", default),
                };
                if arms.is_empty() {
                    return match self.hook("STR") {
                        Some(hook) => Code::new()
                            .line("result.text.push_str(&subres.text);")
                            .line(format!("{}(&mut result, subres);", hook)),
                        None => Code::of(default),
                    };
                }
                Code::new().block("match subres.name.as_str()", arms.line(fallback), "")
            }
        }
    }
}

/// `let pos_n` / `let res_n` snapshot of cursor and partial result
fn save(n: usize) -> Code {
    Code::new()
        .line(format!("let pos_{} = p.pos();", n))
        .line(format!("let res_{} = result.clone();", n))
}

/// A primitive returning `Option<&str>`: append the text unless silent
fn terminal(call: String, setup: Code, silent: bool, k: Continuations) -> Code {
    if silent {
        return setup.branch(format!("{}.is_some()", call), k.on_match, k.on_fail);
    }
    let matched = Code::of("result.text.push_str(m);").append(k.on_match);
    setup.branch(format!("let Some(m) = {}", call), matched, k.on_fail)
}

/// Store through a hook: the text is appended first, the hook sees the rest
fn hooked(hook: &str) -> String {
    format!("result.text.push_str(&subres.text); {}(&mut result, subres);", hook)
}

fn tag_arg(tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("Some({:?})", tag),
        None => "None".to_string(),
    }
}

fn is_reserved_hook(name: &str) -> bool {
    name == "__construct" || name == "__finalise" || name == "STR" || name.starts_with("DLR")
}
