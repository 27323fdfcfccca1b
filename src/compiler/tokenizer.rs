//! Rule expression tokenizer
//!
//! A single left-to-right scan. Prefix modifiers (`tag:`, `&`, `!`, `.`) are
//! parked in a [`Pending`] cell and applied to the next token produced;
//! postfix quantifiers (`?`, `*`, `+`) modify the previous token. `(`
//! recurses until the matching `)`, and `|` turns everything scanned so far
//! into the left alternative and the rest of the current group into the
//! right one. A modifier with no token to attach to (a leading quantifier, or
//! a prefix before `|`, `)` or the end) is a [`CompileError::DanglingModifier`].

use super::error::{CompileError, CompileWarning, WarningKind};
use super::token::{Callee, Template, Token, TokenKind};

/// Prefix modifiers waiting for the next token
#[derive(Debug, Default)]
struct Pending {
    tag: Option<String>,
    positive_lookahead: bool,
    negative_lookahead: bool,
    silent: bool,
}

impl Pending {
    /// The parked modifier, if any, as written
    fn modifier(&self) -> Option<char> {
        if self.negative_lookahead {
            Some('!')
        } else if self.positive_lookahead {
            Some('&')
        } else if self.silent {
            Some('.')
        } else {
            self.tag.as_ref().map(|_| ':')
        }
    }

    fn apply_if_present(&mut self, token: &mut Token) {
        let pending = std::mem::take(self);
        let m = &mut token.modifiers;
        if pending.tag.is_some() {
            m.tag = pending.tag;
        }
        m.positive_lookahead |= pending.positive_lookahead;
        m.negative_lookahead |= pending.negative_lookahead;
        m.silent |= pending.silent;
    }
}

/// Tokenize the expression of `rule`
///
/// Unrecognised control characters are skipped and reported in `warnings`.
pub fn tokenize(
    rule: &str,
    expr: &str,
    warnings: &mut Vec<CompileWarning>,
) -> Result<Token, CompileError> {
    let mut tokenizer = Tokenizer {
        rule,
        src: expr,
        pos: 0,
        warnings,
    };
    let mut tokens = Vec::new();
    tokenizer.scan(&mut tokens)?;
    if tokenizer.pos < expr.len() {
        tokenizer.warn(format!(
            "unbalanced ')' at offset {}, ignoring {:?}",
            tokenizer.pos - 1,
            &expr[tokenizer.pos..]
        ));
    }
    Ok(unwrap_single(tokens))
}

fn unwrap_single(mut tokens: Vec<Token>) -> Token {
    if tokens.len() == 1 {
        if let Some(token) = tokens.pop() {
            return token;
        }
    }
    Token::new(TokenKind::Sequence(tokens))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct Tokenizer<'a> {
    rule: &'a str,
    src: &'a str,
    pos: usize,
    warnings: &'a mut Vec<CompileWarning>,
}

impl Tokenizer<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn warn(&mut self, message: String) {
        log_warn!("rule {}: {}", self.rule, message);
        self.warnings.push(CompileWarning::new(
            WarningKind::UnrecognizedControl,
            self.rule,
            message,
        ));
    }

    /// Byte length of the leading run of chars matching `pred`
    fn run_len(&self, pred: impl Fn(char) -> bool) -> usize {
        self.rest()
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len())
    }

    fn dangling(&self, modifier: char) -> CompileError {
        CompileError::DanglingModifier {
            rule: self.rule.to_string(),
            modifier,
        }
    }

    /// Fails if a prefix modifier is still waiting for a token
    fn settle(&self, pending: &Pending) -> Result<(), CompileError> {
        match pending.modifier() {
            Some(modifier) => Err(self.dangling(modifier)),
            None => Ok(()),
        }
    }

    /// Scan tokens into `tokens`, stopping after a `)` or at end of input
    fn scan(&mut self, tokens: &mut Vec<Token>) -> Result<(), CompileError> {
        let mut pending = Pending::default();

        while self.pos < self.src.len() {
            let ws = self.run_len(char::is_whitespace);
            if ws > 0 {
                self.pos += ws;
                continue;
            }

            // name: (or bare ':') tag prefix
            let word = self.run_len(is_word_char);
            if self.rest()[word..].starts_with(':') {
                pending.tag = Some(self.rest()[..word].to_string());
                self.pos += word + 1;
                continue;
            }

            let ident = self.run_len(|c| is_word_char(c) || c == '-');
            if ident > 0 {
                let name = self.rest()[..ident].to_string();
                self.pos += ident;
                let mut token = Token::new(TokenKind::Recurse(Callee::Named(name)));
                pending.apply_if_present(&mut token);
                tokens.push(token);
                continue;
            }

            if let Some(body) = self.quoted() {
                let mut token = Token::new(TokenKind::Literal(Template::parse(&body)));
                pending.apply_if_present(&mut token);
                tokens.push(token);
                continue;
            }

            if let Some(body) = self.regex() {
                let mut token = Token::new(TokenKind::Regex(Template::parse(&body)));
                pending.apply_if_present(&mut token);
                tokens.push(token);
                continue;
            }

            let first = self.rest().chars().next();
            if let Some(sigil) = first.filter(|c| *c == '$' || *c == '@') {
                let name_len = self.src[self.pos + 1..]
                    .char_indices()
                    .find(|(_, c)| !is_word_char(*c))
                    .map(|(i, _)| i)
                    .unwrap_or(self.src.len() - self.pos - 1);
                if name_len > 0 {
                    let name = self.src[self.pos + 1..self.pos + 1 + name_len].to_string();
                    self.pos += 1 + name_len;
                    if sigil == '@' {
                        return Err(CompileError::UnsupportedFlag {
                            rule: self.rule.to_string(),
                            flag: name,
                        });
                    }
                    let mut token = Token::new(TokenKind::Recurse(Callee::Expression(name)));
                    pending.apply_if_present(&mut token);
                    tokens.push(token);
                    continue;
                }
            }

            let Some(c) = self.rest().chars().next() else {
                break;
            };
            self.pos += c.len_utf8();
            match c {
                '?' | '*' | '+' => {
                    let Some(last) = tokens.last_mut() else {
                        return Err(self.dangling(c));
                    };
                    match c {
                        '?' => last.modifiers.optional = true,
                        '*' => last.modifiers.zero_or_more = true,
                        _ => last.modifiers.one_or_more = true,
                    }
                }
                '&' => pending.positive_lookahead = true,
                '!' => pending.negative_lookahead = true,
                '.' => pending.silent = true,
                '[' | ']' | '<' | '>' => {
                    let optional = matches!(c, '<' | '>');
                    let mut token = Token::new(TokenKind::Whitespace { optional });
                    pending.apply_if_present(&mut token);
                    tokens.push(token);
                }
                '(' => {
                    let mut children = Vec::new();
                    self.scan(&mut children)?;
                    let mut token = Token::new(TokenKind::Sequence(children));
                    pending.apply_if_present(&mut token);
                    tokens.push(token);
                }
                ')' => return self.settle(&pending),
                '|' => {
                    self.settle(&pending)?;
                    let left = unwrap_single(std::mem::take(tokens));
                    let mut right_tokens = Vec::new();
                    self.scan(&mut right_tokens)?;
                    let right = unwrap_single(right_tokens);

                    let mut alternatives = vec![left];
                    match right {
                        Token {
                            kind: TokenKind::Choice(more),
                            modifiers,
                        } if modifiers == Default::default() => alternatives.extend(more),
                        other => alternatives.push(other),
                    }
                    tokens.push(Token::new(TokenKind::Choice(alternatives)));
                    return Ok(());
                }
                other => self.warn(format!("can't parse {:?}, skipping it", other)),
            }
        }
        self.settle(&pending)
    }

    /// `"..."` or `'...'`, body returned verbatim
    fn quoted(&mut self) -> Option<String> {
        let quote = self.rest().chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let close = self.rest()[1..].find(quote)?;
        let body = self.rest()[1..1 + close].to_string();
        self.pos += close + 2;
        Some(body)
    }

    /// `/.../` with `\/` unescaped; other escapes are kept for the regex engine
    fn regex(&mut self) -> Option<String> {
        let src = self.src;
        let rest = src[self.pos..].strip_prefix('/')?;
        let mut body = String::new();
        let mut chars = rest.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, '/')) => body.push('/'),
                    Some((_, escaped)) => {
                        body.push('\\');
                        body.push(escaped);
                    }
                    None => return None,
                },
                '/' => {
                    self.pos += i + 2;
                    return Some(body);
                }
                _ => body.push(c),
            }
        }
        None
    }
}
