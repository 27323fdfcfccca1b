//! Regex compilation cache and incremental match cursor
//!
//! Compiled patterns are cached per thread so every parser and every pattern
//! text is compiled once. [`RegexCursor`] sits on top of that cache and
//! remembers where the last unanchored search started and where its match
//! began, so repeated attempts while the cursor stays inside that window are
//! answered without searching the input again.

use hashbrown::HashMap;
use regex::Regex;
use std::cell::RefCell;

thread_local! {
    static COMPILED: RefCell<HashMap<String, Regex>> = RefCell::new(HashMap::new());
}

/// Compiled regex for `pattern`, shared by every parser on this thread
pub fn get_or_compile(pattern: &str) -> Result<Regex, regex::Error> {
    COMPILED.with(|compiled| {
        let mut compiled = compiled.borrow_mut();
        if let Some(regex) = compiled.get(pattern) {
            return Ok(regex.clone());
        }
        let regex = Regex::new(pattern)?;
        compiled.insert(pattern.to_owned(), regex.clone());
        Ok(regex)
    })
}

/// Number of patterns compiled on this thread
pub fn cached_patterns() -> usize {
    COMPILED.with(|compiled| compiled.borrow().len())
}

/// Per-pattern match state for one parse
#[derive(Debug, Clone)]
pub struct RegexCursor {
    regex: Regex,
    /// Position the last search started from
    check_pos: Option<usize>,
    /// First match at or after `check_pos`, if any
    found: Option<(usize, usize)>,
    searches: usize,
}

impl RegexCursor {
    /// Build a cursor for `pattern`, or `None` if it does not compile
    pub fn new(pattern: &str) -> Option<Self> {
        get_or_compile(pattern).ok().map(|regex| Self {
            regex,
            check_pos: None,
            found: None,
            searches: 0,
        })
    }

    /// Match anchored at `pos`, returning the end of the match
    pub fn match_at(&mut self, input: &str, pos: usize) -> Option<usize> {
        if !self.covers(pos) {
            self.searches += 1;
            self.check_pos = Some(pos);
            self.found = self.regex.find_at(input, pos).map(|m| (m.start(), m.end()));
        }
        match self.found {
            Some((start, end)) if start == pos => Some(end),
            _ => None,
        }
    }

    /// Whether the remembered search answers an attempt at `pos`
    fn covers(&self, pos: usize) -> bool {
        let Some(check) = self.check_pos else {
            return false;
        };
        if pos < check {
            return false;
        }
        match self.found {
            Some((start, _)) => pos <= start,
            None => true,
        }
    }

    /// Number of searches actually run against the input
    pub fn searches(&self) -> usize {
        self.searches
    }
}
