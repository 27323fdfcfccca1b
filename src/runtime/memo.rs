//! Memoization strategies
//!
//! The parser asks its [`Memo`] three questions around every rule call:
//! `packhas` (is there an entry for this rule at this position?), `packread`
//! (what is it?) and `packwrite` (remember this outcome). The strategy decides
//! what gets remembered. Every strategy must leave the observable outcome of a
//! parse unchanged; only the amount of work differs.
//!
//! - [`NoMemo`] never remembers anything (plain recursive descent)
//! - [`Packrat`] remembers every success and failure
//! - [`FalseOnlyPackrat`] remembers failures only
//! - [`ConservativePackrat`] remembers a key from its second visit onward
//!
//! Keys are `(rule id, byte position)` pairs in a growable hash map, so there
//! is no ceiling on the input length.

use super::node::Node;
use ahash::RandomState;
use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};

/// Memo key: rule id and input position
pub type MemoKey = (usize, usize);

type MemoMap<V> = HashMap<MemoKey, V, RandomState>;

/// A remembered rule outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoEntry {
    /// The rule is known not to match at this position
    Failed,
    /// The rule matched, producing `node` and leaving the cursor at `end`
    Matched {
        /// Finalised result of the rule
        node: Node,
        /// Cursor position after the match
        end: usize,
    },
}

/// Memoization hook points consulted by [`Parser::call`](super::Parser::call)
pub trait Memo: Default {
    /// Short strategy name used in logs and benchmarks
    const NAME: &'static str;

    /// Whether a usable entry exists for `rule` at `pos`
    fn packhas(&self, rule: usize, pos: usize) -> bool;

    /// Read the entry for `rule` at `pos`
    fn packread(&self, rule: usize, pos: usize) -> Option<MemoEntry>;

    /// Record the outcome of `rule` started at `pos`; `end` is the cursor
    /// after the attempt
    fn packwrite(&mut self, rule: usize, pos: usize, result: Option<&Node>, end: usize);

    /// Number of stored entries
    fn len(&self) -> usize;

    /// Whether nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// No memoization at all
#[derive(Debug, Default, Clone)]
pub struct NoMemo;

impl Memo for NoMemo {
    const NAME: &'static str = "none";

    #[inline]
    fn packhas(&self, _rule: usize, _pos: usize) -> bool {
        false
    }

    #[inline]
    fn packread(&self, _rule: usize, _pos: usize) -> Option<MemoEntry> {
        None
    }

    #[inline]
    fn packwrite(&mut self, _rule: usize, _pos: usize, _result: Option<&Node>, _end: usize) {}

    fn len(&self) -> usize {
        0
    }
}

fn entry_for(result: Option<&Node>, end: usize) -> MemoEntry {
    match result {
        Some(node) => MemoEntry::Matched {
            node: node.clone(),
            end,
        },
        None => MemoEntry::Failed,
    }
}

/// Full packrat memoization
#[derive(Debug, Default, Clone)]
pub struct Packrat {
    entries: MemoMap<MemoEntry>,
}

impl Memo for Packrat {
    const NAME: &'static str = "packrat";

    #[inline]
    fn packhas(&self, rule: usize, pos: usize) -> bool {
        self.entries.contains_key(&(rule, pos))
    }

    fn packread(&self, rule: usize, pos: usize) -> Option<MemoEntry> {
        self.entries.get(&(rule, pos)).cloned()
    }

    fn packwrite(&mut self, rule: usize, pos: usize, result: Option<&Node>, end: usize) {
        self.entries
            .entry((rule, pos))
            .or_insert_with(|| entry_for(result, end));
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Remembers only definite failures; successes are recomputed
#[derive(Debug, Default, Clone)]
pub struct FalseOnlyPackrat {
    failures: HashSet<MemoKey, RandomState>,
}

impl Memo for FalseOnlyPackrat {
    const NAME: &'static str = "false-only";

    #[inline]
    fn packhas(&self, rule: usize, pos: usize) -> bool {
        self.failures.contains(&(rule, pos))
    }

    fn packread(&self, rule: usize, pos: usize) -> Option<MemoEntry> {
        self.packhas(rule, pos).then_some(MemoEntry::Failed)
    }

    fn packwrite(&mut self, rule: usize, pos: usize, result: Option<&Node>, _end: usize) {
        if result.is_none() {
            self.failures.insert((rule, pos));
        }
    }

    fn len(&self) -> usize {
        self.failures.len()
    }
}

/// Starts memoizing a key on its second visit
///
/// The first write for a key only marks it as seen; the outcome is stored
/// when the same key is written again.
#[derive(Debug, Default, Clone)]
pub struct ConservativePackrat {
    entries: MemoMap<Option<MemoEntry>>,
}

impl Memo for ConservativePackrat {
    const NAME: &'static str = "conservative";

    #[inline]
    fn packhas(&self, rule: usize, pos: usize) -> bool {
        matches!(self.entries.get(&(rule, pos)), Some(Some(_)))
    }

    fn packread(&self, rule: usize, pos: usize) -> Option<MemoEntry> {
        self.entries.get(&(rule, pos)).cloned().flatten()
    }

    fn packwrite(&mut self, rule: usize, pos: usize, result: Option<&Node>, end: usize) {
        match self.entries.entry((rule, pos)) {
            Entry::Vacant(slot) => {
                slot.insert(None);
            }
            Entry::Occupied(mut slot) => {
                if slot.get().is_none() {
                    *slot.get_mut() = Some(entry_for(result, end));
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.values().filter(|e| e.is_some()).count()
    }
}
