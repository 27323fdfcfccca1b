//! Result tree
//!
//! Every rule invocation builds one [`Node`]: the rule that produced it, a
//! name, the text it matched, and the sub-results captured under tag names.
//! A tag that is stored once holds a single node; storing the same tag again
//! turns the slot into a list in match order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A captured field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Default argument supplied by the rule header
    Str(String),
    /// A single captured sub-result
    Node(Box<Node>),
    /// A tag captured more than once
    List(Vec<Node>),
}

impl Value {
    /// Text of the value: the string itself, the node's text, or the text of
    /// the most recent list entry
    pub fn text(&self) -> &str {
        match self {
            Value::Str(s) => s,
            Value::Node(node) => &node.text,
            Value::List(nodes) => nodes.last().map(|n| n.text.as_str()).unwrap_or(""),
        }
    }

    /// The captured nodes in match order
    pub fn nodes(&self) -> Vec<&Node> {
        match self {
            Value::Str(_) => Vec::new(),
            Value::Node(node) => vec![node.as_ref()],
            Value::List(nodes) => nodes.iter().collect(),
        }
    }
}

/// One record of the result tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Rule whose invocation created this record
    pub matchrule: String,
    /// Rule name for rule results, tag name for tag records
    pub name: String,
    /// Concatenated text of everything stored into this record
    pub text: String,
    /// Captured fields, keyed by tag name
    pub fields: BTreeMap<String, Value>,
}

impl Node {
    /// Create an empty record
    pub fn new(matchrule: &str, name: &str) -> Self {
        Self {
            matchrule: matchrule.to_string(),
            name: name.to_string(),
            text: String::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Create a record pre-populated with default arguments
    pub fn with_args(matchrule: &str, name: &str, args: &[(&str, &str)]) -> Self {
        let mut node = Self::new(matchrule, name);
        for (key, value) in args {
            node.fields
                .insert((*key).to_string(), Value::Str((*value).to_string()));
        }
        node
    }

    /// Look up a captured field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Captured node under `name` (the last one when the tag repeated)
    pub fn child(&self, name: &str) -> Option<&Node> {
        match self.fields.get(name)? {
            Value::Node(node) => Some(node),
            Value::List(nodes) => nodes.last(),
            Value::Str(_) => None,
        }
    }

    /// Texts of every node captured under `name`, in match order
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.fields
            .get(name)
            .map(|v| v.nodes().into_iter().map(|n| n.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Resolve a semantic value on this record: a captured field, or one of
    /// the built-in `text`, `name` and `matchrule` entries
    pub fn lookup(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.fields.get(name) {
            return Some(value.text());
        }
        match name {
            "text" => Some(&self.text),
            "name" => Some(&self.name),
            "matchrule" => Some(&self.matchrule),
            _ => None,
        }
    }

    /// Default store: append the sub-result's text and, when tagged, capture
    /// it. A default argument under the same name is overwritten.
    pub fn absorb(&mut self, sub: Node, tag: Option<&str>) {
        self.text.push_str(&sub.text);
        let Some(tag) = tag else {
            return;
        };
        match self.fields.remove(tag) {
            Some(Value::Node(first)) => {
                self.fields
                    .insert(tag.to_string(), Value::List(vec![*first, sub]));
            }
            Some(Value::List(mut nodes)) => {
                nodes.push(sub);
                self.fields.insert(tag.to_string(), Value::List(nodes));
            }
            Some(Value::Str(_)) | None => {
                self.fields
                    .insert(tag.to_string(), Value::Node(Box::new(sub)));
            }
        }
    }

    /// Serialize the record to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Serialize the record to indented JSON
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
