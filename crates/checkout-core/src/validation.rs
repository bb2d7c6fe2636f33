//! Validation Errors
//!
//! A failed sale comes back with a tree of validation errors: errors on the
//! transaction itself, plus nested groups for the credit card, billing
//! address and so on. The tree is flattened depth-first into
//! [`ValidationErrorEntry`] values, which [`format_errors`] renders as text.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// One validation failure reported by the gateway
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorEntry {
    /// Gateway error code (e.g. `81501`)
    pub code: String,

    /// Human-readable description
    pub message: String,

    /// Field the error is about, when the gateway names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl ValidationErrorEntry {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            attribute: None,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

/// Nested validation error collection
///
/// Both the errors at a node and its child groups keep insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationErrorEntry>,
    nested: Vec<(String, ValidationErrors)>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error at this node
    pub fn add(&mut self, entry: ValidationErrorEntry) {
        self.errors.push(entry);
    }

    /// Add an error under a nested path such as `["transaction", "billing"]`.
    ///
    /// Missing groups along the path are created; an empty path adds at
    /// this node.
    pub fn add_at<I, S>(&mut self, path: I, entry: ValidationErrorEntry)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut node = self;
        for key in path {
            node = node.child_mut(key.as_ref());
        }
        node.add(entry);
    }

    fn child_mut(&mut self, key: &str) -> &mut Self {
        let index = match self.nested.iter().position(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                self.nested.push((key.to_string(), Self::new()));
                self.nested.len() - 1
            }
        };
        &mut self.nested[index].1
    }

    /// Nested group for `key`
    #[must_use]
    pub fn for_key(&self, key: &str) -> Option<&Self> {
        self.nested.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Errors at this node only
    #[must_use]
    pub fn shallow_errors(&self) -> &[ValidationErrorEntry] {
        &self.errors
    }

    /// Errors at this node about `attribute`
    pub fn on<'a>(&'a self, attribute: &'a str) -> impl Iterator<Item = &'a ValidationErrorEntry> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.attribute.as_deref() == Some(attribute))
    }

    /// Every error in the tree, depth-first.
    ///
    /// A node's own errors come before those of its children, and children
    /// are visited in insertion order.
    #[must_use]
    pub fn deep_errors(&self) -> Vec<ValidationErrorEntry> {
        let mut out = Vec::with_capacity(self.deep_size());
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<ValidationErrorEntry>) {
        out.extend(self.errors.iter().cloned());
        for (_, child) in &self.nested {
            child.collect_into(out);
        }
    }

    /// Number of errors in the whole tree
    #[must_use]
    pub fn deep_size(&self) -> usize {
        self.errors.len() + self.nested.iter().map(|(_, c)| c.deep_size()).sum::<usize>()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deep_size() == 0
    }

    /// Messages of every error in the tree, one per line, in `deep_errors` order
    #[must_use]
    pub fn messages(&self) -> String {
        self.deep_errors()
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render validation errors as one `Error: <code>: <message>` line each.
///
/// Lines are newline-terminated and keep the input order. Nothing is
/// deduplicated, sorted or truncated; empty input gives an empty string.
#[must_use]
pub fn format_errors(errors: &[ValidationErrorEntry]) -> String {
    errors.iter().fold(String::new(), |mut out, error| {
        let _ = writeln!(out, "Error: {}: {}", error.code, error.message);
        out
    })
}
