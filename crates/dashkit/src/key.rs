//! Key bindings and matching.
//!
//! Controls in this crate react to [`KeyMsg`](crate::message::KeyMsg) values by
//! matching the key name against a [`Binding`]. Bindings carry short help text
//! so front ends can list what each key does.
//!
//! # Example
//!
//! ```rust
//! use dashkit::key::{Binding, help_line, matches};
//!
//! let confirm = Binding::new().keys(&["enter"]).help("enter", "commit");
//! let revert = Binding::new().keys(&["esc"]).help("esc", "revert");
//!
//! assert!(matches("enter", &[&confirm, &revert]));
//! assert!(!matches("tab", &[&confirm, &revert]));
//! assert_eq!(help_line(&[&confirm, &revert]), "enter commit · esc revert");
//! ```

use std::fmt;

/// Help text for a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Key label shown to the user (e.g. "↑").
    pub key: String,
    /// What the binding does.
    pub desc: String,
}

impl Help {
    /// Creates new help text.
    #[must_use]
    pub fn new(key: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            desc: desc.into(),
        }
    }
}

/// A set of key names that trigger one action.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<String>,
    help: Help,
}

impl Binding {
    /// Creates an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key names for this binding.
    #[must_use]
    pub fn keys(mut self, keys: &[&str]) -> Self {
        self.keys = keys.iter().map(|&s| s.to_string()).collect();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help::new(key, desc);
        self
    }

    /// Returns the key names.
    #[must_use]
    pub fn get_keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the help text.
    #[must_use]
    pub fn get_help(&self) -> &Help {
        &self.help
    }

    /// A binding without keys never matches.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.keys.is_empty()
    }
}

/// Returns true if `key` triggers any of the enabled `bindings`.
pub fn matches<K: fmt::Display>(key: K, bindings: &[&Binding]) -> bool {
    let key = key.to_string();
    bindings
        .iter()
        .any(|binding| binding.enabled() && binding.keys.iter().any(|k| *k == key))
}

/// Renders `key desc` pairs for the enabled `bindings`, separated by ` · `.
#[must_use]
pub fn help_line(bindings: &[&Binding]) -> String {
    bindings
        .iter()
        .filter(|binding| binding.enabled())
        .map(|binding| format!("{} {}", binding.help.key, binding.help.desc))
        .collect::<Vec<_>>()
        .join(" · ")
}
