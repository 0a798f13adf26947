use std::fmt;

use crate::HoconError;
use crate::parser::Parser;
use crate::value::{HoconValue, NodeRef};

mod access;

/// Read surface over one parsed configuration tree.
///
/// A `Config` owns a handle to its root node plus an optional fallback
/// `Config` consulted whenever a path does not resolve locally. The
/// chain is built at construction time and never mutated afterwards;
/// after parsing the tree itself is only ever read, so configs returned
/// by `get_config` may freely alias sub-nodes of this one.
pub struct Config {
    root: NodeRef,
    fallback: Option<Box<Config>>,
}

impl Config {
    /// Parses a configuration from a string.
    pub fn from_str(text: &str) -> Result<Self, HoconError> {
        let root = Parser::parse(text)?;
        Ok(Config {
            root,
            fallback: None,
        })
    }

    /// A configuration with no values.
    pub fn empty() -> Self {
        let root = HoconValue::node();
        root.borrow_mut().shape_as_object();
        Config {
            root,
            fallback: None,
        }
    }

    pub(crate) fn wrap(root: NodeRef) -> Self {
        Config {
            root,
            fallback: None,
        }
    }

    pub(crate) fn root(&self) -> &NodeRef {
        &self.root
    }

    pub(crate) fn fallback(&self) -> Option<&Config> {
        self.fallback.as_deref()
    }

    /// Chains `fallback` behind this configuration. Lookups that miss
    /// every link of the chain fall through to the caller's default.
    /// The fallback is appended at the end of an existing chain, so
    /// earlier links keep priority.
    pub fn with_fallback(self, fallback: Config) -> Self {
        let Config {
            root,
            fallback: existing,
        } = self;
        let chained = match existing {
            Some(current) => current.with_fallback(fallback),
            None => fallback,
        };
        Config {
            root,
            fallback: Some(Box::new(chained)),
        }
    }

    /// True when the root holds no values. Fallbacks are not consulted.
    pub fn is_empty(&self) -> bool {
        self.root.borrow().is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::empty()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.borrow())
    }
}
