use std::collections::HashSet;
use std::time::Duration;

use super::*;
use crate::path::split_path;
use crate::value::HoconValue;

impl Config {
    /// Resolves `path` against this config's root. When any segment
    /// fails to resolve, the *entire* path is retried from the fallback
    /// config's own root rather than continued from the point of
    /// failure, so a scalar shadowing a subtree here does not block a
    /// proper subtree in the fallback.
    fn get_node(&self, path: &str) -> Option<NodeRef> {
        let segments = split_path(path);
        let mut current = self.root().clone();
        for segment in &segments {
            let next = current.borrow().child(segment);
            match next {
                Some(node) => current = node,
                None => return self.fallback().and_then(|f| f.get_node(path)),
            }
        }
        Some(current)
    }

    /// True iff the path resolves somewhere along the fallback chain.
    pub fn has_path(&self, path: &str) -> bool {
        self.get_node(path).is_some()
    }

    /// The raw node at `path`, if any. Most callers want a typed getter
    /// instead; this is the escape hatch for custom conversions.
    pub fn get_value(&self, path: &str) -> Option<NodeRef> {
        self.get_node(path)
    }

    /// String value at `path`; `None` when the path is absent everywhere
    /// or the value is `null`.
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get_node(path).and_then(|node| node.borrow().as_string())
    }

    pub fn get_string_or(&self, path: &str, default: &str) -> String {
        self.get_string(path).unwrap_or_else(|| default.to_string())
    }

    /// Boolean at `path` (`true`/`on`/`false`/`off`, exact match);
    /// `false` when absent.
    pub fn get_bool(&self, path: &str) -> Result<bool, HoconError> {
        self.get_bool_or(path, false)
    }

    pub fn get_bool_or(&self, path: &str, default: bool) -> Result<bool, HoconError> {
        match self.get_node(path) {
            Some(node) => node.borrow().as_bool(),
            None => Ok(default),
        }
    }

    /// Integer at `path`; `0` when absent.
    pub fn get_int(&self, path: &str) -> Result<i32, HoconError> {
        self.get_int_or(path, 0)
    }

    pub fn get_int_or(&self, path: &str, default: i32) -> Result<i32, HoconError> {
        match self.get_node(path) {
            Some(node) => node.borrow().as_int(),
            None => Ok(default),
        }
    }

    pub fn get_long(&self, path: &str) -> Result<i64, HoconError> {
        self.get_long_or(path, 0)
    }

    pub fn get_long_or(&self, path: &str, default: i64) -> Result<i64, HoconError> {
        match self.get_node(path) {
            Some(node) => node.borrow().as_long(),
            None => Ok(default),
        }
    }

    pub fn get_float(&self, path: &str) -> Result<f32, HoconError> {
        self.get_float_or(path, 0.0)
    }

    pub fn get_float_or(&self, path: &str, default: f32) -> Result<f32, HoconError> {
        match self.get_node(path) {
            Some(node) => node.borrow().as_float(),
            None => Ok(default),
        }
    }

    pub fn get_double(&self, path: &str) -> Result<f64, HoconError> {
        self.get_double_or(path, 0.0)
    }

    pub fn get_double_or(&self, path: &str, default: f64) -> Result<f64, HoconError> {
        match self.get_node(path) {
            Some(node) => node.borrow().as_double(),
            None => Ok(default),
        }
    }

    pub fn get_decimal(&self, path: &str) -> Result<f64, HoconError> {
        self.get_decimal_or(path, 0.0)
    }

    pub fn get_decimal_or(&self, path: &str, default: f64) -> Result<f64, HoconError> {
        match self.get_node(path) {
            Some(node) => node.borrow().as_decimal(),
            None => Ok(default),
        }
    }

    /// Duration at `path` with optional `ns`/`us`/`ms`/`s`/`m`/`h`/`d`
    /// suffix; bare numbers are milliseconds and `infinite` maps to
    /// `Duration::MAX`. `Duration::ZERO` when absent.
    pub fn get_time_span(&self, path: &str) -> Result<Duration, HoconError> {
        self.get_time_span_or(path, Duration::ZERO)
    }

    pub fn get_time_span_or(&self, path: &str, default: Duration) -> Result<Duration, HoconError> {
        match self.get_node(path) {
            Some(node) => node.borrow().as_time_span(true),
            None => Ok(default),
        }
    }

    /// Byte count at `path`, optionally suffixed with a `b`; `None`
    /// when absent.
    pub fn get_byte_size(&self, path: &str) -> Result<Option<i64>, HoconError> {
        match self.get_node(path) {
            Some(node) => node.borrow().as_byte_size().map(Some),
            None => Ok(None),
        }
    }

    fn get_list<T>(
        &self,
        path: &str,
        convert: fn(&HoconValue) -> Result<T, HoconError>,
    ) -> Result<Vec<T>, HoconError> {
        let node = self.get_node(path).ok_or_else(|| HoconError::PathNotFound {
            path: path.to_string(),
            hint: Some("List getters need the path to exist".into()),
            code: Some(301),
        })?;
        let elements = node.borrow().as_array().ok_or_else(|| HoconError::TypeError {
            message: format!("Value at '{}' is not an array", path),
            hint: Some("Use [ ... ] syntax for list values".into()),
            code: Some(407),
        })?;
        elements
            .iter()
            .map(|element| convert(&element.borrow()))
            .collect()
    }

    pub fn get_bool_list(&self, path: &str) -> Result<Vec<bool>, HoconError> {
        self.get_list(path, HoconValue::as_bool)
    }

    pub fn get_int_list(&self, path: &str) -> Result<Vec<i32>, HoconError> {
        self.get_list(path, HoconValue::as_int)
    }

    pub fn get_long_list(&self, path: &str) -> Result<Vec<i64>, HoconError> {
        self.get_list(path, HoconValue::as_long)
    }

    pub fn get_float_list(&self, path: &str) -> Result<Vec<f32>, HoconError> {
        self.get_list(path, HoconValue::as_float)
    }

    pub fn get_double_list(&self, path: &str) -> Result<Vec<f64>, HoconError> {
        self.get_list(path, HoconValue::as_double)
    }

    pub fn get_decimal_list(&self, path: &str) -> Result<Vec<f64>, HoconError> {
        self.get_list(path, HoconValue::as_decimal)
    }

    pub fn get_byte_list(&self, path: &str) -> Result<Vec<u8>, HoconError> {
        self.get_list(path, HoconValue::as_byte)
    }

    /// String list at `path`; an absent path yields an empty list, a
    /// `null` element an empty string.
    pub fn get_string_list(&self, path: &str) -> Result<Vec<String>, HoconError> {
        let node = match self.get_node(path) {
            Some(node) => node,
            None => return Ok(Vec::new()),
        };
        let elements = node.borrow().as_array().ok_or_else(|| HoconError::TypeError {
            message: format!("Value at '{}' is not an array", path),
            hint: Some("Use [ ... ] syntax for list values".into()),
            code: Some(407),
        })?;
        Ok(elements
            .iter()
            .map(|element| element.borrow().as_string().unwrap_or_default())
            .collect())
    }

    /// A new `Config` rooted at `path`, sharing (not copying) the
    /// resolved sub-node and carrying no fallback of its own. `None`
    /// signals absence, not an error.
    pub fn get_config(&self, path: &str) -> Option<Config> {
        self.get_node(path).map(Config::wrap)
    }

    /// Flat, single-level merge of this config's root keys with, for
    /// any key not already yielded, the fallback chain's root keys.
    /// Keys are yielded raw, exactly as declared (no dotted-path
    /// splitting), and nested objects are not descended into.
    pub fn enumerate(&self) -> impl Iterator<Item = (String, NodeRef)> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(config) = current {
            chain.push(config.root().borrow().entries());
            current = config.fallback();
        }
        let mut used = HashSet::new();
        chain
            .into_iter()
            .flatten()
            .filter(move |(key, _)| used.insert(key.clone()))
    }
}
