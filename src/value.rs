use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use indexmap::IndexMap;

use crate::HoconError;

/// Shared handle to a node in the configuration tree.
///
/// Sub-configs returned by `Config::get_config` alias the same node
/// rather than deep-copying it. The tree is only mutated while the
/// parser runs; every accessor method reads through an immutable borrow.
pub type NodeRef = Rc<RefCell<HoconValue>>;

/// A single slot in the configuration tree.
///
/// A node starts `Empty` and acquires its shape as the parser writes
/// into it: literal/whitespace/array fragments turn it into a
/// concatenation, entering it via a brace body or a dotted path turns it
/// into an object. Assigning a scalar to a path that held an object
/// clears the node first; re-entering an object merges instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HoconValue {
    #[default]
    Empty,
    Concat(Vec<Fragment>),
    Object(IndexMap<String, NodeRef>),
}

/// One piece of a concatenation.
///
/// Arrays only ever occur in value position, so the array shape lives
/// here: a node holding a single `Array` fragment is an array value.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Literal(String),
    Whitespace(String),
    Array(Vec<NodeRef>),
}

impl HoconValue {
    /// Allocates a fresh empty node.
    pub fn node() -> NodeRef {
        Rc::new(RefCell::new(HoconValue::Empty))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, HoconValue::Object(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            HoconValue::Empty => true,
            HoconValue::Concat(fragments) => fragments.is_empty(),
            HoconValue::Object(entries) => entries.is_empty(),
        }
    }

    /// Discards all prior content and shape state.
    pub fn clear(&mut self) {
        *self = HoconValue::Empty;
    }

    /// Shapes this node as an object, keeping existing object content.
    /// This is what makes repeated declarations of the same path merge
    /// additively instead of replacing each other.
    pub fn shape_as_object(&mut self) {
        if !self.is_object() {
            *self = HoconValue::Object(IndexMap::new());
        }
    }

    /// Fetches the child node for `key`, creating it if the key is new.
    /// Re-adding a key returns the existing node, which is what makes
    /// merging recursive and path-order-independent.
    pub fn get_or_create_key(&mut self, key: &str) -> NodeRef {
        self.shape_as_object();
        match self {
            HoconValue::Object(entries) => entries
                .entry(key.to_string())
                .or_insert_with(HoconValue::node)
                .clone(),
            _ => unreachable!("shaped as object above"),
        }
    }

    /// Looks up an existing child; `None` if this node is not an object
    /// or the key is absent.
    pub fn child(&self, key: &str) -> Option<NodeRef> {
        match self {
            HoconValue::Object(entries) => entries.get(key).cloned(),
            _ => None,
        }
    }

    /// Raw (key, node) pairs in declaration order; empty for non-objects.
    pub fn entries(&self) -> Vec<(String, NodeRef)> {
        match self {
            HoconValue::Object(entries) => entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn append(&mut self, fragment: Fragment) {
        match self {
            HoconValue::Concat(fragments) => fragments.push(fragment),
            _ => *self = HoconValue::Concat(vec![fragment]),
        }
    }

    pub fn append_literal(&mut self, text: String) {
        self.append(Fragment::Literal(text));
    }

    pub fn append_whitespace(&mut self, text: String) {
        self.append(Fragment::Whitespace(text));
    }

    pub fn append_array(&mut self, elements: Vec<NodeRef>) {
        self.append(Fragment::Array(elements));
    }

    /// Joins literal and whitespace fragments in encounter order.
    /// `None` when the node is an object or contains array fragments,
    /// which have no scalar rendering.
    fn concat_string(&self) -> Option<String> {
        match self {
            HoconValue::Empty => Some(String::new()),
            HoconValue::Object(_) => None,
            HoconValue::Concat(fragments) => {
                let mut joined = String::new();
                for fragment in fragments {
                    match fragment {
                        Fragment::Literal(text) | Fragment::Whitespace(text) => joined.push_str(text),
                        Fragment::Array(_) => return None,
                    }
                }
                Some(joined)
            }
        }
    }

    /// Scalar string value. The joined fragments are trimmed, and a
    /// rendered value of `null` reads back as absent (even when it was
    /// quoted; the tree keeps no quoting distinction once parsed).
    pub fn as_string(&self) -> Option<String> {
        let joined = self.concat_string()?;
        let trimmed = joined.trim();
        if trimmed == "null" {
            return None;
        }
        Some(trimmed.to_string())
    }

    fn scalar_text(&self) -> Result<String, HoconError> {
        self.as_string().ok_or_else(|| HoconError::TypeError {
            message: "Expected a scalar value".into(),
            hint: Some("This value is null, an object or an array".into()),
            code: Some(401),
        })
    }

    /// `true`/`on` and `false`/`off`, matched exactly (case-sensitive).
    pub fn as_bool(&self) -> Result<bool, HoconError> {
        let text = self.scalar_text()?;
        match text.as_str() {
            "true" | "on" => Ok(true),
            "false" | "off" => Ok(false),
            other => Err(HoconError::TypeError {
                message: format!("Unknown boolean format '{}'", other),
                hint: Some("Use true/false or on/off".into()),
                code: Some(402),
            }),
        }
    }

    pub fn as_int(&self) -> Result<i32, HoconError> {
        let text = self.scalar_text()?;
        text.parse::<i32>().map_err(|_| invalid_number(&text))
    }

    pub fn as_long(&self) -> Result<i64, HoconError> {
        let text = self.scalar_text()?;
        text.parse::<i64>().map_err(|_| invalid_number(&text))
    }

    pub fn as_byte(&self) -> Result<u8, HoconError> {
        let text = self.scalar_text()?;
        text.parse::<u8>().map_err(|_| invalid_number(&text))
    }

    pub fn as_float(&self) -> Result<f32, HoconError> {
        let text = self.scalar_text()?;
        text.parse::<f32>().map_err(|_| invalid_number(&text))
    }

    pub fn as_double(&self) -> Result<f64, HoconError> {
        let text = self.scalar_text()?;
        text.parse::<f64>().map_err(|_| invalid_number(&text))
    }

    /// Decimal values are carried as f64; the textual form is preserved
    /// in the tree for callers that need it verbatim.
    pub fn as_decimal(&self) -> Result<f64, HoconError> {
        self.as_double()
    }

    /// Duration with an optional unit suffix: `ns`, `us`, `ms`, `s`,
    /// `m`, `h`, `d`. Bare numbers are milliseconds. `infinite` maps to
    /// `Duration::MAX` when `allow_infinite` is set.
    pub fn as_time_span(&self, allow_infinite: bool) -> Result<Duration, HoconError> {
        let text = self.scalar_text()?;
        if allow_infinite && text == "infinite" {
            return Ok(Duration::MAX);
        }

        // longest suffix first so "ms" is not read as "s"
        const UNITS: [(&str, f64); 7] = [
            ("ns", 1e-9),
            ("us", 1e-6),
            ("ms", 1e-3),
            ("s", 1.0),
            ("m", 60.0),
            ("h", 3600.0),
            ("d", 86400.0),
        ];
        let (number, unit_secs) = UNITS
            .iter()
            .find(|(suffix, _)| text.ends_with(suffix))
            .map(|(suffix, secs)| (text[..text.len() - suffix.len()].trim(), *secs))
            .unwrap_or((text.as_str(), 1e-3));

        let amount = number.parse::<f64>().map_err(|_| HoconError::TypeError {
            message: format!("Invalid duration '{}'", text),
            hint: Some("Use a number with an optional ns/us/ms/s/m/h/d suffix".into()),
            code: Some(403),
        })?;
        if amount < 0.0 {
            return Err(HoconError::TypeError {
                message: format!("Negative duration '{}'", text),
                hint: Some("Durations cannot be negative".into()),
                code: Some(403),
            });
        }
        // NaN and values past Duration's range must not panic
        Duration::try_from_secs_f64(amount * unit_secs).map_err(|_| HoconError::TypeError {
            message: format!("Duration '{}' is out of range", text),
            hint: Some("Use a finite, non-negative duration".into()),
            code: Some(403),
        })
    }

    /// A long count of bytes, optionally suffixed with a `b`.
    pub fn as_byte_size(&self) -> Result<i64, HoconError> {
        let text = self.scalar_text()?;
        let number = text
            .strip_suffix('b')
            .map(str::trim)
            .unwrap_or(text.as_str());
        number.parse::<i64>().map_err(|_| HoconError::TypeError {
            message: format!("Invalid byte size '{}'", text),
            hint: Some("Use a whole number with an optional 'b' suffix".into()),
            code: Some(404),
        })
    }

    /// Array elements, flattened across array fragments (so `[1] [2]`
    /// concatenated in value position reads as one two-element list).
    /// `None` when the node holds no array at all.
    pub fn as_array(&self) -> Option<Vec<NodeRef>> {
        let fragments = match self {
            HoconValue::Concat(fragments) => fragments,
            _ => return None,
        };
        let mut elements = Vec::new();
        let mut saw_array = false;
        for fragment in fragments {
            if let Fragment::Array(items) = fragment {
                saw_array = true;
                elements.extend(items.iter().cloned());
            }
        }
        if saw_array { Some(elements) } else { None }
    }
}

fn invalid_number(text: &str) -> HoconError {
    HoconError::TypeError {
        message: format!("Invalid number '{}'", text),
        hint: Some("Use a plain base-10 number".into()),
        code: Some(405),
    }
}

const BARE_VALUE_CHARS: &str = "_-./:@$%+*";

fn is_bare_value(text: &str) -> bool {
    !text.is_empty()
        && !text.contains("//")
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || BARE_VALUE_CHARS.contains(c))
}

fn is_bare_key(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in text.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            '\t' => write!(f, "\\t")?,
            other => write!(f, "{}", other)?,
        }
    }
    write!(f, "\"")
}

fn write_scalar(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    if is_bare_value(text) {
        write!(f, "{}", text)
    } else {
        write_quoted(f, text)
    }
}

/// Renders the node as parseable configuration text. The exact layout is
/// not part of the format; re-parsing the rendering reproduces the same
/// scalar values at the same paths.
fn write_value(f: &mut fmt::Formatter<'_>, value: &HoconValue, indent: usize) -> fmt::Result {
    match value {
        HoconValue::Empty => write!(f, "\"\""),
        HoconValue::Object(entries) => {
            writeln!(f, "{{")?;
            for (key, node) in entries {
                write!(f, "{:indent$}", "", indent = (indent + 1) * 2)?;
                if is_bare_key(key) {
                    write!(f, "{}", key)?;
                } else {
                    write_quoted(f, key)?;
                }
                write!(f, " : ")?;
                write_value(f, &node.borrow(), indent + 1)?;
                writeln!(f)?;
            }
            write!(f, "{:indent$}}}", "", indent = indent * 2)
        }
        HoconValue::Concat(fragments) => {
            // flush literal/whitespace runs as one scalar, arrays inline
            let mut pending = String::new();
            let mut first = true;
            for fragment in fragments {
                match fragment {
                    Fragment::Literal(text) | Fragment::Whitespace(text) => pending.push_str(text),
                    Fragment::Array(items) => {
                        let trimmed = pending.trim();
                        if !trimmed.is_empty() {
                            if !first {
                                write!(f, " ")?;
                            }
                            write_scalar(f, trimmed)?;
                            first = false;
                        }
                        pending.clear();
                        if !first {
                            write!(f, " ")?;
                        }
                        write!(f, "[")?;
                        for (i, item) in items.iter().enumerate() {
                            if i > 0 {
                                write!(f, ", ")?;
                            }
                            write_value(f, &item.borrow(), indent)?;
                        }
                        write!(f, "]")?;
                        first = false;
                    }
                }
            }
            let trimmed = pending.trim();
            if !trimmed.is_empty() || first {
                if !first {
                    write!(f, " ")?;
                }
                write_scalar(f, trimmed)?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for HoconValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat_of(texts: &[&str]) -> HoconValue {
        let mut value = HoconValue::Empty;
        for (i, text) in texts.iter().enumerate() {
            if i > 0 {
                value.append_whitespace(" ".into());
            }
            value.append_literal((*text).into());
        }
        value
    }

    #[test]
    fn test_fragments_join_in_order() {
        let value = concat_of(&["1", "2", "3"]);
        assert_eq!(value.as_string(), Some("1 2 3".into()));
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        let mut value = concat_of(&["1"]);
        value.append_whitespace(" \t ".into());
        assert_eq!(value.as_string(), Some("1".into()));
    }

    #[test]
    fn test_null_reads_as_absent() {
        let value = concat_of(&["null"]);
        assert_eq!(value.as_string(), None);
    }

    #[test]
    fn test_object_merge_keeps_existing_keys() {
        let mut value = HoconValue::Empty;
        value.get_or_create_key("a").borrow_mut().append_literal("1".into());
        // re-shaping as object must not discard the existing child
        value.shape_as_object();
        let existing = value.get_or_create_key("a");
        assert_eq!(existing.borrow().as_string(), Some("1".into()));
    }

    #[test]
    fn test_clear_discards_shape_and_content() {
        let mut value = HoconValue::Empty;
        value.get_or_create_key("a");
        value.clear();
        assert!(!value.is_object());
        assert!(value.is_empty());
    }

    #[test]
    fn test_boolean_literals_exact_match() {
        assert_eq!(concat_of(&["true"]).as_bool(), Ok(true));
        assert_eq!(concat_of(&["on"]).as_bool(), Ok(true));
        assert_eq!(concat_of(&["false"]).as_bool(), Ok(false));
        assert_eq!(concat_of(&["off"]).as_bool(), Ok(false));
        assert!(concat_of(&["True"]).as_bool().is_err());
        assert!(concat_of(&["ON"]).as_bool().is_err());
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(concat_of(&["42"]).as_int(), Ok(42));
        assert_eq!(concat_of(&["-7"]).as_long(), Ok(-7));
        assert_eq!(concat_of(&["1.25"]).as_double(), Ok(1.25));
        assert_eq!(concat_of(&["1.25"]).as_decimal(), Ok(1.25));
        assert!(concat_of(&["bar"]).as_int().is_err());
    }

    #[test]
    fn test_time_span_suffixes() {
        assert_eq!(
            concat_of(&["5s"]).as_time_span(false),
            Ok(Duration::from_secs(5))
        );
        assert_eq!(
            concat_of(&["250ms"]).as_time_span(false),
            Ok(Duration::from_millis(250))
        );
        assert_eq!(
            concat_of(&["2m"]).as_time_span(false),
            Ok(Duration::from_secs(120))
        );
        assert_eq!(
            concat_of(&["1d"]).as_time_span(false),
            Ok(Duration::from_secs(86400))
        );
        // bare numbers are milliseconds
        assert_eq!(
            concat_of(&["1000"]).as_time_span(false),
            Ok(Duration::from_secs(1))
        );
        assert_eq!(concat_of(&["infinite"]).as_time_span(true), Ok(Duration::MAX));
        assert!(concat_of(&["infinite"]).as_time_span(false).is_err());
        assert!(concat_of(&["-5s"]).as_time_span(false).is_err());
    }

    #[test]
    fn test_time_span_out_of_range_is_an_error_not_a_panic() {
        assert!(concat_of(&["1e30s"]).as_time_span(false).is_err());
        assert!(concat_of(&["NaNs"]).as_time_span(false).is_err());
        assert!(concat_of(&["infs"]).as_time_span(false).is_err());
    }

    #[test]
    fn test_byte_size_suffix() {
        assert_eq!(concat_of(&["1024"]).as_byte_size(), Ok(1024));
        assert_eq!(concat_of(&["512b"]).as_byte_size(), Ok(512));
        // lowercase suffix only
        assert!(concat_of(&["512B"]).as_byte_size().is_err());
        assert!(concat_of(&["1kb"]).as_byte_size().is_err());
    }

    #[test]
    fn test_array_fragments_flatten() {
        let mut value = HoconValue::Empty;
        let one = HoconValue::node();
        one.borrow_mut().append_literal("1".into());
        let two = HoconValue::node();
        two.borrow_mut().append_literal("2".into());
        value.append_array(vec![one]);
        value.append_array(vec![two]);
        let elements = value.as_array().expect("array expected");
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].borrow().as_string(), Some("1".into()));
        assert_eq!(elements[1].borrow().as_string(), Some("2".into()));
    }

    #[test]
    fn test_scalar_only_node_is_not_an_array() {
        assert_eq!(concat_of(&["1"]).as_array(), None);
    }
}
