use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::value::HoconValue;
use crate::{Config, HoconError};

/// JSON export of a parsed configuration tree.
///
/// The tree carries no number/boolean typing once parsed; every scalar
/// is the concatenated text, so scalars export as JSON strings, objects
/// as maps in declaration order, arrays as JSON arrays and `null` as
/// JSON null. A concatenation mixing literals with arrays exports its
/// array elements only (same flattening the list getters apply).
impl Serialize for HoconValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let HoconValue::Object(entries) = self {
            let mut map = serializer.serialize_map(Some(entries.len()))?;
            for (key, node) in entries {
                map.serialize_entry(key, &*node.borrow())?;
            }
            return map.end();
        }
        if let Some(elements) = self.as_array() {
            let mut seq = serializer.serialize_seq(Some(elements.len()))?;
            for element in &elements {
                seq.serialize_element(&*element.borrow())?;
            }
            return seq.end();
        }
        match self.as_string() {
            Some(text) => serializer.serialize_str(&text),
            None => serializer.serialize_none(),
        }
    }
}

pub fn to_json_value(config: &Config) -> Result<serde_json::Value, HoconError> {
    serde_json::to_value(&*config.root().borrow()).map_err(export_error)
}

pub fn to_json_string(config: &Config) -> Result<String, HoconError> {
    serde_json::to_string_pretty(&*config.root().borrow()).map_err(export_error)
}

fn export_error(err: serde_json::Error) -> HoconError {
    HoconError::TypeError {
        message: format!("Failed to export configuration as JSON: {}", err),
        hint: None,
        code: Some(408),
    }
}
