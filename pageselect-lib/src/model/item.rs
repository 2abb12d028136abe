//! Item and ItemId

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Stable unique identifier of an item.
///
/// Upstream APIs use either integer or string keys; both deserialize from the
/// bare JSON value.
///
/// # Examples
///
/// ```
/// use pageselect_lib::model::ItemId;
///
/// assert_eq!(ItemId::parse("129884"), ItemId::Int(129884));
/// assert_eq!(ItemId::parse("abc-1"), ItemId::from("abc-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Integer key (e.g. `129884`).
    Int(i64),
    /// String key (e.g. `"a1b2"`).
    Str(String),
}

impl ItemId {
    /// Parses user-entered text: integer literals become [`ItemId::Int`],
    /// everything else [`ItemId::Str`].
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Str(text.to_string()),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// One row of the dataset.
///
/// Only [`Item::id`] takes part in selection; the remaining fields are kept
/// as raw JSON for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier.
    pub id: ItemId,
    /// Display fields, keyed by name.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// Creates an item with no display fields.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Adds a display field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns the raw JSON value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Renders a field as display text.
    ///
    /// Strings are returned verbatim, `null` and missing fields as an empty
    /// string, anything else as its JSON text.
    pub fn field(&self, name: &str) -> String {
        match self.fields.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_int_and_string_ids() {
        let item: Item = serde_json::from_str(r#"{"id": 27992, "title": "A Sunday"}"#).unwrap();
        assert_eq!(item.id, ItemId::Int(27992));
        assert_eq!(item.field("title"), "A Sunday");

        let item: Item = serde_json::from_str(r#"{"id": "x-1"}"#).unwrap();
        assert_eq!(item.id, ItemId::from("x-1"));
        assert!(item.fields.is_empty());
    }

    #[test]
    fn test_missing_id_is_an_error() {
        assert!(serde_json::from_str::<Item>(r#"{"title": "no id"}"#).is_err());
    }

    #[test]
    fn test_field_rendering() {
        let item = Item::new(1)
            .with_field("date_start", 1884)
            .with_field("inscriptions", Value::Null)
            .with_field("title", "Nighthawks");
        assert_eq!(item.field("date_start"), "1884");
        assert_eq!(item.field("inscriptions"), "");
        assert_eq!(item.field("title"), "Nighthawks");
        assert_eq!(item.field("missing"), "");
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(ItemId::parse(" 42 "), ItemId::Int(42));
        assert_eq!(ItemId::parse("4x2"), ItemId::from("4x2"));
        assert_eq!(ItemId::Int(-3).to_string(), "-3");
        assert_eq!(ItemId::from("abc").to_string(), "abc");
    }
}
