// ABOUTME: The export document written by export and read back by import
// ABOUTME: JSON keys are capitalized: TableName, PrimaryKey, RangeKey, Items

use serde::{Deserialize, Deserializer, Serialize};

/// One exported record: attribute name to typed JSON value
pub type Item = serde_json::Map<String, serde_json::Value>;

/// Self-contained snapshot of a table's key schema and items
///
/// Every field defaults to empty when missing from the input or set to
/// `null`, so a document holding only `Items` still parses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExportDocument {
    /// Source table name at export time; not checked on import
    #[serde(deserialize_with = "null_as_default")]
    pub table_name: String,
    /// Hash key attribute name
    #[serde(deserialize_with = "null_as_default")]
    pub primary_key: String,
    /// Range key attribute name, empty when the table has none
    #[serde(deserialize_with = "null_as_default")]
    pub range_key: String,
    /// Items in scan order
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

impl ExportDocument {
    /// Serialize as compact JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a document, tolerating missing top-level fields
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
