// ABOUTME: DynamoDB AttributeValue to JSON conversion and back
// ABOUTME: Decoding mirrors untyped attribute decoding; encoding is total

use aws_sdk_dynamodb::types::AttributeValue;
use base64::Engine;
use serde_json::{Map, Number, Value as JsonValue};
use thiserror::Error;

use crate::document::Item;
use crate::store::RawItem;

/// A stored value with no plain JSON representation
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct ConversionError {
    pub reason: String,
}

impl ConversionError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Convert a DynamoDB attribute value to JSON
///
/// Maps attribute types to JSON types:
/// - S → string
/// - N → number
/// - BOOL → boolean
/// - NULL → null
/// - L → array
/// - M → object
/// - B → base64 string
/// - SS / NS / BS → array of strings / numbers / base64 strings
///
/// Sets and binaries do not survive a round trip as sets or binaries: they
/// come back as lists and strings when re-encoded.
///
/// # Examples
///
/// ```
/// # use dynamodb_migrator::convert::attribute_to_json;
/// # use aws_sdk_dynamodb::types::AttributeValue;
/// let json = attribute_to_json(&AttributeValue::N("42".to_string())).unwrap();
/// assert_eq!(json, serde_json::json!(42));
/// ```
pub fn attribute_to_json(value: &AttributeValue) -> Result<JsonValue, ConversionError> {
    match value {
        AttributeValue::S(s) => Ok(JsonValue::String(s.clone())),
        AttributeValue::N(n) => parse_number(n).map(JsonValue::Number),
        AttributeValue::Bool(b) => Ok(JsonValue::Bool(*b)),
        AttributeValue::Null(_) => Ok(JsonValue::Null),
        AttributeValue::L(list) => {
            let values: Result<Vec<JsonValue>, _> = list.iter().map(attribute_to_json).collect();
            Ok(JsonValue::Array(values?))
        }
        AttributeValue::M(map) => {
            let mut object = Map::new();
            for (key, value) in map {
                let json_value = attribute_to_json(value)
                    .map_err(|e| ConversionError::new(format!("{}: {}", key, e.reason)))?;
                object.insert(key.clone(), json_value);
            }
            Ok(JsonValue::Object(object))
        }
        AttributeValue::B(blob) => Ok(JsonValue::String(encode_base64(blob.as_ref()))),
        AttributeValue::Ss(set) => Ok(JsonValue::Array(
            set.iter().cloned().map(JsonValue::String).collect(),
        )),
        AttributeValue::Ns(set) => {
            let numbers: Result<Vec<JsonValue>, _> = set
                .iter()
                .map(|n| parse_number(n).map(JsonValue::Number))
                .collect();
            Ok(JsonValue::Array(numbers?))
        }
        AttributeValue::Bs(set) => Ok(JsonValue::Array(
            set.iter()
                .map(|blob| JsonValue::String(encode_base64(blob.as_ref())))
                .collect(),
        )),
        other => Err(ConversionError::new(format!(
            "unsupported attribute value {:?}",
            other
        ))),
    }
}

/// Convert a scanned record into a JSON object
///
/// On failure, returns the name of the top-level attribute that could not be
/// converted alongside the error.
pub fn item_to_json(raw: &RawItem) -> Result<Item, (String, ConversionError)> {
    let mut object = Map::new();

    for (name, value) in raw {
        let json_value = attribute_to_json(value).map_err(|e| (name.clone(), e))?;
        object.insert(name.clone(), json_value);
    }

    Ok(object)
}

/// Convert a JSON value to a DynamoDB attribute value
///
/// Strings become S, numbers N, booleans BOOL, null NULL, arrays L and
/// objects M. Every JSON value has an encoding, so this cannot fail.
pub fn json_to_attribute(value: &JsonValue) -> AttributeValue {
    match value {
        JsonValue::String(s) => AttributeValue::S(s.clone()),
        JsonValue::Number(n) => AttributeValue::N(n.to_string()),
        JsonValue::Bool(b) => AttributeValue::Bool(*b),
        JsonValue::Null => AttributeValue::Null(true),
        JsonValue::Array(values) => AttributeValue::L(values.iter().map(json_to_attribute).collect()),
        JsonValue::Object(object) => AttributeValue::M(
            object
                .iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

/// Convert an exported JSON object back into a writable record
pub fn json_to_item(item: &Item) -> RawItem {
    item.iter()
        .map(|(name, value)| (name.clone(), json_to_attribute(value)))
        .collect()
}

/// Numbers keep their decimal text exactly (serde_json `arbitrary_precision`),
/// so 38-digit values survive a round trip.
fn parse_number(n: &str) -> Result<Number, ConversionError> {
    serde_json::from_str::<Number>(n)
        .map_err(|_| ConversionError::new(format!("'{}' is not a valid number", n)))
}

fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
