use serde_json::Value as JsonValue;

use crate::php::{Key, Value};

/// Convert parsed JSON into a [`Value`] tree.
///
/// Objects keep the key order of the source document. Integers beyond `i64` become
/// floats, matching what PHP's `json_decode` does with them.
pub fn from_json(json: &JsonValue) -> Value {
	match json {
		JsonValue::Null => Value::Null,
		JsonValue::Bool(item) => Value::Bool(*item),
		JsonValue::Number(number) => match number.as_i64() {
			Some(item) => Value::Int(item),
			None => Value::F64(number.as_f64().unwrap_or(f64::NAN)),
		},
		JsonValue::String(item) => Value::from(item.as_str()),
		JsonValue::Array(items) => Value::List(items.iter().map(from_json).collect()),
		JsonValue::Object(map) => Value::Map(map.iter().map(|(key, item)| (Key::from(key.as_str()), from_json(item))).collect()),
	}
}

impl From<JsonValue> for Value {
	fn from(json: JsonValue) -> Self {
		from_json(&json)
	}
}
