use std::rc::Rc;

use formwork::{ParamMap, Params, Value};
use num_bigint::BigInt;
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::Error;
use crate::object::JsonObject;

/// Converts JSON into a parameter tree the way a request parser would see it:
/// scalars become text and `null` stays null.
pub fn json_to_params(json: &JsonValue) -> Params {
    match json {
        JsonValue::Null => Params::Null,
        JsonValue::Bool(b) => Params::text(b.to_string()),
        JsonValue::Number(n) => Params::text(n.to_string()),
        JsonValue::String(s) => Params::text(s.as_str()),
        JsonValue::Array(items) => Params::Array(items.iter().map(json_to_params).collect()),
        JsonValue::Object(map) => Params::Map(
            map.iter()
                .map(|(key, value)| (key.clone(), json_to_params(value)))
                .collect::<ParamMap>(),
        ),
    }
}

pub fn params_to_json(params: &Params) -> JsonValue {
    match params {
        Params::Null => JsonValue::Null,
        Params::Text(text) => JsonValue::String(text.clone()),
        Params::Array(items) => JsonValue::Array(items.iter().map(params_to_json).collect()),
        Params::Map(map) => JsonValue::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), params_to_json(value)))
                .collect::<Map<_, _>>(),
        ),
    }
}

/// Converts JSON into a bound value. Objects become nested [`JsonObject`]s.
pub fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(BigInt::from(i))
            } else if let Some(u) = n.as_u64() {
                Value::Integer(BigInt::from(u))
            } else {
                n.as_f64().map_or(Value::Null, Value::Float)
            }
        }
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Array(items) => Value::Array(items.iter().map(json_to_value).collect()),
        JsonValue::Object(map) => Value::Object(Rc::new(JsonObject::new(map.clone()))),
    }
}

pub fn value_to_json(value: &Value) -> Result<JsonValue, Error> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Integer(i) => {
            if let Ok(i) = i64::try_from(i) {
                Ok(JsonValue::from(i))
            } else if let Ok(u) = u64::try_from(i) {
                Ok(JsonValue::from(u))
            } else {
                Err(Error::InvalidNumber(format!("integer {i} is out of range")))
            }
        }
        Value::Float(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .ok_or_else(|| Error::InvalidNumber(format!("F64 value {f} is not finite"))),
        Value::Text(s) => Ok(JsonValue::String(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(value_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        Value::Object(object) => Err(Error::UnsupportedValue(format!("bound object {object:?}"))),
    }
}
