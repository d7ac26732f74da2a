use core::str::FromStr;

use formwork::{Bindable, Value};
use serde_json::{Map, Value as JsonValue};

use crate::convert::json_to_value;
use crate::error::Error;

/// A JSON object exposed as a bound object.
///
/// Attributes are the object's members. An `id` member is the primary key,
/// and a non-null `id` marks the object as persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    map: Map<String, JsonValue>,
}

impl JsonObject {
    pub fn new(map: Map<String, JsonValue>) -> Self {
        Self { map }
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.map
    }

    fn id(&self) -> Option<&JsonValue> {
        self.map.get("id")
    }
}

impl TryFrom<JsonValue> for JsonObject {
    type Error = Error;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Object(map) => Ok(Self::new(map)),
            other => Err(Error::NotAnObject(other.to_string())),
        }
    }
}

impl FromStr for JsonObject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str::<JsonValue>(s)?.try_into()
    }
}

impl Bindable for JsonObject {
    fn read_attribute(&self, key: &str) -> Option<Value> {
        self.map.get(key).map(json_to_value)
    }

    fn is_persisted(&self) -> Option<bool> {
        self.id().map(|id| !id.is_null())
    }

    fn primary_key(&self) -> Option<Value> {
        self.id().map(json_to_value)
    }

    fn to_param(&self) -> Option<String> {
        self.id().and_then(|id| json_to_value(id).to_param())
    }

    fn to_label(&self) -> Option<String> {
        ["name", "title", "label"]
            .iter()
            .find_map(|key| self.map.get(*key)?.as_str().map(str::to_string))
    }
}
