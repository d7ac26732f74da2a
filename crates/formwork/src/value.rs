use core::fmt::Display;

use crate::prelude_internal::*;

/// A value read off a bound object.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(BigInt),
    Float(f64),
    Text(String),
    Array(Vec<Value>),
    /// A nested bound object, e.g. the target of an association
    Object(Rc<dyn Bindable>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null, whitespace-only text, or an empty array.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(text) => text.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Bool(_) | Value::Integer(_) | Value::Float(_) | Value::Object(_) => false,
        }
    }

    pub fn as_object(&self) -> Option<&Rc<dyn Bindable>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The value as a list: arrays as-is, null as empty, anything else as a
    /// single element.
    pub fn to_array(&self) -> Vec<Value> {
        match self {
            Value::Null => Vec::new(),
            Value::Array(items) => items.clone(),
            other => vec![other.clone()],
        }
    }

    /// The string form used in DOM attributes and submitted params.
    ///
    /// Arrays join their elements with `/`; objects use their own
    /// [`Bindable::to_param`].
    pub fn to_param(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(value) => Some(value.to_string()),
            Value::Integer(value) => Some(value.to_string()),
            Value::Float(value) => Some(value.to_string()),
            Value::Text(text) => Some(text.clone()),
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::to_param)
                    .collect::<Vec<_>>()
                    .join("/"),
            ),
            Value::Object(object) => object.to_param(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Rc<dyn Bindable>> for Value {
    fn from(value: Rc<dyn Bindable>) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A numeric bound such as `min`, `max` or a validator threshold.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(BigInt),
    Float(f64),
}

impl Number {
    /// The smallest integer step above this number (`> n` becomes `n + 1`).
    pub fn succ(&self) -> Number {
        match self {
            Number::Integer(value) => Number::Integer(value + BigInt::from(1)),
            Number::Float(value) => Number::Float(value + 1.0),
        }
    }

    pub fn pred(&self) -> Number {
        match self {
            Number::Integer(value) => Number::Integer(value - BigInt::from(1)),
            Number::Float(value) => Number::Float(value - 1.0),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{value}"),
            Number::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value.into())
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value.into())
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// The `step` attribute of a numeric input.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Any,
    By(Number),
}

impl Display for Step {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Step::Any => write!(f, "any"),
            Step::By(number) => write!(f, "{number}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_param() {
        assert_eq!(Value::Null.to_param(), None);
        assert_eq!(Value::from(42).to_param(), Some("42".to_string()));
        assert_eq!(Value::from(true).to_param(), Some("true".to_string()));
        assert_eq!(
            Value::Array(vec![Value::from("a"), Value::Null, Value::from(2)]).to_param(),
            Some("a/2".to_string())
        );
    }

    #[test]
    fn test_blank() {
        assert!(Value::text(" \t").is_blank());
        assert!(Value::Array(vec![]).is_blank());
        assert!(!Value::from(false).is_blank());
        assert!(!Value::from(0).is_blank());
    }

    #[test]
    fn test_to_array() {
        assert_eq!(Value::Null.to_array(), vec![]);
        assert_eq!(Value::from("a").to_array(), vec![Value::from("a")]);
    }

    #[test]
    fn test_number_neighbours() {
        assert_eq!(Number::from(5).succ(), Number::from(6));
        assert_eq!(Number::from(10).pred(), Number::from(9));
        assert_eq!(Number::from(1.5).succ(), Number::from(2.5));
        assert_eq!(Step::By(Number::from(0.01)).to_string(), "0.01");
        assert_eq!(Step::Any.to_string(), "any");
    }
}
