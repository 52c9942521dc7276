use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Identifier of a todo, normalized to its canonical text form.
///
/// Remote sources hand out numeric ids while form posts carry text, so both
/// are folded into one representation before they reach any comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical id for an arbitrary JSON value; missing or null ids map to "".
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::default(),
            Some(Value::String(s)) => Self(s.clone()),
            Some(other) => Self(other.to_string()),
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl<'de> de::Visitor<'de> for IdVisitor {
            type Value = TodoId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or numeric todo id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TodoId, E> {
                Ok(TodoId(v.to_string()))
            }
            fn visit_string<E: de::Error>(self, v: String) -> Result<TodoId, E> {
                Ok(TodoId(v))
            }
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TodoId, E> {
                Ok(TodoId(v.to_string()))
            }
            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TodoId, E> {
                Ok(TodoId(v.to_string()))
            }
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<TodoId, E> {
                Ok(TodoId::from_json(
                    serde_json::Number::from_f64(v).map(Value::Number).as_ref(),
                ))
            }
            fn visit_unit<E: de::Error>(self) -> Result<TodoId, E> {
                Ok(TodoId::default())
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
}
impl Todo {
    pub fn new(id: impl Into<TodoId>, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed,
        }
    }

    /// Project a remote record down to the fields kept in storage.
    ///
    /// Missing titles become empty text and `completed` follows JSON
    /// truthiness, so partially-filled records still project cleanly.
    pub fn project(record: &Value) -> Self {
        let title = match record.get("title") {
            Some(Value::String(s)) => s.clone(),
            Some(v) if truthy(v) => v.to_string(),
            _ => String::new(),
        };
        Self {
            id: TodoId::from_json(record.get("id")),
            title,
            completed: record.get("completed").is_some_and(truthy),
        }
    }
}

/// Truthiness of a JSON value: null, false, 0, NaN and "" are falsy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
