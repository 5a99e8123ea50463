//! Common types and data structures

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of a content record.
///
/// The service stores records under a MongoDB ObjectId whose JSON shape
/// depends on the mapper in front of it: a bare hex string, an extended-JSON
/// `{"$oid": ".."}` wrapper, a number, or a bean-style object. All of them
/// collapse into one display string here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ContentId(String);

impl ContentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is a 24-digit hex ObjectId the by-id endpoint accepts.
    pub fn is_object_id(&self) -> bool {
        self.0.len() == 24 && self.0.chars().all(|c| c.is_ascii_hexdigit())
    }

    fn from_value(value: &Value) -> Self {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Null => String::new(),
            Value::Object(map) => match map.get("$oid").and_then(Value::as_str) {
                Some(hex) => hex.to_string(),
                None => value.to_string(),
            },
            other => other.to_string(),
        };
        Self(text)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Content record as returned by the service
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub id: ContentId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(rename = "photoURL", default, deserialize_with = "blank_as_none")]
    pub photo_url: Option<String>,

    // Carried but never rendered
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub release_date: Option<Value>,
    #[serde(default)]
    pub age_rating: Option<String>,
    #[serde(default)]
    pub score_rating: Option<i64>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Content {
    pub fn has_photo(&self) -> bool {
        self.photo_url.is_some()
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let url = Option::<String>::deserialize(deserializer)?;
    Ok(url.filter(|u| !u.trim().is_empty()))
}

#[cfg(test)]
impl Content {
    pub fn sample(id: &str, title: &str, description: &str, photo: Option<&str>) -> Self {
        Self {
            id: ContentId::from(id),
            title: title.to_string(),
            description: description.to_string(),
            photo_url: photo.map(str::to_string),
            genre: None,
            status: None,
            release_date: None,
            age_rating: None,
            score_rating: None,
            kind: None,
            extra: Map::new(),
        }
    }
}
