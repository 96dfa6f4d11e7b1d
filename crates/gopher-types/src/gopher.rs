//! Gopher types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A gopher as listed by the API.
///
/// `name`, `image` and `age` are optional: they default to empty/zero when
/// missing from the input and are left out of the output when empty/zero.
/// The timestamps are owned by the storage layer and never set by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gopher {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub age: i64,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Gopher {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        age: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            age,
            created_at: None,
            updated_at: None,
        }
    }

    /// Replace the caller-owned fields with the ones in `changes`.
    ///
    /// The id and the timestamps are left untouched.
    pub fn apply(&mut self, changes: &Gopher) {
        self.name = changes.name.clone();
        self.image = changes.image.clone();
        self.age = changes.age;
    }

    /// Compare the caller-owned fields only, ignoring storage timestamps.
    pub fn same_data(&self, other: &Gopher) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.image == other.image
            && self.age == other.age
    }
}

/// Ids reachable through `/gophers/{id}`: non-empty ASCII letters, digits
/// and underscores.
pub fn is_addressable_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_zero(age: &i64) -> bool {
    *age == 0
}
