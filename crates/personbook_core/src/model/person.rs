//! Person document model.
//!
//! # Responsibility
//! - Define the document shape persisted in the `people` collection.
//! - Validate creation input before it reaches storage.
//!
//! # Invariants
//! - `id` is assigned once by the repository and never rewritten.
//! - `favorite_foods` keeps insertion order.
//! - `name` must not be empty. Whitespace-only names are accepted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Storage-assigned identifier of a person document.
pub type PersonId = Uuid;

/// Validation errors for person documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonValidationError {
    /// `name` is missing or empty.
    MissingName,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "person name is required"),
        }
    }
}

impl Error for PersonValidationError {}

/// Attribute set used to create a person document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub name: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl NewPerson {
    /// Creates input with only the required `name` set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: None,
            favorite_foods: Vec::new(),
        }
    }

    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_foods<I, S>(mut self, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the creation invariants.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        validate_name(&self.name)
    }
}

/// Persisted person document.
///
/// Serialized with document-style field names (`_id`, `favoriteFoods`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "_id")]
    id: PersonId,
    pub name: String,
    pub age: Option<i64>,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl Person {
    /// Binds creation input to a storage-assigned id.
    pub(crate) fn from_new(id: PersonId, input: NewPerson) -> Self {
        Self {
            id,
            name: input.name,
            age: input.age,
            favorite_foods: input.favorite_foods,
        }
    }

    pub(crate) fn from_parts(
        id: PersonId,
        name: String,
        age: Option<i64>,
        favorite_foods: Vec<String>,
    ) -> Self {
        Self {
            id,
            name,
            age,
            favorite_foods,
        }
    }

    /// Returns the stable id assigned on creation.
    pub fn id(&self) -> PersonId {
        self.id
    }

    /// Appends one food, keeping existing order.
    pub fn add_favorite_food(&mut self, food: impl Into<String>) {
        self.favorite_foods.push(food.into());
    }

    /// Checks the invariants that must hold on every save.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        validate_name(&self.name)
    }
}

/// Person projection without `age`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    #[serde(rename = "_id")]
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl From<Person> for PersonSummary {
    fn from(value: Person) -> Self {
        Self {
            id: value.id,
            name: value.name,
            favorite_foods: value.favorite_foods,
        }
    }
}

/// Outcome of a multi-document delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub deleted_count: u64,
}

fn validate_name(name: &str) -> Result<(), PersonValidationError> {
    if name.is_empty() {
        return Err(PersonValidationError::MissingName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewPerson, Person, PersonSummary, PersonValidationError};
    use uuid::Uuid;

    #[test]
    fn only_empty_name_is_rejected() {
        assert_eq!(
            NewPerson::new("").validate(),
            Err(PersonValidationError::MissingName)
        );
        assert!(NewPerson::new("   ").validate().is_ok());
        assert!(NewPerson::new("Ada").validate().is_ok());
    }

    #[test]
    fn summary_drops_age() {
        let id = Uuid::new_v4();
        let person = Person::from_new(
            id,
            NewPerson::new("Ada").with_age(36).with_foods(["tea"]),
        );
        let summary = PersonSummary::from(person);
        assert_eq!(summary.id, id);
        assert_eq!(summary.favorite_foods, vec!["tea".to_string()]);
    }
}
