//! Quest categories and the pool new quests draw from.

use super::QuestDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categories the classification collaborator recognises.
pub const STANDARD_CATEGORIES: [&str; 8] = [
    "Recycling Activity",
    "Litter Pickup",
    "Using Public Transit",
    "Environmental Care",
    "Self-Care Activity",
    "Helping Others (General)",
    "Community Involvement",
    "Creativity and Learning",
];

/// The kind of deed a quest asks for.
///
/// Any non-empty label is accepted; membership in [`STANDARD_CATEGORIES`] is
/// a caller policy checked through [`QuestCategory::is_standard`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestCategory(String);

impl QuestCategory {
    /// Creates a category label.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::EmptyIdentifier`] when the label is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, QuestDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(QuestDomainError::EmptyIdentifier("target category"));
        }
        Ok(Self(raw))
    }

    /// Returns the label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the label is one of [`STANDARD_CATEGORIES`].
    #[must_use]
    pub fn is_standard(&self) -> bool {
        STANDARD_CATEGORIES.contains(&self.0.as_str())
    }
}

impl AsRef<str> for QuestCategory {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for QuestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty set of categories a continuation quest may be drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPool(Vec<QuestCategory>);

impl CategoryPool {
    /// Builds a pool, dropping duplicate labels while keeping order.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::EmptyCategoryPool`] when no categories are
    /// supplied.
    pub fn new(categories: impl IntoIterator<Item = QuestCategory>) -> Result<Self, QuestDomainError> {
        let mut unique: Vec<QuestCategory> = Vec::new();
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        if unique.is_empty() {
            return Err(QuestDomainError::EmptyCategoryPool);
        }
        Ok(Self(unique))
    }

    /// Returns the pool of [`STANDARD_CATEGORIES`].
    #[must_use]
    pub fn standard() -> Self {
        Self(
            STANDARD_CATEGORIES
                .iter()
                .map(|label| QuestCategory((*label).to_owned()))
                .collect(),
        )
    }

    /// Returns the categories in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[QuestCategory] {
        &self.0
    }

    /// Returns the number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; pools are non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CategoryPool {
    fn default() -> Self {
        Self::standard()
    }
}
