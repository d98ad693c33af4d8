//! Collection data model.
//!
//! Every user owns at least one collection; the one created at registration
//! is named [`DEFAULT_COLLECTION_NAME`] and, being the earliest created,
//! doubles as the default catalogue scope for non-admin callers.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::user::{UserId, Username};

/// Name given to the collection created automatically at registration.
pub const DEFAULT_COLLECTION_NAME: &str = "My Collection";

/// Maximum allowed length for a collection name.
pub const COLLECTION_NAME_MAX: usize = 100;

/// Validation errors returned by [`CollectionName::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionValidationError {
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for CollectionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "collection name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "collection name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CollectionValidationError {}

/// Display name of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionName(String);

impl CollectionName {
    /// Validate and construct a [`CollectionName`], trimming surrounding
    /// whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, CollectionValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CollectionValidationError::EmptyName);
        }
        if trimmed.chars().count() > COLLECTION_NAME_MAX {
            return Err(CollectionValidationError::NameTooLong {
                max: COLLECTION_NAME_MAX,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Name of the automatically created registration collection.
    #[must_use]
    pub fn default_for_new_user() -> Self {
        Self(DEFAULT_COLLECTION_NAME.to_owned())
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CollectionName> for String {
    fn from(value: CollectionName) -> Self {
        value.0
    }
}

/// A user's book collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    id: Uuid,
    owner_id: UserId,
    name: CollectionName,
    created_at: DateTime<Utc>,
}

impl Collection {
    /// Build a [`Collection`] from validated components.
    #[must_use]
    pub fn new(id: Uuid, owner_id: UserId, name: CollectionName, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            name,
            created_at,
        }
    }

    /// Stable collection identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// User who owns this collection.
    #[must_use]
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Display name of the collection.
    #[must_use]
    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    /// When the collection was created; the earliest collection per user is
    /// the default catalogue scope.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Collection joined with its owner's username, as returned by listings.
///
/// Caller-scoped listings surface the creation time (the earliest entry is
/// the caller's default scope); admin listings surface the owner so a target
/// collection can be picked when managing books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    id: Uuid,
    name: CollectionName,
    owner_username: Username,
    created_at: DateTime<Utc>,
}

impl CollectionSummary {
    /// Build a [`CollectionSummary`] from validated components.
    #[must_use]
    pub fn new(
        id: Uuid,
        name: CollectionName,
        owner_username: Username,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            owner_username,
            created_at,
        }
    }

    /// Stable collection identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name of the collection.
    #[must_use]
    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    /// Username of the owning user.
    #[must_use]
    pub fn owner_username(&self) -> &Username {
        &self.owner_username
    }

    /// When the collection was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
