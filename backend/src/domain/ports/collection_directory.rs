//! Port for reading the collection directory.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::collection::CollectionSummary;
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by collection directory adapters.
    pub enum CollectionDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "collection directory connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "collection directory query failed: {message}",
    }
}

/// Port for resolving default collections and listing the directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionDirectory: Send + Sync {
    /// The user's default collection: the earliest one they created.
    ///
    /// Returns `None` for users who own no collection at all; catalogue
    /// reads treat that as an empty shelf, not an error.
    async fn default_collection_for(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Uuid>, CollectionDirectoryError>;

    /// Collections owned by one user, ordered by creation time ascending so
    /// the first entry is the caller's default scope.
    async fn list_for_owner(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionSummary>, CollectionDirectoryError>;

    /// Every collection with its owner's username, ordered by name.
    async fn list_all(&self) -> Result<Vec<CollectionSummary>, CollectionDirectoryError>;
}

/// Fixture implementation for tests that do not exercise the directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCollectionDirectory;

#[async_trait]
impl CollectionDirectory for FixtureCollectionDirectory {
    async fn default_collection_for(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<Uuid>, CollectionDirectoryError> {
        Ok(None)
    }

    async fn list_for_owner(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<CollectionSummary>, CollectionDirectoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<CollectionSummary>, CollectionDirectoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_default_collection_is_none() {
        let directory = FixtureCollectionDirectory;
        let found = directory
            .default_collection_for(&UserId::random())
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_listings_are_empty() {
        let directory = FixtureCollectionDirectory;
        assert!(
            directory
                .list_all()
                .await
                .expect("fixture list succeeds")
                .is_empty()
        );
        assert!(
            directory
                .list_for_owner(&UserId::random())
                .await
                .expect("fixture list succeeds")
                .is_empty()
        );
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = CollectionDirectoryError::connection("pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
    }
}
