//! Driving port for listing collections.

use async_trait::async_trait;

use crate::domain::collection::CollectionSummary;
use crate::domain::error::Error;
use crate::domain::user::User;

/// Domain use-case port for reading the collection directory.
#[async_trait]
pub trait CollectionsQuery: Send + Sync {
    /// Collections visible to the caller.
    ///
    /// Admins asking for `all_collections` see the whole directory with
    /// owner usernames; everyone else gets their own collections, earliest
    /// first. The flag is ignored for non-admin callers, mirroring how
    /// catalogue scope parameters are handled.
    async fn list(
        &self,
        caller: &User,
        all_collections: bool,
    ) -> Result<Vec<CollectionSummary>, Error>;
}

/// Temporary in-memory directory used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCollectionsQuery;

#[async_trait]
impl CollectionsQuery for FixtureCollectionsQuery {
    async fn list(
        &self,
        _caller: &User,
        _all_collections: bool,
    ) -> Result<Vec<CollectionSummary>, Error> {
        Ok(Vec::new())
    }
}
