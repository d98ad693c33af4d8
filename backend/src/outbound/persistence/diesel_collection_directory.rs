//! PostgreSQL-backed `CollectionDirectory` implementation using Diesel.
//!
//! Listings join collections with their owners so every summary carries the
//! owner's username; default-scope resolution orders by creation time with
//! the id as a tie break, which keeps the answer stable when two
//! collections share a timestamp.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::collection::{CollectionName, CollectionSummary};
use crate::domain::ports::{CollectionDirectory, CollectionDirectoryError};
use crate::domain::user::{UserId, Username};

use super::diesel_error_mapping::{diesel_error_into, pool_error_into};
use super::models::CollectionListingRow;
use super::pool::{DbPool, PoolError};
use super::schema::{collections, users};

/// Diesel-backed implementation of the collection directory port.
#[derive(Clone)]
pub struct DieselCollectionDirectory {
    pool: DbPool,
}

impl DieselCollectionDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to collection directory errors.
fn map_pool_error(error: PoolError) -> CollectionDirectoryError {
    pool_error_into(error, |message| {
        CollectionDirectoryError::connection(message)
    })
}

/// Map Diesel errors to collection directory errors.
fn map_diesel_error(error: diesel::result::Error) -> CollectionDirectoryError {
    diesel_error_into(
        error,
        |message| CollectionDirectoryError::query(message),
        |message| CollectionDirectoryError::connection(message),
    )
}

/// Convert a joined listing row into a validated summary.
fn row_to_summary(row: CollectionListingRow) -> Result<CollectionSummary, CollectionDirectoryError> {
    let CollectionListingRow {
        id,
        name,
        owner_username,
        created_at,
    } = row;

    let name = CollectionName::new(name).map_err(|err| {
        CollectionDirectoryError::query(format!("stored collection name invalid: {err}"))
    })?;
    let owner_username = Username::new(owner_username)
        .map_err(|err| CollectionDirectoryError::query(format!("stored username invalid: {err}")))?;

    Ok(CollectionSummary::new(id, name, owner_username, created_at))
}

#[async_trait]
impl CollectionDirectory for DieselCollectionDirectory {
    async fn default_collection_for(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Uuid>, CollectionDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        collections::table
            .filter(collections::user_id.eq(user_id.as_uuid()))
            .order((collections::created_at.asc(), collections::id.asc()))
            .select(collections::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn list_for_owner(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionSummary>, CollectionDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CollectionListingRow> = collections::table
            .inner_join(users::table)
            .filter(collections::user_id.eq(user_id.as_uuid()))
            .order((collections::created_at.asc(), collections::id.asc()))
            .select((
                collections::id,
                collections::name,
                users::username,
                collections::created_at,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_summary).collect()
    }

    async fn list_all(&self) -> Result<Vec<CollectionSummary>, CollectionDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CollectionListingRow> = collections::table
            .inner_join(users::table)
            .order((collections::name.asc(), collections::created_at.asc()))
            .select((
                collections::id,
                collections::name,
                users::username,
                collections::created_at,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_summary).collect()
    }
}
