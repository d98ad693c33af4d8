//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Read-side structs select only the columns
//! an adapter consumes; conversion into domain types happens in the adapter
//! that owns the query, revalidating through domain constructors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{books, collections, users};

/// Row struct for credential reads from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
}

/// Insertable struct for creating new collection records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = collections)]
pub(crate) struct NewCollectionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
}

/// Row struct for directory listings: a collection joined with its owner's
/// username. Field order matches the explicit select in the directory
/// adapter.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct CollectionListingRow {
    pub id: Uuid,
    pub name: String,
    pub owner_username: String,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    pub added_at: DateTime<Utc>,
    pub reviews: serde_json::Value,
}

/// Insertable struct for creating book records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub title: &'a str,
    pub author: &'a str,
    pub isbn: &'a str,
    pub category: &'a str,
    pub added_at: DateTime<Utc>,
    pub reviews: &'a serde_json::Value,
}

/// Changeset struct for replacing a book's attributes.
///
/// `collection_id` is optional so an omitted value leaves the book in its
/// current collection rather than moving it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = books)]
pub(crate) struct BookUpdate<'a> {
    pub collection_id: Option<Uuid>,
    pub title: &'a str,
    pub author: &'a str,
    pub isbn: &'a str,
    pub category: &'a str,
}
