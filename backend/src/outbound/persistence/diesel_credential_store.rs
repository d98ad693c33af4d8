//! PostgreSQL-backed `CredentialStore` implementation using Diesel.
//!
//! Account provisioning writes the user row and their default collection in
//! one transaction, so a registered user always owns a catalogue scope.
//! Reads rebuild domain values through their validating constructors, so a
//! row corrupted outside the application surfaces as a query error instead
//! of leaking into the domain.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::collection::CollectionName;
use crate::domain::ports::{
    CredentialStore, CredentialStoreError, ProvisionedAccount, StoredCredentials,
};
use crate::domain::user::{User, UserId, Username};

use super::diesel_error_mapping::{diesel_error_into, pool_error_into};
use super::models::{NewCollectionRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{collections, users};

/// Name of the collection provisioned for the seeded administrator.
const ADMIN_COLLECTION_NAME: &str = "Admin Collection";

/// Diesel-backed implementation of the credential store port.
#[derive(Clone)]
pub struct DieselCredentialStore {
    pool: DbPool,
}

impl DieselCredentialStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to credential store errors.
fn map_pool_error(error: PoolError) -> CredentialStoreError {
    pool_error_into(error, |message| CredentialStoreError::connection(message))
}

/// Map Diesel errors to credential store errors.
fn map_diesel_error(error: diesel::result::Error) -> CredentialStoreError {
    diesel_error_into(
        error,
        |message| CredentialStoreError::query(message),
        |message| CredentialStoreError::connection(message),
    )
}

/// Map failures of the provisioning transaction.
///
/// The only unique constraint a fresh account can trip is the username
/// index, so a unique violation here always means the name is taken.
fn map_account_insert_error(error: diesel::result::Error) -> CredentialStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return CredentialStoreError::username_taken();
    }
    map_diesel_error(error)
}

/// Convert a stored row into credentials, revalidating the username.
fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, CredentialStoreError> {
    let UserRow {
        id,
        username,
        password_hash,
        is_admin,
    } = row;

    let username = Username::new(username)
        .map_err(|err| CredentialStoreError::query(format!("stored username invalid: {err}")))?;

    Ok(StoredCredentials {
        user: User::new(UserId::from_uuid(id), username, is_admin),
        password_hash,
    })
}

#[async_trait]
impl CredentialStore for DieselCredentialStore {
    async fn create_account(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<ProvisionedAccount, CredentialStoreError> {
        let default_name = CollectionName::default_for_new_user();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let user_id = Uuid::new_v4();
        let collection_id = Uuid::new_v4();

        let new_user = NewUserRow {
            id: user_id,
            username: username.as_ref(),
            password_hash,
            is_admin: false,
        };
        let new_collection = NewCollectionRow {
            id: collection_id,
            user_id,
            name: default_name.as_ref(),
        };

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&new_user)
                    .execute(conn)
                    .await?;

                diesel::insert_into(collections::table)
                    .values(&new_collection)
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_account_insert_error)?;

        Ok(ProvisionedAccount {
            user: User::new(UserId::from_uuid(user_id), username.clone(), false),
            default_collection_id: collection_id,
        })
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_credentials).transpose()
    }

    async fn ensure_admin(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<ProvisionedAccount, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_user = NewUserRow {
            id: Uuid::new_v4(),
            username: username.as_ref(),
            password_hash,
            is_admin: true,
        };
        let fresh_collection_id = Uuid::new_v4();

        let (user_id, default_collection_id) = conn
            .transaction(|conn| {
                async move {
                    let user_id: Uuid = diesel::insert_into(users::table)
                        .values(&new_user)
                        .on_conflict(users::username)
                        .do_update()
                        .set((
                            users::password_hash.eq(excluded(users::password_hash)),
                            users::is_admin.eq(true),
                        ))
                        .returning(users::id)
                        .get_result(conn)
                        .await?;

                    // The earliest collection doubles as the default scope.
                    let earliest: Option<Uuid> = collections::table
                        .filter(collections::user_id.eq(user_id))
                        .order((collections::created_at.asc(), collections::id.asc()))
                        .select(collections::id)
                        .first(conn)
                        .await
                        .optional()?;

                    let default_collection_id = match earliest {
                        Some(id) => id,
                        None => {
                            let new_collection = NewCollectionRow {
                                id: fresh_collection_id,
                                user_id,
                                name: ADMIN_COLLECTION_NAME,
                            };
                            diesel::insert_into(collections::table)
                                .values(&new_collection)
                                .execute(conn)
                                .await?;
                            fresh_collection_id
                        }
                    };

                    Ok((user_id, default_collection_id))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(ProvisionedAccount {
            user: User::new(UserId::from_uuid(user_id), username.clone(), true),
            default_collection_id,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion.

    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn stored_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: "shelf_admin".to_owned(),
            password_hash: "$2b$10$N9qo8uLOickgx2ZMRZoMye".to_owned(),
            is_admin: true,
        }
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(mapped, CredentialStoreError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[rstest]
    fn unique_violations_surface_as_username_taken() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint \"users_username_key\"".to_owned()),
        );

        assert_eq!(
            map_account_insert_error(error),
            CredentialStoreError::username_taken()
        );
    }

    #[rstest]
    fn other_provisioning_failures_stay_query_errors() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new("violates check constraint".to_owned()),
        );

        assert!(matches!(
            map_account_insert_error(error),
            CredentialStoreError::Query { .. }
        ));
    }

    #[rstest]
    fn row_conversion_rebuilds_the_stored_user(stored_row: UserRow) {
        let expected_hash = stored_row.password_hash.clone();

        let credentials = row_to_credentials(stored_row).expect("valid row converts");

        assert_eq!(credentials.user.username().as_ref(), "shelf_admin");
        assert!(credentials.user.is_admin());
        assert_eq!(credentials.password_hash, expected_hash);
    }

    #[rstest]
    fn row_conversion_rejects_corrupt_usernames(mut stored_row: UserRow) {
        stored_row.username = "x".to_owned();

        let error = row_to_credentials(stored_row).expect_err("short username fails");

        assert!(matches!(error, CredentialStoreError::Query { .. }));
        assert!(error.to_string().contains("stored username invalid"));
    }
}
