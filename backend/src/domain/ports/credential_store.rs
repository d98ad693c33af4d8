//! Port for account storage and credential lookups.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::{User, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential store adapters.
    pub enum CredentialStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "credential store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "credential store query failed: {message}",
        /// The requested username is already registered.
        UsernameTaken =>
            "username already exists",
    }
}

/// A freshly provisioned account together with its default collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAccount {
    /// The stored user.
    pub user: User,
    /// The collection new books and catalogue reads default to.
    pub default_collection_id: Uuid,
}

/// A stored user joined with the password hash to verify against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// The stored user.
    pub user: User,
    /// Password hash recorded at registration.
    pub password_hash: String,
}

/// Port for creating accounts and fetching login credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create a user and their default collection in one transaction.
    ///
    /// Fails with [`CredentialStoreError::UsernameTaken`] when the username
    /// is already registered.
    async fn create_account(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<ProvisionedAccount, CredentialStoreError>;

    /// Look up a user and their password hash by username.
    ///
    /// Takes the raw login input rather than a validated [`Username`] so
    /// accounts created under older naming rules can still be found.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, CredentialStoreError>;

    /// Create or refresh the administrator account used for seeding.
    ///
    /// Upserts the user (replacing the stored password hash), makes sure an
    /// admin collection exists, and reports the earliest collection as the
    /// default.
    async fn ensure_admin(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<ProvisionedAccount, CredentialStoreError>;
}

/// Fixture implementation for tests that do not exercise account storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCredentialStore;

#[async_trait]
impl CredentialStore for FixtureCredentialStore {
    async fn create_account(
        &self,
        username: &Username,
        _password_hash: &str,
    ) -> Result<ProvisionedAccount, CredentialStoreError> {
        Ok(ProvisionedAccount {
            user: User::new(crate::domain::user::UserId::random(), username.clone(), false),
            default_collection_id: Uuid::new_v4(),
        })
    }

    async fn find_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<StoredCredentials>, CredentialStoreError> {
        Ok(None)
    }

    async fn ensure_admin(
        &self,
        username: &Username,
        _password_hash: &str,
    ) -> Result<ProvisionedAccount, CredentialStoreError> {
        Ok(ProvisionedAccount {
            user: User::new(crate::domain::user::UserId::random(), username.clone(), true),
            default_collection_id: Uuid::new_v4(),
        })
    }
}
