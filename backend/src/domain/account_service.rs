//! Account domain services.
//!
//! Implements the registration and login driving ports over a credential
//! store, keeping password hashing on the blocking pool so bcrypt work never
//! stalls the async executor.

use std::sync::Arc;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::auth::{LoginCredentials, RegistrationRequest};
use crate::domain::error::Error;
use crate::domain::ports::{
    CredentialStore, CredentialStoreError, LoginService, ProvisionedAccount, RegistrationService,
};
use crate::domain::user::{User, Username};

/// Work factor applied to new password hashes.
///
/// Matches the factor existing rows were hashed with, so login verification
/// and freshly registered accounts agree.
const BCRYPT_COST: u32 = 10;

/// Message returned for both unknown usernames and wrong passwords, so the
/// response does not reveal which half failed.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn map_store_error(error: CredentialStoreError) -> Error {
    match error {
        CredentialStoreError::Connection { message } => {
            Error::service_unavailable(format!("credential store unavailable: {message}"))
        }
        CredentialStoreError::Query { message } => {
            Error::internal(format!("credential store error: {message}"))
        }
        CredentialStoreError::UsernameTaken => Error::conflict("Username already exists"),
    }
}

async fn hash_password(password: &str) -> Result<String, Error> {
    let password = Zeroizing::new(password.to_owned());
    tokio::task::spawn_blocking(move || bcrypt::hash(password.as_str(), BCRYPT_COST))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, Error> {
    let password = Zeroizing::new(password.to_owned());
    let password_hash = password_hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password.as_str(), &password_hash))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password verification failed: {err}")))
}

/// Account service implementing the registration and login driving ports.
#[derive(Clone)]
pub struct AccountService<S> {
    credential_store: Arc<S>,
}

impl<S> AccountService<S> {
    /// Create a new account service over the credential store.
    pub fn new(credential_store: Arc<S>) -> Self {
        Self { credential_store }
    }
}

impl<S> AccountService<S>
where
    S: CredentialStore,
{
    /// Create or refresh the seeded administrator account.
    ///
    /// Used at startup when sample data is enabled; hashes the configured
    /// password and upserts the account with its admin collection.
    pub async fn ensure_admin(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<ProvisionedAccount, Error> {
        let password_hash = hash_password(password).await?;
        self.credential_store
            .ensure_admin(username, &password_hash)
            .await
            .map_err(map_store_error)
    }
}

#[async_trait]
impl<S> RegistrationService for AccountService<S>
where
    S: CredentialStore,
{
    async fn register(&self, request: &RegistrationRequest) -> Result<User, Error> {
        let password_hash = hash_password(request.password()).await?;
        let account = self
            .credential_store
            .create_account(request.username(), &password_hash)
            .await
            .map_err(map_store_error)?;

        Ok(account.user)
    }
}

#[async_trait]
impl<S> LoginService for AccountService<S>
where
    S: CredentialStore,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .credential_store
            .find_by_username(credentials.username())
            .await
            .map_err(map_store_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(credentials.password(), &stored.password_hash).await? {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        Ok(stored.user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
