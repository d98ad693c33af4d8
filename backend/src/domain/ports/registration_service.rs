//! Driving port for the account registration use-case.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! create accounts without knowing (or importing) the backing
//! infrastructure. This makes HTTP handler tests deterministic because they
//! can substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::auth::RegistrationRequest;
use crate::domain::error::Error;
use crate::domain::user::{User, UserId};

/// Domain use-case port for registration.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account and its default collection, returning the new user.
    async fn register(&self, request: &RegistrationRequest) -> Result<User, Error>;
}

/// Temporary in-memory registrar used until persistence is wired.
///
/// Accepts every valid request and mints a fresh user id; nothing is stored,
/// so duplicate usernames are never reported.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRegistrationService;

#[async_trait]
impl RegistrationService for FixtureRegistrationService {
    async fn register(&self, request: &RegistrationRequest) -> Result<User, Error> {
        Ok(User::new(
            UserId::random(),
            request.username().clone(),
            false,
        ))
    }
}
