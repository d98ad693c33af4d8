//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. This makes HTTP handler tests deterministic because they
//! can substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::auth::LoginCredentials;
use crate::domain::error::Error;
use crate::domain::user::User;

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

/// Temporary in-memory authenticator used until persistence is wired.
///
/// This mirrors the seeded development account: `admin` / `password123`
/// authenticates successfully and produces a fixed admin user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        if credentials.username() == "admin" && credentials.password() == "password123" {
            User::try_from_parts("123e4567-e89b-12d3-a456-426614174000", "admin", true)
                .map_err(|err| Error::internal(format!("invalid fixture user: {err}")))
        } else {
            Err(Error::unauthorized("Invalid credentials"))
        }
    }
}
