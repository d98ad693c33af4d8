//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving the
//! authenticated user. The whole principal (id, username, admin flag) lives
//! in the cookie, so authorisation checks never touch the database.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};

pub(crate) const USER_KEY: &str = "user";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user in the session cookie.
    ///
    /// The session key is cycled first so a login never continues an
    /// existing anonymous session.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_KEY, user)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user from the session, if present.
    ///
    /// A cookie that fails validation is treated as no session at all; the
    /// caller then sees the usual 401 rather than a server error.
    pub fn user(&self) -> Option<User> {
        match self.0.get::<User>(USER_KEY) {
            Ok(user) => user,
            Err(error) => {
                tracing::warn!("invalid user in session cookie: {error}");
                None
            }
        }
    }

    /// Require an authenticated user or return `401 Unauthorized`.
    pub fn require_user(&self) -> Result<User, Error> {
        self.user().ok_or_else(|| Error::unauthorized("Unauthorized"))
    }

    /// Require an authenticated admin or return `401`/`403`.
    pub fn require_admin(&self) -> Result<User, Error> {
        let user = self.require_user()?;
        if !user.is_admin() {
            return Err(Error::forbidden("Forbidden"));
        }

        Ok(user)
    }

    /// Destroy the session and instruct the browser to drop the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
