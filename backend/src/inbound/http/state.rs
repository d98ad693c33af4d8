//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BooksCommand, BooksQuery, CollectionsQuery, LoginService, RegistrationService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub books: Arc<dyn BooksQuery>,
    pub books_command: Arc<dyn BooksCommand>,
    pub collections: Arc<dyn CollectionsQuery>,
}

impl HttpState {
    /// Construct state from port implementations.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureBooksCommand, FixtureBooksQuery, FixtureCollectionsQuery,
    ///     FixtureLoginService, FixtureRegistrationService,
    /// };
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureRegistrationService),
    ///     Arc::new(FixtureLoginService),
    ///     Arc::new(FixtureBooksQuery),
    ///     Arc::new(FixtureBooksCommand),
    ///     Arc::new(FixtureCollectionsQuery),
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        registration: Arc<dyn RegistrationService>,
        login: Arc<dyn LoginService>,
        books: Arc<dyn BooksQuery>,
        books_command: Arc<dyn BooksCommand>,
        collections: Arc<dyn CollectionsQuery>,
    ) -> Self {
        Self {
            registration,
            login,
            books,
            books_command,
            collections,
        }
    }

    /// State backed entirely by fixture ports, for tests and examples.
    #[must_use]
    pub fn fixture() -> Self {
        use crate::domain::ports::{
            FixtureBooksCommand, FixtureBooksQuery, FixtureCollectionsQuery, FixtureLoginService,
            FixtureRegistrationService,
        };

        Self::new(
            Arc::new(FixtureRegistrationService),
            Arc::new(FixtureLoginService),
            Arc::new(FixtureBooksQuery),
            Arc::new(FixtureBooksCommand),
            Arc::new(FixtureCollectionsQuery),
        )
    }
}
