//! Builders for HTTP state ports backed by the database or by fixtures.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use backend::domain::ports::{
    BooksCommand, BooksQuery, CollectionsQuery, FixtureBooksCommand, FixtureBooksQuery,
    FixtureCollectionsQuery, FixtureLoginService, FixtureRegistrationService, LoginService,
    RegistrationService,
};
use backend::domain::{AccountService, CatalogueService};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DieselBookStore, DieselCollectionDirectory, DieselCredentialStore,
};

use super::ServerConfig;

/// Build a command/query service pair using a real service when a pool is
/// available, otherwise using fixture implementations.
fn build_service_pair<Pool, S, Cmd, Query, MakeService, Cast>(
    pool: &Option<Pool>,
    make_service: MakeService,
    fixtures: (Arc<Cmd>, Arc<Query>),
    cast: Cast,
) -> (Arc<Cmd>, Arc<Query>)
where
    S: 'static,
    Cmd: ?Sized + 'static,
    Query: ?Sized + 'static,
    MakeService: FnOnce(&Pool) -> S,
    Cast: FnOnce(Arc<S>) -> (Arc<Cmd>, Arc<Query>),
{
    match pool {
        Some(pool) => {
            let service = Arc::new(make_service(pool));
            cast(service)
        }
        None => fixtures,
    }
}

fn build_account_pair_with_pool<Pool, Service>(
    pool: &Option<Pool>,
    make_service: impl FnOnce(&Pool) -> Service,
) -> (Arc<dyn RegistrationService>, Arc<dyn LoginService>)
where
    Service: RegistrationService + LoginService + 'static,
{
    build_service_pair(
        pool,
        make_service,
        (
            Arc::new(FixtureRegistrationService) as Arc<dyn RegistrationService>,
            Arc::new(FixtureLoginService) as Arc<dyn LoginService>,
        ),
        |service| {
            (
                service.clone() as Arc<dyn RegistrationService>,
                service as Arc<dyn LoginService>,
            )
        },
    )
}

fn build_account_pair(
    config: &ServerConfig,
) -> (Arc<dyn RegistrationService>, Arc<dyn LoginService>) {
    build_account_pair_with_pool(&config.db_pool, |pool| {
        AccountService::new(Arc::new(DieselCredentialStore::new(pool.clone())))
    })
}

/// Select the catalogue ports; one service implements all three, so the
/// database branch hands out clones of a single `Arc`.
fn build_catalogue_trio_with_pool<Pool, Service>(
    pool: &Option<Pool>,
    make_service: impl FnOnce(&Pool) -> Service,
) -> (
    Arc<dyn BooksQuery>,
    Arc<dyn BooksCommand>,
    Arc<dyn CollectionsQuery>,
)
where
    Service: BooksQuery + BooksCommand + CollectionsQuery + 'static,
{
    match pool {
        Some(pool) => {
            let service = Arc::new(make_service(pool));
            (
                service.clone() as Arc<dyn BooksQuery>,
                service.clone() as Arc<dyn BooksCommand>,
                service as Arc<dyn CollectionsQuery>,
            )
        }
        None => (
            Arc::new(FixtureBooksQuery),
            Arc::new(FixtureBooksCommand),
            Arc::new(FixtureCollectionsQuery),
        ),
    }
}

fn build_catalogue_trio(
    config: &ServerConfig,
) -> (
    Arc<dyn BooksQuery>,
    Arc<dyn BooksCommand>,
    Arc<dyn CollectionsQuery>,
) {
    build_catalogue_trio_with_pool(&config.db_pool, |pool| {
        CatalogueService::new(
            Arc::new(DieselBookStore::new(pool.clone())),
            Arc::new(DieselCollectionDirectory::new(pool.clone())),
            Arc::new(DefaultClock),
            config.catalogue,
        )
    })
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let (registration, login) = build_account_pair(config);
    let (books, books_command, collections) = build_catalogue_trio(config);

    web::Data::new(HttpState::new(
        registration,
        login,
        books,
        books_command,
        collections,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use pagination::{PageRequest, PageSummary};
    use rstest::rstest;
    use uuid::Uuid;

    use backend::domain::{
        Book, BookAttributes, CatalogueFilter, CataloguePage, CollectionSummary, Error,
        LoginCredentials, Rating, RegistrationRequest, ReviewComment, ScopeParams, User,
    };

    const FIXTURE_LOGIN_USERNAME: &str = "admin";
    const FIXTURE_LOGIN_PASSWORD: &str = "password123";
    const FIXTURE_LOGIN_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
    const DB_LOGIN_USERNAME: &str = "db_admin";
    const DB_LOGIN_PASSWORD: &str = "db-password";
    const DB_LOGIN_USER_ID: &str = "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa";

    #[derive(Clone, Copy)]
    struct StubDbBackedAccount;

    #[async_trait]
    impl RegistrationService for StubDbBackedAccount {
        async fn register(&self, _request: &RegistrationRequest) -> Result<User, Error> {
            Err(Error::conflict("Username already exists"))
        }
    }

    #[async_trait]
    impl LoginService for StubDbBackedAccount {
        async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
            if credentials.username() == DB_LOGIN_USERNAME
                && credentials.password() == DB_LOGIN_PASSWORD
            {
                Ok(User::from_parts(DB_LOGIN_USER_ID, DB_LOGIN_USERNAME, true))
            } else {
                Err(Error::unauthorized("Invalid credentials"))
            }
        }
    }

    #[derive(Clone, Copy)]
    struct StubDbBackedCatalogue;

    #[async_trait]
    impl BooksQuery for StubDbBackedCatalogue {
        async fn browse(
            &self,
            _caller: &User,
            _filter: &CatalogueFilter,
            _params: ScopeParams,
            request: PageRequest,
        ) -> Result<CataloguePage, Error> {
            // Total of one distinguishes this stub from the empty fixture.
            let mut page = CataloguePage::empty(request);
            page.summary = PageSummary::new(request, 1);
            Ok(page)
        }
    }

    #[async_trait]
    impl BooksCommand for StubDbBackedCatalogue {
        async fn create(
            &self,
            _caller: &User,
            attributes: BookAttributes,
            collection_id: Option<Uuid>,
        ) -> Result<Book, Error> {
            Ok(Book::new(
                Uuid::new_v4(),
                collection_id.unwrap_or_else(Uuid::new_v4),
                attributes,
                Utc::now(),
                Vec::new(),
            ))
        }

        async fn replace(
            &self,
            _book_id: &Uuid,
            _attributes: BookAttributes,
            _collection_id: Option<Uuid>,
        ) -> Result<Book, Error> {
            Err(Error::not_found("Book not found"))
        }

        async fn remove(&self, _book_id: &Uuid) -> Result<(), Error> {
            Err(Error::not_found("Book not found"))
        }

        async fn add_review(
            &self,
            _caller: &User,
            _book_id: &Uuid,
            _rating: Rating,
            _comment: ReviewComment,
        ) -> Result<Book, Error> {
            Err(Error::not_found("Book not found"))
        }
    }

    #[async_trait]
    impl CollectionsQuery for StubDbBackedCatalogue {
        async fn list(
            &self,
            _caller: &User,
            _all_collections: bool,
        ) -> Result<Vec<CollectionSummary>, Error> {
            Ok(Vec::new())
        }
    }

    fn reader() -> User {
        User::from_parts("3fa85f64-5717-4562-b3fc-2c963f66afa6", "reader", false)
    }

    #[rstest]
    #[tokio::test]
    async fn db_pool_present_selects_db_backed_account_ports() {
        let (registration, login) =
            build_account_pair_with_pool(&Some(()), |_| StubDbBackedAccount);

        let fixture_credentials =
            LoginCredentials::try_from_parts(FIXTURE_LOGIN_USERNAME, FIXTURE_LOGIN_PASSWORD)
                .expect("fixture credentials shape");
        let db_credentials = LoginCredentials::try_from_parts(DB_LOGIN_USERNAME, DB_LOGIN_PASSWORD)
            .expect("db credentials shape");
        assert!(login.authenticate(&fixture_credentials).await.is_err());

        let authenticated = login
            .authenticate(&db_credentials)
            .await
            .expect("db-backed login should succeed");
        assert_eq!(authenticated.id().as_ref(), DB_LOGIN_USER_ID);

        let request = RegistrationRequest::try_from_parts("reader", "password123")
            .expect("registration shape");
        let registered = registration.register(&request).await;
        assert!(registered.is_err(), "stub registration always conflicts");
    }

    #[rstest]
    #[tokio::test]
    async fn db_pool_absent_keeps_fixture_account_ports() {
        let (registration, login) =
            build_account_pair_with_pool::<(), StubDbBackedAccount>(&None, |_| {
                StubDbBackedAccount
            });

        let fixture_credentials =
            LoginCredentials::try_from_parts(FIXTURE_LOGIN_USERNAME, FIXTURE_LOGIN_PASSWORD)
                .expect("fixture credentials shape");
        let db_credentials = LoginCredentials::try_from_parts(DB_LOGIN_USERNAME, DB_LOGIN_PASSWORD)
            .expect("db credentials shape");

        assert!(login.authenticate(&db_credentials).await.is_err());
        let authenticated = login
            .authenticate(&fixture_credentials)
            .await
            .expect("fixture login should succeed");
        assert_eq!(authenticated.id().as_ref(), FIXTURE_LOGIN_USER_ID);
        assert!(authenticated.is_admin());

        let request = RegistrationRequest::try_from_parts("reader", "password123")
            .expect("registration shape");
        let registered = registration
            .register(&request)
            .await
            .expect("fixture registration should succeed");
        assert_eq!(registered.username().as_ref(), "reader");
        assert!(!registered.is_admin());
    }

    #[rstest]
    #[tokio::test]
    async fn db_pool_present_selects_db_backed_catalogue_ports() {
        let (books, _commands, _collections) =
            build_catalogue_trio_with_pool(&Some(()), |_| StubDbBackedCatalogue);

        let page = books
            .browse(
                &reader(),
                &CatalogueFilter::default(),
                ScopeParams::default(),
                PageRequest::from_raw(None, None),
            )
            .await
            .expect("db-backed browse should succeed");
        assert_eq!(page.summary.total(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn db_pool_absent_keeps_fixture_catalogue_ports() {
        let (books, commands, collections) =
            build_catalogue_trio_with_pool::<(), StubDbBackedCatalogue>(&None, |_| {
                StubDbBackedCatalogue
            });

        let page = books
            .browse(
                &reader(),
                &CatalogueFilter::default(),
                ScopeParams::default(),
                PageRequest::from_raw(None, None),
            )
            .await
            .expect("fixture browse should succeed");
        assert_eq!(page.summary.total(), 0);

        let listed = collections
            .list(&reader(), false)
            .await
            .expect("fixture list should succeed");
        assert!(listed.is_empty());

        let removal = commands.remove(&Uuid::new_v4()).await;
        assert!(removal.is_err(), "fixture has no stored books to remove");
    }
}
