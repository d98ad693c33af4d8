//! Actix application assembly and request helpers for endpoint tests.
//!
//! `api_app` mounts the same `/api/v1` layout as the server module, but over
//! the in-memory store and with a per-test session key, so tests drive the
//! whole stack through plain HTTP requests.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use mockable::DefaultClock;
use serde_json::Value;

use backend::domain::ports::ProvisionedAccount;
use backend::domain::{AccountService, CatalogueService, CatalogueSettings, Username};
use backend::inbound::http::session_config::SESSION_COOKIE_NAME;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{auth, books, collections};

use super::memory::MemoryStore;

/// Username of the administrator provisioned by [`seed_admin`].
pub const ADMIN_USERNAME: &str = "shelf_admin";
/// Password of the administrator provisioned by [`seed_admin`].
pub const ADMIN_PASSWORD: &str = "admin-pass-123";

/// Session middleware configured like production but safe for plain HTTP.
fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Provision the administrator account the way startup seeding does.
pub async fn seed_admin(store: &Arc<MemoryStore>) -> ProvisionedAccount {
    let username = Username::new(ADMIN_USERNAME).expect("valid admin username");
    AccountService::new(store.clone())
        .ensure_admin(&username, ADMIN_PASSWORD)
        .await
        .expect("admin provisioning succeeds")
}

/// Build the `/api/v1` surface over the given store.
pub fn api_app(
    store: Arc<MemoryStore>,
    settings: CatalogueSettings,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let account = Arc::new(AccountService::new(store.clone()));
    let catalogue = Arc::new(CatalogueService::new(
        store.clone(),
        store,
        Arc::new(DefaultClock),
        settings,
    ));
    let state = HttpState::new(
        account.clone(),
        account,
        catalogue.clone(),
        catalogue.clone(),
        catalogue,
    );

    App::new()
        .app_data(web::Data::new(state))
        .wrap(session_middleware())
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login)
                        .service(auth::logout)
                        .service(auth::me),
                )
                .service(books::list_books)
                .service(books::search_books)
                .service(books::list_categories)
                .service(books::create_book)
                .service(books::update_book)
                .service(books::delete_book)
                .service(books::add_review)
                .service(collections::list_collections),
        )
}

async fn session_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    uri: &str,
    username: &str,
    password: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(serde_json::json!({ "username": username, "password": password }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(
        response.status().is_success(),
        "{uri} failed with {}",
        response.status()
    );
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie")
        .into_owned()
}

/// Register a fresh account and return its session cookie.
pub async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    password: &str,
) -> Cookie<'static> {
    session_cookie(app, "/api/v1/auth/register", username, password).await
}

/// Log in and return the session cookie.
pub async fn login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    password: &str,
) -> Cookie<'static> {
    session_cookie(app, "/api/v1/auth/login", username, password).await
}

/// Deserialise a response body as JSON.
pub async fn read_json(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}
