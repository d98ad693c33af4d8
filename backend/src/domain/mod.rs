//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User (alias to `user::User`) — authenticated principal.
//! - Book / Review (aliases to `book::*`) — catalogue aggregate with
//!   embedded reviews.
//! - FilterScope / CatalogueScope (aliases to `catalogue::*`) — requested
//!   and resolved catalogue visibility.

pub mod account_service;
pub mod auth;
pub mod book;
pub mod catalogue;
pub mod catalogue_service;
pub mod collection;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MAX, PASSWORD_MIN, RegistrationRequest,
    RegistrationValidationError,
};
pub use self::book::{
    Author, Book, BookAttributes, BookValidationError, COMMENT_MAX, Category, Isbn, RATING_MAX,
    RATING_MIN, Rating, Review, ReviewComment, Title,
};
pub use self::catalogue::{
    CatalogueFilter, CataloguePage, CatalogueScope, FilterScope, ScopeParams, SubstringMatch,
    TextMatch, select_page,
};
pub use self::catalogue_service::{CatalogueService, CatalogueSettings};
pub use self::collection::{
    Collection, CollectionName, CollectionSummary, CollectionValidationError,
    DEFAULT_COLLECTION_NAME,
};
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
