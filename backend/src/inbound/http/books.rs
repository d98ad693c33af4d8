//! Book catalogue HTTP handlers.
//!
//! ```text
//! GET    /api/v1/books
//! GET    /api/v1/books/search
//! GET    /api/v1/books/categories
//! POST   /api/v1/books
//! PUT    /api/v1/books/{id}
//! DELETE /api/v1/books/{id}
//! POST   /api/v1/books/{id}/reviews
//! ```
//!
//! Reads are open to any authenticated caller and are scoped to the caller's
//! own collection unless an admin widens them; book mutations are admin only,
//! while reviews may be appended by anyone with a session.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use pagination::PageRequest;

use crate::domain::{
    Author, Book, BookAttributes, BookValidationError, CatalogueFilter, CataloguePage, Category,
    Error, Isbn, Rating, Review, ReviewComment, ScopeParams, Title, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_optional_uuid, parse_uuid,
};

/// Query parameters for browsing the catalogue.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseBooksQuery {
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub all: Option<String>,
    pub collection_id: Option<String>,
}

/// Query parameters for searching the catalogue.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBooksQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub all: Option<String>,
    pub collection_id: Option<String>,
}

/// Request payload for creating or replacing a book.
///
/// Every attribute is optional at the serde level so a missing field reports
/// a shaped `missing_field` error instead of a deserialisation failure.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    #[schema(format = "uuid")]
    pub collection_id: Option<String>,
}

/// Request payload for appending a review.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReviewPayload {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Path segment naming a book.
#[derive(Debug, Deserialize)]
pub struct BookPath {
    pub id: String,
}

/// A review as embedded in book responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub username: String,
    pub rating: i64,
    pub comment: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<&Review> for ReviewBody {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id().to_string(),
            user_id: review.user_id().to_string(),
            username: review.username().to_string(),
            rating: i64::from(review.rating()),
            comment: review.comment().as_ref().to_owned(),
            created_at: review.created_at().to_rfc3339(),
        }
    }
}

/// A catalogued book as returned by every book endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub collection_id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    #[schema(format = "date-time")]
    pub added_at: String,
    pub reviews: Vec<ReviewBody>,
}

impl From<&Book> for BookBody {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id().to_string(),
            collection_id: book.collection_id().to_string(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            isbn: book.isbn().to_string(),
            category: book.category().as_str().to_owned(),
            added_at: book.added_at().to_rfc3339(),
            reviews: book.reviews().iter().map(ReviewBody::from).collect(),
        }
    }
}

/// Response envelope for catalogue pages.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookListResponse {
    pub books: Vec<BookBody>,
    pub page: u32,
    pub total_pages: u64,
    pub total: u64,
}

impl From<CataloguePage> for BookListResponse {
    fn from(page: CataloguePage) -> Self {
        Self {
            books: page.books.iter().map(BookBody::from).collect(),
            page: page.summary.page(),
            total_pages: page.summary.total_pages(),
            total: page.summary.total(),
        }
    }
}

fn map_book_validation_error(err: BookValidationError) -> Error {
    let (field, code) = match &err {
        BookValidationError::EmptyTitle => ("title", "empty_title"),
        BookValidationError::TitleTooLong { .. } => ("title", "title_too_long"),
        BookValidationError::EmptyAuthor => ("author", "empty_author"),
        BookValidationError::AuthorTooLong { .. } => ("author", "author_too_long"),
        BookValidationError::IsbnTooShort { .. } => ("isbn", "isbn_too_short"),
        BookValidationError::IsbnTooLong { .. } => ("isbn", "isbn_too_long"),
        BookValidationError::UnknownCategory { .. } => ("category", "unknown_category"),
        BookValidationError::RatingOutOfRange => ("rating", "rating_out_of_range"),
        BookValidationError::CommentTooLong { .. } => ("comment", "comment_too_long"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

fn require_field(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

fn parse_book_payload(payload: BookPayload) -> Result<(BookAttributes, Option<Uuid>), Error> {
    let title = Title::new(require_field(payload.title, FieldName::new("title"))?)
        .map_err(map_book_validation_error)?;
    let author = Author::new(require_field(payload.author, FieldName::new("author"))?)
        .map_err(map_book_validation_error)?;
    let isbn = Isbn::new(require_field(payload.isbn, FieldName::new("isbn"))?)
        .map_err(map_book_validation_error)?;
    let category = require_field(payload.category, FieldName::new("category"))?
        .parse::<Category>()
        .map_err(map_book_validation_error)?;
    let collection_id = parse_optional_uuid(payload.collection_id, FieldName::new("collectionId"))?;

    Ok((
        BookAttributes {
            title,
            author,
            isbn,
            category,
        },
        collection_id,
    ))
}

fn parse_review_payload(payload: ReviewPayload) -> Result<(Rating, ReviewComment), Error> {
    let rating = payload
        .rating
        .ok_or_else(|| missing_field_error(FieldName::new("rating")))?;
    let rating = Rating::try_from(rating).map_err(map_book_validation_error)?;
    let comment = match payload.comment {
        Some(comment) => ReviewComment::new(comment).map_err(map_book_validation_error)?,
        None => ReviewComment::default(),
    };
    Ok((rating, comment))
}

/// Read the caller's scope switches.
///
/// Scope parameters from non-admin callers are ignored wholesale, not
/// validated: a reader sending `collectionId=garbage` still gets their own
/// shelf rather than a rejection.
fn parse_scope_params(
    caller: &User,
    all: Option<String>,
    collection_id: Option<String>,
) -> Result<ScopeParams, Error> {
    if !caller.is_admin() {
        return Ok(ScopeParams::default());
    }

    Ok(ScopeParams {
        all: all.as_deref() == Some("true"),
        collection_id: parse_optional_uuid(collection_id, FieldName::new("collectionId"))?,
    })
}

/// Lenient numeric parse for `page` and `limit`; non-numeric input reads as
/// absent and falls back to the window defaults.
fn numeric_param(raw: Option<String>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

/// The read-path inputs shared by browsing and searching.
struct CatalogueRead {
    text: Option<String>,
    category: Option<String>,
    all: Option<String>,
    collection_id: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

async fn read_catalogue(
    state: &HttpState,
    caller: &User,
    read: CatalogueRead,
) -> Result<BookListResponse, Error> {
    let request = PageRequest::from_raw(numeric_param(read.page), numeric_param(read.limit));
    let params = parse_scope_params(caller, read.all, read.collection_id)?;

    let category = match read.category.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => match raw.parse::<Category>() {
            Ok(category) => Some(category),
            // An unrecognised category can never match a stored book.
            Err(_) => return Ok(BookListResponse::from(CataloguePage::empty(request))),
        },
        None => None,
    };

    let filter = CatalogueFilter::new(read.text.as_deref(), category);
    let page = state.books.browse(caller, &filter, params, request).await?;
    Ok(BookListResponse::from(page))
}

/// Browse the caller-visible catalogue, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(
        ("category" = Option<String>, Query, description = "Exact category filter"),
        ("page" = Option<i64>, Query, description = "Page number, counted from 1"),
        ("limit" = Option<i64>, Query, description = "Page size, capped at 50"),
        ("all" = Option<String>, Query, description = "true widens an admin to every collection"),
        ("collectionId" = Option<String>, Query, description = "Pins an admin to one collection")
    ),
    responses(
        (status = 200, description = "One catalogue page", body = BookListResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "listBooks",
    security(("SessionCookie" = []))
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<BrowseBooksQuery>,
) -> ApiResult<web::Json<BookListResponse>> {
    let caller = session.require_user()?;
    let BrowseBooksQuery {
        category,
        page,
        limit,
        all,
        collection_id,
    } = query.into_inner();

    let response = read_catalogue(
        &state,
        &caller,
        CatalogueRead {
            text: None,
            category,
            all,
            collection_id,
            page,
            limit,
        },
    )
    .await?;
    Ok(web::Json(response))
}

/// Search the caller-visible catalogue by title, author, or ISBN.
#[utoipa::path(
    get,
    path = "/api/v1/books/search",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive text query"),
        ("category" = Option<String>, Query, description = "Exact category filter"),
        ("page" = Option<i64>, Query, description = "Page number, counted from 1"),
        ("limit" = Option<i64>, Query, description = "Page size, capped at 50"),
        ("all" = Option<String>, Query, description = "true widens an admin to every collection"),
        ("collectionId" = Option<String>, Query, description = "Pins an admin to one collection")
    ),
    responses(
        (status = 200, description = "One catalogue page", body = BookListResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "searchBooks",
    security(("SessionCookie" = []))
)]
#[get("/books/search")]
pub async fn search_books(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SearchBooksQuery>,
) -> ApiResult<web::Json<BookListResponse>> {
    let caller = session.require_user()?;
    let SearchBooksQuery {
        q,
        category,
        page,
        limit,
        all,
        collection_id,
    } = query.into_inner();

    let response = read_catalogue(
        &state,
        &caller,
        CatalogueRead {
            text: q,
            category,
            all,
            collection_id,
            page,
            limit,
        },
    )
    .await?;
    Ok(web::Json(response))
}

/// The closed category taxonomy, in presentation order.
#[utoipa::path(
    get,
    path = "/api/v1/books/categories",
    responses(
        (status = 200, description = "Category names", body = [String]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "listCategories",
    security(("SessionCookie" = []))
)]
#[get("/books/categories")]
pub async fn list_categories(session: SessionContext) -> ApiResult<web::Json<Vec<&'static str>>> {
    session.require_user()?;
    Ok(web::Json(
        Category::ALL.iter().copied().map(Category::as_str).collect(),
    ))
}

/// Add a book to the catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = BookBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "createBook",
    security(("SessionCookie" = []))
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BookPayload>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_admin()?;
    let (attributes, collection_id) = parse_book_payload(payload.into_inner())?;
    let book = state
        .books_command
        .create(&caller, attributes, collection_id)
        .await?;
    Ok(HttpResponse::Created().json(BookBody::from(&book)))
}

/// Replace a book's attributes.
#[utoipa::path(
    put,
    path = "/api/v1/books/{id}",
    request_body = BookPayload,
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    responses(
        (status = 200, description = "Book replaced", body = BookBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Book not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "updateBook",
    security(("SessionCookie" = []))
)]
#[put("/books/{id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BookPath>,
    payload: web::Json<BookPayload>,
) -> ApiResult<web::Json<BookBody>> {
    session.require_admin()?;
    let book_id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let (attributes, collection_id) = parse_book_payload(payload.into_inner())?;
    let book = state
        .books_command
        .replace(&book_id, attributes, collection_id)
        .await?;
    Ok(web::Json(BookBody::from(&book)))
}

/// Remove a book from the catalogue.
#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Book not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "deleteBook",
    security(("SessionCookie" = []))
)]
#[delete("/books/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BookPath>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let book_id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    state.books_command.remove(&book_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Append the caller's review to a book.
#[utoipa::path(
    post,
    path = "/api/v1/books/{id}/reviews",
    request_body = ReviewPayload,
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    responses(
        (status = 201, description = "Review appended; returns the updated book", body = BookBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Book not found", body = ErrorSchema),
        (status = 409, description = "Caller already reviewed this book", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "addReview",
    security(("SessionCookie" = []))
)]
#[post("/books/{id}/reviews")]
pub async fn add_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BookPath>,
    payload: web::Json<ReviewPayload>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user()?;
    let book_id = parse_uuid(path.into_inner().id, FieldName::new("id"))?;
    let (rating, comment) = parse_review_payload(payload.into_inner())?;
    let book = state
        .books_command
        .add_review(&caller, &book_id, rating, comment)
        .await?;
    Ok(HttpResponse::Created().json(BookBody::from(&book)))
}

#[cfg(test)]
#[path = "books_tests.rs"]
mod tests;
