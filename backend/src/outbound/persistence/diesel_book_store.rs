//! PostgreSQL-backed `BookStore` implementation using Diesel.
//!
//! Books live in one relational table whose `reviews` column is a JSONB
//! array, so catalogue filtering stays in SQL while each book carries its
//! reviews as a document. Appending a review is a single
//! `reviews = reviews || $1` update; two concurrent appends to the same
//! book both survive because neither statement reads the list first.

use async_trait::async_trait;
use diesel::dsl::not;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use pagination::PageRequest;

use crate::domain::book::{
    Author, Book, BookAttributes, BookValidationError, Category, Isbn, Review, Title,
};
use crate::domain::catalogue::{CatalogueFilter, CatalogueScope};
use crate::domain::ports::{BookPage, BookStore, BookStoreError, ReviewAppendOutcome};

use super::diesel_error_mapping::{diesel_error_into, pool_error_into};
use super::models::{BookRow, BookUpdate, NewBookRow};
use super::pool::{DbPool, PoolError};
use super::schema::books;

/// Diesel-backed implementation of the book store port.
#[derive(Clone)]
pub struct DieselBookStore {
    pool: DbPool,
}

impl DieselBookStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to book store errors.
fn map_pool_error(error: PoolError) -> BookStoreError {
    pool_error_into(error, |message| BookStoreError::connection(message))
}

/// Map Diesel errors to book store errors.
fn map_diesel_error(error: diesel::result::Error) -> BookStoreError {
    diesel_error_into(
        error,
        |message| BookStoreError::query(message),
        |message| BookStoreError::connection(message),
    )
}

/// Map failures of statements that reference a collection.
///
/// The only foreign key a book write can trip is `collection_id`, so a
/// violation here always means the target collection does not exist.
fn map_book_write_error(error: diesel::result::Error) -> BookStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) = &error {
        return BookStoreError::collection_missing();
    }
    map_diesel_error(error)
}

fn invalid_row(err: BookValidationError) -> BookStoreError {
    BookStoreError::query(format!("stored book invalid: {err}"))
}

/// Convert a stored row into a validated domain book.
fn row_to_book(row: BookRow) -> Result<Book, BookStoreError> {
    let BookRow {
        id,
        collection_id,
        title,
        author,
        isbn,
        category,
        added_at,
        reviews,
    } = row;

    let attributes = BookAttributes {
        title: Title::new(title).map_err(invalid_row)?,
        author: Author::new(author).map_err(invalid_row)?,
        isbn: Isbn::new(isbn).map_err(invalid_row)?,
        category: category.parse::<Category>().map_err(invalid_row)?,
    };
    let reviews: Vec<Review> = serde_json::from_value(reviews)
        .map_err(|err| BookStoreError::query(format!("stored reviews invalid: {err}")))?;

    Ok(Book::new(id, collection_id, attributes, added_at, reviews))
}

/// Encode a review list into the JSONB column shape.
fn encode_reviews(reviews: &[Review]) -> Result<serde_json::Value, BookStoreError> {
    serde_json::to_value(reviews)
        .map_err(|err| BookStoreError::query(format!("review encoding failed: {err}")))
}

/// The `@>` probe that detects an existing review by the same user.
///
/// Containment of a one-element array checks whether any stored element
/// carries the reviewer's id.
fn reviewer_probe(review: &Review) -> serde_json::Value {
    serde_json::json!([{ "userId": review.user_id().as_ref() }])
}

/// Wrap `text` in `%` wildcards with LIKE metacharacters escaped, so user
/// input always matches literally.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Compose the scope and filter into one boxed query.
///
/// Built fresh for the count and the page select, which keeps both
/// statements against exactly the same predicate set.
fn filtered(scope: CatalogueScope, filter: &CatalogueFilter) -> books::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = books::table.into_boxed();

    if let CatalogueScope::Collection(collection_id) = scope {
        query = query.filter(books::collection_id.eq(collection_id));
    }
    if let Some(category) = filter.category() {
        query = query.filter(books::category.eq(category.as_str()));
    }
    if let Some(text) = filter.text() {
        let pattern = contains_pattern(text);
        query = query.filter(
            books::title
                .ilike(pattern.clone())
                .or(books::author.ilike(pattern.clone()))
                .or(books::isbn.ilike(pattern)),
        );
    }

    query
}

#[async_trait]
impl BookStore for DieselBookStore {
    async fn insert(&self, book: &Book) -> Result<(), BookStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let reviews = encode_reviews(book.reviews())?;

        let new_row = NewBookRow {
            id: book.id(),
            collection_id: book.collection_id(),
            title: book.title().as_ref(),
            author: book.author().as_ref(),
            isbn: book.isbn().as_ref(),
            category: book.category().as_str(),
            added_at: book.added_at(),
            reviews: &reviews,
        };

        diesel::insert_into(books::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_book_write_error)
    }

    async fn search(
        &self,
        scope: CatalogueScope,
        filter: &CatalogueFilter,
        request: PageRequest,
    ) -> Result<BookPage, BookStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(scope, filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total =
            u64::try_from(total).map_err(|_| BookStoreError::query("row count is negative"))?;

        let offset = i64::try_from(request.offset())
            .map_err(|_| BookStoreError::query("page offset overflows the store"))?;

        let rows: Vec<BookRow> = filtered(scope, filter)
            .order((books::added_at.desc(), books::id.desc()))
            .limit(i64::from(request.page_size()))
            .offset(offset)
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let books = rows
            .into_iter()
            .map(row_to_book)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BookPage { books, total })
    }

    async fn update(
        &self,
        book_id: &Uuid,
        attributes: &BookAttributes,
        collection_id: Option<Uuid>,
    ) -> Result<Option<Book>, BookStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = BookUpdate {
            collection_id,
            title: attributes.title.as_ref(),
            author: attributes.author.as_ref(),
            isbn: attributes.isbn.as_ref(),
            category: attributes.category.as_str(),
        };

        let row: Option<BookRow> = diesel::update(books::table.filter(books::id.eq(book_id)))
            .set(&changeset)
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_book_write_error)?;

        row.map(row_to_book).transpose()
    }

    async fn delete(&self, book_id: &Uuid) -> Result<bool, BookStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(books::table.filter(books::id.eq(book_id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn append_review(
        &self,
        book_id: &Uuid,
        review: &Review,
        enforce_single_review: bool,
    ) -> Result<ReviewAppendOutcome, BookStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let appended = encode_reviews(std::slice::from_ref(review))?;

        let row: Option<BookRow> = if enforce_single_review {
            diesel::update(
                books::table
                    .filter(books::id.eq(book_id))
                    .filter(not(books::reviews.contains(reviewer_probe(review)))),
            )
            .set(books::reviews.eq(books::reviews.concat(appended)))
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        } else {
            diesel::update(books::table.filter(books::id.eq(book_id)))
                .set(books::reviews.eq(books::reviews.concat(appended)))
                .returning(BookRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
        };

        match row {
            Some(row) => Ok(ReviewAppendOutcome::Appended(row_to_book(row)?)),
            // Zero rows under the guard is ambiguous: the book may be gone
            // or the reviewer may already be on it. One existence probe
            // settles which.
            None if enforce_single_review => {
                let exists: Option<Uuid> = books::table
                    .filter(books::id.eq(book_id))
                    .select(books::id)
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;

                if exists.is_some() {
                    Ok(ReviewAppendOutcome::AlreadyReviewed)
                } else {
                    Ok(ReviewAppendOutcome::BookMissing)
                }
            }
            None => Ok(ReviewAppendOutcome::BookMissing),
        }
    }
}
