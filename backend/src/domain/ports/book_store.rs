//! Port for book document storage, search, and review appends.

use async_trait::async_trait;
use uuid::Uuid;

use pagination::PageRequest;

use crate::domain::book::{Book, BookAttributes, Review};
use crate::domain::catalogue::{CatalogueFilter, CatalogueScope};

use super::define_port_error;

define_port_error! {
    /// Errors raised by book store adapters.
    pub enum BookStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "book store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "book store query failed: {message}",
        /// The referenced collection does not exist.
        CollectionMissing =>
            "collection does not exist",
    }
}

/// One window of matching books plus the size of the whole matching set.
#[derive(Debug, Clone, PartialEq)]
pub struct BookPage {
    /// Books in the window, newest first.
    pub books: Vec<Book>,
    /// Matching books across all pages.
    pub total: u64,
}

impl BookPage {
    /// A window over an empty matching set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            books: Vec::new(),
            total: 0,
        }
    }
}

/// Result of attempting to append a review to a book.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewAppendOutcome {
    /// The review was stored; carries the updated book.
    Appended(Book),
    /// No book exists under the given id.
    BookMissing,
    /// Single-review enforcement was requested and this user already has a
    /// review on the book.
    AlreadyReviewed,
}

/// Port for persisting books and their embedded reviews.
///
/// `append_review` must push onto the stored review list in a single
/// store-side operation rather than read-modify-write, so two concurrent
/// appends to one book both survive.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persist a new book, including any embedded reviews.
    async fn insert(&self, book: &Book) -> Result<(), BookStoreError>;

    /// Count and window the books admitted by `scope` and `filter`.
    async fn search(
        &self,
        scope: CatalogueScope,
        filter: &CatalogueFilter,
        request: PageRequest,
    ) -> Result<BookPage, BookStoreError>;

    /// Replace a book's attributes; `collection_id` moves the book when set.
    ///
    /// Returns `None` when no book exists under the given id.
    async fn update(
        &self,
        book_id: &Uuid,
        attributes: &BookAttributes,
        collection_id: Option<Uuid>,
    ) -> Result<Option<Book>, BookStoreError>;

    /// Remove a book; reports whether anything was deleted.
    async fn delete(&self, book_id: &Uuid) -> Result<bool, BookStoreError>;

    /// Append `review` to the book's embedded list.
    ///
    /// With `enforce_single_review` set, the append is skipped when the
    /// reviewing user already appears in the list.
    async fn append_review(
        &self,
        book_id: &Uuid,
        review: &Review,
        enforce_single_review: bool,
    ) -> Result<ReviewAppendOutcome, BookStoreError>;
}

/// Fixture implementation for tests that do not exercise book storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookStore;

#[async_trait]
impl BookStore for FixtureBookStore {
    async fn insert(&self, _book: &Book) -> Result<(), BookStoreError> {
        Ok(())
    }

    async fn search(
        &self,
        _scope: CatalogueScope,
        _filter: &CatalogueFilter,
        _request: PageRequest,
    ) -> Result<BookPage, BookStoreError> {
        Ok(BookPage::empty())
    }

    async fn update(
        &self,
        _book_id: &Uuid,
        _attributes: &BookAttributes,
        _collection_id: Option<Uuid>,
    ) -> Result<Option<Book>, BookStoreError> {
        Ok(None)
    }

    async fn delete(&self, _book_id: &Uuid) -> Result<bool, BookStoreError> {
        Ok(false)
    }

    async fn append_review(
        &self,
        _book_id: &Uuid,
        _review: &Review,
        _enforce_single_review: bool,
    ) -> Result<ReviewAppendOutcome, BookStoreError> {
        Ok(ReviewAppendOutcome::BookMissing)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_search_is_empty() {
        let store = FixtureBookStore;
        let page = store
            .search(
                CatalogueScope::AllCollections,
                &CatalogueFilter::default(),
                PageRequest::from_raw(None, None),
            )
            .await
            .expect("fixture search succeeds");
        assert!(page.books.is_empty());
        assert_eq!(page.total, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_delete_reports_nothing_removed() {
        let store = FixtureBookStore;
        assert!(
            !store
                .delete(&Uuid::new_v4())
                .await
                .expect("fixture delete succeeds")
        );
    }

    #[rstest]
    fn collection_missing_error_formats_message() {
        let err = BookStoreError::collection_missing();
        assert_eq!(err.to_string(), "collection does not exist");
    }
}
