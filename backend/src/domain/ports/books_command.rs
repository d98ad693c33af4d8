//! Driving port for catalogue mutations and review appends.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::book::{Book, BookAttributes, Rating, ReviewComment};
use crate::domain::error::Error;
use crate::domain::user::User;

/// Domain use-case port for changing the catalogue.
///
/// The book mutations back admin-only endpoints; `add_review` is open to any
/// authenticated caller, who is recorded as the review's author.
#[async_trait]
pub trait BooksCommand: Send + Sync {
    /// Add a book, defaulting to the caller's default collection when no
    /// collection is named.
    async fn create(
        &self,
        caller: &User,
        attributes: BookAttributes,
        collection_id: Option<Uuid>,
    ) -> Result<Book, Error>;

    /// Replace a book's attributes; `collection_id` moves the book when set.
    async fn replace(
        &self,
        book_id: &Uuid,
        attributes: BookAttributes,
        collection_id: Option<Uuid>,
    ) -> Result<Book, Error>;

    /// Delete a book.
    async fn remove(&self, book_id: &Uuid) -> Result<(), Error>;

    /// Append the caller's review to a book and return the updated book.
    async fn add_review(
        &self,
        caller: &User,
        book_id: &Uuid,
        rating: Rating,
        comment: ReviewComment,
    ) -> Result<Book, Error>;
}

/// Temporary in-memory mutator used until persistence is wired.
///
/// Creation echoes the book back; everything addressing an existing book
/// reports it missing, because nothing is stored.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBooksCommand;

#[async_trait]
impl BooksCommand for FixtureBooksCommand {
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
            chrono::Utc::now(),
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

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::book::{Author, Category, Isbn, Title};
    use crate::domain::error::ErrorCode;

    fn attributes() -> BookAttributes {
        BookAttributes {
            title: Title::new("The Mythical Man-Month").expect("valid title"),
            author: Author::new("Fred Brooks").expect("valid author"),
            isbn: Isbn::new("978-0201835953").expect("valid isbn"),
            category: Category::Programming,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_create_echoes_the_attributes() {
        let service = FixtureBooksCommand;
        let caller = User::from_parts("3fa85f64-5717-4562-b3fc-2c963f66afa6", "shelf_admin", true);
        let collection = Uuid::new_v4();

        let book = service
            .create(&caller, attributes(), Some(collection))
            .await
            .expect("fixture create succeeds");

        assert_eq!(book.title().as_ref(), "The Mythical Man-Month");
        assert_eq!(book.collection_id(), collection);
        assert!(book.reviews().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_mutations_report_missing_books() {
        let service = FixtureBooksCommand;
        let err = service
            .remove(&Uuid::new_v4())
            .await
            .expect_err("nothing is stored");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
