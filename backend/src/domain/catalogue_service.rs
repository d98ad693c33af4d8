//! Catalogue domain services.
//!
//! Implements the catalogue driving ports over the book store and the
//! collection directory. Scope resolution happens here, once per request:
//! handlers pass the raw scope switches and never see collection ids.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use pagination::{PageRequest, PageSummary};

use crate::domain::book::{Book, BookAttributes, Rating, Review, ReviewComment};
use crate::domain::catalogue::{
    CatalogueFilter, CataloguePage, CatalogueScope, FilterScope, ScopeParams,
};
use crate::domain::collection::CollectionSummary;
use crate::domain::error::Error;
use crate::domain::ports::{
    BookStore, BookStoreError, BooksCommand, BooksQuery, CollectionDirectory,
    CollectionDirectoryError, CollectionsQuery, ReviewAppendOutcome,
};
use crate::domain::user::User;

fn map_book_store_error(error: BookStoreError) -> Error {
    match error {
        BookStoreError::Connection { message } => {
            Error::service_unavailable(format!("book store unavailable: {message}"))
        }
        BookStoreError::Query { message } => {
            Error::internal(format!("book store error: {message}"))
        }
        BookStoreError::CollectionMissing => Error::invalid_request("collection does not exist"),
    }
}

fn map_directory_error(error: CollectionDirectoryError) -> Error {
    match error {
        CollectionDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("collection directory unavailable: {message}"))
        }
        CollectionDirectoryError::Query { message } => {
            Error::internal(format!("collection directory error: {message}"))
        }
    }
}

/// Behaviour switches for the catalogue service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogueSettings {
    /// Reject a second review from the same user on the same book.
    ///
    /// Off by default: historically a user could review a book repeatedly,
    /// and existing data may rely on that.
    pub single_review_per_user: bool,
}

/// Catalogue service implementing the book query, book command, and
/// collection listing driving ports.
#[derive(Clone)]
pub struct CatalogueService<B, D> {
    book_store: Arc<B>,
    collection_directory: Arc<D>,
    clock: Arc<dyn Clock>,
    settings: CatalogueSettings,
}

impl<B, D> CatalogueService<B, D> {
    /// Create a new catalogue service over the book store and directory.
    pub fn new(
        book_store: Arc<B>,
        collection_directory: Arc<D>,
        clock: Arc<dyn Clock>,
        settings: CatalogueSettings,
    ) -> Self {
        Self {
            book_store,
            collection_directory,
            clock,
            settings,
        }
    }
}

impl<B, D> CatalogueService<B, D>
where
    B: BookStore,
    D: CollectionDirectory,
{
    /// Resolve the caller's default collection id, if they have one.
    async fn default_collection(&self, caller: &User) -> Result<Option<Uuid>, Error> {
        self.collection_directory
            .default_collection_for(caller.id())
            .await
            .map_err(map_directory_error)
    }

    /// Turn the requested scope into a store scope, or `None` when the
    /// caller has no collection to fall back to.
    async fn resolve_scope(
        &self,
        caller: &User,
        params: ScopeParams,
    ) -> Result<Option<CatalogueScope>, Error> {
        let requested = FilterScope::for_caller(caller, params);
        let default_collection = match requested {
            FilterScope::CallerDefaultCollection => self.default_collection(caller).await?,
            FilterScope::AllCollections | FilterScope::Collection(_) => None,
        };

        Ok(requested.resolve(default_collection))
    }
}

#[async_trait]
impl<B, D> BooksQuery for CatalogueService<B, D>
where
    B: BookStore,
    D: CollectionDirectory,
{
    async fn browse(
        &self,
        caller: &User,
        filter: &CatalogueFilter,
        params: ScopeParams,
        request: PageRequest,
    ) -> Result<CataloguePage, Error> {
        let Some(scope) = self.resolve_scope(caller, params).await? else {
            // Owning no collection is an empty shelf, not a failure.
            return Ok(CataloguePage::empty(request));
        };

        let page = self
            .book_store
            .search(scope, filter, request)
            .await
            .map_err(map_book_store_error)?;

        Ok(CataloguePage {
            books: page.books,
            summary: PageSummary::new(request, page.total),
        })
    }
}

#[async_trait]
impl<B, D> BooksCommand for CatalogueService<B, D>
where
    B: BookStore,
    D: CollectionDirectory,
{
    async fn create(
        &self,
        caller: &User,
        attributes: BookAttributes,
        collection_id: Option<Uuid>,
    ) -> Result<Book, Error> {
        let collection_id = match collection_id {
            Some(id) => id,
            None => self
                .default_collection(caller)
                .await?
                .ok_or_else(|| Error::invalid_request("no collection to add the book to"))?,
        };

        let book = Book::new(
            Uuid::new_v4(),
            collection_id,
            attributes,
            self.clock.utc(),
            Vec::new(),
        );
        self.book_store
            .insert(&book)
            .await
            .map_err(map_book_store_error)?;

        Ok(book)
    }

    async fn replace(
        &self,
        book_id: &Uuid,
        attributes: BookAttributes,
        collection_id: Option<Uuid>,
    ) -> Result<Book, Error> {
        self.book_store
            .update(book_id, &attributes, collection_id)
            .await
            .map_err(map_book_store_error)?
            .ok_or_else(|| Error::not_found("Book not found"))
    }

    async fn remove(&self, book_id: &Uuid) -> Result<(), Error> {
        let removed = self
            .book_store
            .delete(book_id)
            .await
            .map_err(map_book_store_error)?;
        if !removed {
            return Err(Error::not_found("Book not found"));
        }

        Ok(())
    }

    async fn add_review(
        &self,
        caller: &User,
        book_id: &Uuid,
        rating: Rating,
        comment: ReviewComment,
    ) -> Result<Book, Error> {
        let review = Review::new(
            Uuid::new_v4(),
            caller.id().clone(),
            caller.username().clone(),
            rating,
            comment,
            self.clock.utc(),
        );

        let outcome = self
            .book_store
            .append_review(book_id, &review, self.settings.single_review_per_user)
            .await
            .map_err(map_book_store_error)?;

        match outcome {
            ReviewAppendOutcome::Appended(book) => Ok(book),
            ReviewAppendOutcome::BookMissing => Err(Error::not_found("Book not found")),
            ReviewAppendOutcome::AlreadyReviewed => {
                Err(Error::conflict("You have already reviewed this book"))
            }
        }
    }
}

#[async_trait]
impl<B, D> CollectionsQuery for CatalogueService<B, D>
where
    B: BookStore,
    D: CollectionDirectory,
{
    async fn list(
        &self,
        caller: &User,
        all_collections: bool,
    ) -> Result<Vec<CollectionSummary>, Error> {
        if caller.is_admin() && all_collections {
            self.collection_directory
                .list_all()
                .await
                .map_err(map_directory_error)
        } else {
            self.collection_directory
                .list_for_owner(caller.id())
                .await
                .map_err(map_directory_error)
        }
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
