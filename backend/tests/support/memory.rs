//! In-memory implementations of the driven ports.
//!
//! Endpoint tests run the real domain services over this store, so a whole
//! register / login / shelve / review flow works without PostgreSQL. Search
//! delegates to the domain's own in-memory evaluator, keeping ordering and
//! windowing identical to what the SQL adapter promises, and listing order
//! matches the Diesel directory clause for clause.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use pagination::PageRequest;

use backend::domain::ports::{
    BookPage, BookStore, BookStoreError, CollectionDirectory, CollectionDirectoryError,
    CredentialStore, CredentialStoreError, ProvisionedAccount, ReviewAppendOutcome,
    StoredCredentials,
};
use backend::domain::{
    Book, BookAttributes, CatalogueFilter, CatalogueScope, Collection, CollectionName,
    CollectionSummary, Review, SubstringMatch, User, UserId, Username, select_page,
};

/// Name of the collection provisioned for the seeded administrator.
const ADMIN_COLLECTION_NAME: &str = "Admin Collection";

struct AccountRecord {
    user: User,
    password_hash: String,
}

#[derive(Default)]
struct State {
    accounts: Vec<AccountRecord>,
    collections: Vec<Collection>,
    books: Vec<Book>,
}

/// Credential store, book store, and collection directory in one.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn summary_for(
    collection: &Collection,
    accounts: &[AccountRecord],
) -> Result<CollectionSummary, CollectionDirectoryError> {
    let owner = accounts
        .iter()
        .find(|account| account.user.id() == collection.owner_id())
        .ok_or_else(|| CollectionDirectoryError::query("collection owner missing"))?;

    Ok(CollectionSummary::new(
        collection.id(),
        collection.name().clone(),
        owner.user.username().clone(),
        collection.created_at(),
    ))
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_account(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<ProvisionedAccount, CredentialStoreError> {
        let mut state = self.state.lock().expect("state lock");
        if state
            .accounts
            .iter()
            .any(|account| account.user.username().as_ref() == username.as_ref())
        {
            return Err(CredentialStoreError::username_taken());
        }

        let user = User::new(UserId::random(), username.clone(), false);
        let collection = Collection::new(
            Uuid::new_v4(),
            user.id().clone(),
            CollectionName::default_for_new_user(),
            Utc::now(),
        );
        let account = ProvisionedAccount {
            user: user.clone(),
            default_collection_id: collection.id(),
        };

        state.accounts.push(AccountRecord {
            user,
            password_hash: password_hash.to_owned(),
        });
        state.collections.push(collection);

        Ok(account)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, CredentialStoreError> {
        let state = self.state.lock().expect("state lock");
        Ok(state
            .accounts
            .iter()
            .find(|account| account.user.username().as_ref() == username)
            .map(|account| StoredCredentials {
                user: account.user.clone(),
                password_hash: account.password_hash.clone(),
            }))
    }

    async fn ensure_admin(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<ProvisionedAccount, CredentialStoreError> {
        let mut state = self.state.lock().expect("state lock");

        let user = match state
            .accounts
            .iter_mut()
            .find(|account| account.user.username().as_ref() == username.as_ref())
        {
            Some(record) => {
                record.password_hash = password_hash.to_owned();
                record.user = User::new(record.user.id().clone(), username.clone(), true);
                record.user.clone()
            }
            None => {
                let user = User::new(UserId::random(), username.clone(), true);
                state.accounts.push(AccountRecord {
                    user: user.clone(),
                    password_hash: password_hash.to_owned(),
                });
                user
            }
        };

        // The earliest collection doubles as the default scope.
        let earliest = state
            .collections
            .iter()
            .filter(|collection| collection.owner_id() == user.id())
            .min_by(|a, b| {
                a.created_at()
                    .cmp(&b.created_at())
                    .then_with(|| a.id().cmp(&b.id()))
            })
            .map(Collection::id);

        let default_collection_id = match earliest {
            Some(id) => id,
            None => {
                let name = CollectionName::new(ADMIN_COLLECTION_NAME)
                    .map_err(|err| CredentialStoreError::query(err.to_string()))?;
                let collection = Collection::new(Uuid::new_v4(), user.id().clone(), name, Utc::now());
                let id = collection.id();
                state.collections.push(collection);
                id
            }
        };

        Ok(ProvisionedAccount {
            user,
            default_collection_id,
        })
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn insert(&self, book: &Book) -> Result<(), BookStoreError> {
        let mut state = self.state.lock().expect("state lock");
        if !state
            .collections
            .iter()
            .any(|collection| collection.id() == book.collection_id())
        {
            return Err(BookStoreError::collection_missing());
        }

        state.books.push(book.clone());
        Ok(())
    }

    async fn search(
        &self,
        scope: CatalogueScope,
        filter: &CatalogueFilter,
        request: PageRequest,
    ) -> Result<BookPage, BookStoreError> {
        let state = self.state.lock().expect("state lock");
        let page = select_page(&state.books, scope, filter, &SubstringMatch, request);
        Ok(BookPage {
            books: page.books,
            total: page.summary.total(),
        })
    }

    async fn update(
        &self,
        book_id: &Uuid,
        attributes: &BookAttributes,
        collection_id: Option<Uuid>,
    ) -> Result<Option<Book>, BookStoreError> {
        let mut state = self.state.lock().expect("state lock");
        if let Some(target) = collection_id {
            if !state
                .collections
                .iter()
                .any(|collection| collection.id() == target)
            {
                return Err(BookStoreError::collection_missing());
            }
        }

        let Some(position) = state.books.iter().position(|book| book.id() == *book_id) else {
            return Ok(None);
        };

        let existing = state.books[position].clone();
        let updated = Book::new(
            existing.id(),
            collection_id.unwrap_or(existing.collection_id()),
            attributes.clone(),
            existing.added_at(),
            existing.reviews().to_vec(),
        );
        state.books[position] = updated.clone();

        Ok(Some(updated))
    }

    async fn delete(&self, book_id: &Uuid) -> Result<bool, BookStoreError> {
        let mut state = self.state.lock().expect("state lock");
        let before = state.books.len();
        state.books.retain(|book| book.id() != *book_id);
        Ok(state.books.len() < before)
    }

    async fn append_review(
        &self,
        book_id: &Uuid,
        review: &Review,
        enforce_single_review: bool,
    ) -> Result<ReviewAppendOutcome, BookStoreError> {
        let mut state = self.state.lock().expect("state lock");
        let Some(position) = state.books.iter().position(|book| book.id() == *book_id) else {
            return Ok(ReviewAppendOutcome::BookMissing);
        };

        let existing = state.books[position].clone();
        if enforce_single_review
            && existing
                .reviews()
                .iter()
                .any(|stored| stored.user_id() == review.user_id())
        {
            return Ok(ReviewAppendOutcome::AlreadyReviewed);
        }

        let mut reviews = existing.reviews().to_vec();
        reviews.push(review.clone());
        let attributes = BookAttributes {
            title: existing.title().clone(),
            author: existing.author().clone(),
            isbn: existing.isbn().clone(),
            category: existing.category(),
        };
        let updated = Book::new(
            existing.id(),
            existing.collection_id(),
            attributes,
            existing.added_at(),
            reviews,
        );
        state.books[position] = updated.clone();

        Ok(ReviewAppendOutcome::Appended(updated))
    }
}

#[async_trait]
impl CollectionDirectory for MemoryStore {
    async fn default_collection_for(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Uuid>, CollectionDirectoryError> {
        let state = self.state.lock().expect("state lock");
        Ok(state
            .collections
            .iter()
            .filter(|collection| collection.owner_id() == user_id)
            .min_by(|a, b| {
                a.created_at()
                    .cmp(&b.created_at())
                    .then_with(|| a.id().cmp(&b.id()))
            })
            .map(Collection::id))
    }

    async fn list_for_owner(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionSummary>, CollectionDirectoryError> {
        let state = self.state.lock().expect("state lock");
        let mut owned: Vec<&Collection> = state
            .collections
            .iter()
            .filter(|collection| collection.owner_id() == user_id)
            .collect();
        owned.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });

        owned
            .into_iter()
            .map(|collection| summary_for(collection, &state.accounts))
            .collect()
    }

    async fn list_all(&self) -> Result<Vec<CollectionSummary>, CollectionDirectoryError> {
        let state = self.state.lock().expect("state lock");
        let mut all: Vec<&Collection> = state.collections.iter().collect();
        all.sort_by(|a, b| {
            a.name()
                .as_ref()
                .cmp(b.name().as_ref())
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });

        all.into_iter()
            .map(|collection| summary_for(collection, &state.accounts))
            .collect()
    }
}
