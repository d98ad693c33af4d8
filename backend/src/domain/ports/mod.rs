//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod book_store;
mod books_command;
mod books_query;
mod collection_directory;
mod collections_query;
mod credential_store;
mod login_service;
mod registration_service;

#[cfg(test)]
pub use book_store::MockBookStore;
pub use book_store::{
    BookPage, BookStore, BookStoreError, FixtureBookStore, ReviewAppendOutcome,
};
pub use books_command::{BooksCommand, FixtureBooksCommand};
pub use books_query::{BooksQuery, FixtureBooksQuery};
#[cfg(test)]
pub use collection_directory::MockCollectionDirectory;
pub use collection_directory::{
    CollectionDirectory, CollectionDirectoryError, FixtureCollectionDirectory,
};
pub use collections_query::{CollectionsQuery, FixtureCollectionsQuery};
#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{
    CredentialStore, CredentialStoreError, FixtureCredentialStore, ProvisionedAccount,
    StoredCredentials,
};
pub use login_service::{FixtureLoginService, LoginService};
pub use registration_service::{FixtureRegistrationService, RegistrationService};
