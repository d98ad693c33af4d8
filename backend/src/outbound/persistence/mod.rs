//! PostgreSQL persistence adapters using Diesel.
//!
//! Concrete implementations of the domain's driven ports, backed by
//! PostgreSQL through `diesel-async` with `bb8` connection pooling.
//!
//! The adapters stay thin: they translate between Diesel rows and domain
//! types and map database failures to port errors, nothing more. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) never leave
//! this module, and reads rebuild domain values through their validating
//! constructors so corrupted rows surface as errors instead of invalid
//! domain state.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselBookStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/shelfside")).await?;
//! let store = DieselBookStore::new(pool);
//! ```

mod diesel_book_store;
mod diesel_collection_directory;
mod diesel_credential_store;
mod diesel_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_book_store::DieselBookStore;
pub use diesel_collection_directory::DieselCollectionDirectory;
pub use diesel_credential_store::DieselCredentialStore;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
