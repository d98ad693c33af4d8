//! Startup seeding orchestration.

use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use thiserror::Error;
use tracing::{info, warn};

use pagination::PageRequest;

use crate::domain::ports::{BookStore, BookStoreError};
use crate::domain::{
    AccountService, BookValidationError, CatalogueFilter, CatalogueScope, Error,
    UserValidationError, Username,
};
use crate::outbound::persistence::{DbPool, DieselBookStore, DieselCredentialStore};
use crate::sample_data::config::SampleDataSettings;
use crate::sample_data::generator::generate_books;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// The configured admin username fails domain validation.
    #[error("invalid sample admin username: {0}")]
    AdminUsername(#[from] UserValidationError),
    /// Upserting the admin account failed.
    #[error("admin provisioning failed: {0}")]
    Provisioning(#[from] Error),
    /// A generated book failed domain validation.
    #[error("sample book generation failed: {0}")]
    Generation(#[from] BookValidationError),
    /// Reading or writing the catalogue failed.
    #[error("sample catalogue persistence failed: {0}")]
    Store(#[from] BookStoreError),
}

/// What startup seeding did, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSeedOutcome {
    /// Username of the upserted administrator.
    pub admin_username: Username,
    /// Books inserted this run; zero when the catalogue was already seeded.
    pub books_inserted: usize,
}

/// Upsert the admin account and seed its catalogue on startup when enabled.
///
/// The admin upsert always runs so a rotated password takes effect; book
/// generation is skipped once the admin's collection holds any books.
///
/// # Errors
/// Returns [`StartupSeedingError`] when provisioning, generation, or
/// persistence fails. Disabled seeding and a missing pool are not errors.
pub async fn seed_sample_data_on_startup(
    settings: &SampleDataSettings,
    db_pool: Option<&DbPool>,
) -> Result<Option<SampleSeedOutcome>, StartupSeedingError> {
    if !settings.enabled {
        info!(reason = "disabled", "sample data seeding skipped");
        return Ok(None);
    }

    let Some(db_pool) = db_pool else {
        warn!("sample data seeding enabled but DATABASE_URL is missing; skipping");
        return Ok(None);
    };

    let accounts = AccountService::new(Arc::new(DieselCredentialStore::new(db_pool.clone())));
    let admin_username = Username::new(settings.admin_username())?;
    let account = accounts
        .ensure_admin(&admin_username, settings.admin_password())
        .await?;

    let book_store = DieselBookStore::new(db_pool.clone());
    let existing = book_store
        .search(
            CatalogueScope::Collection(account.default_collection_id),
            &CatalogueFilter::default(),
            PageRequest::from_raw(Some(1), Some(1)),
        )
        .await?;
    if existing.total > 0 {
        info!(
            admin = %account.user.username(),
            books = existing.total,
            "sample catalogue already present; skipping generation"
        );
        return Ok(Some(SampleSeedOutcome {
            admin_username,
            books_inserted: 0,
        }));
    }

    let mut rng = SmallRng::from_entropy();
    let books = generate_books(
        &mut rng,
        account.default_collection_id,
        &account.user,
        settings.book_count(),
        Utc::now(),
    )?;
    for book in &books {
        book_store.insert(book).await?;
    }

    info!(
        admin = %account.user.username(),
        books = books.len(),
        "sample catalogue seeded"
    );
    Ok(Some(SampleSeedOutcome {
        admin_username,
        books_inserted: books.len(),
    }))
}
