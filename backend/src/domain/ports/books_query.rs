//! Driving port for browsing and searching the catalogue.

use async_trait::async_trait;

use pagination::PageRequest;

use crate::domain::catalogue::{CatalogueFilter, CataloguePage, ScopeParams};
use crate::domain::error::Error;
use crate::domain::user::User;

/// Domain use-case port for catalogue reads.
///
/// Listing and searching are the same operation with different filters: the
/// list endpoint simply never supplies a text query.
#[async_trait]
pub trait BooksQuery: Send + Sync {
    /// Resolve the caller's scope, filter the catalogue, and window it.
    async fn browse(
        &self,
        caller: &User,
        filter: &CatalogueFilter,
        params: ScopeParams,
        request: PageRequest,
    ) -> Result<CataloguePage, Error>;
}

/// Temporary in-memory catalogue used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBooksQuery;

#[async_trait]
impl BooksQuery for FixtureBooksQuery {
    async fn browse(
        &self,
        _caller: &User,
        _filter: &CatalogueFilter,
        _params: ScopeParams,
        request: PageRequest,
    ) -> Result<CataloguePage, Error> {
        Ok(CataloguePage::empty(request))
    }
}
