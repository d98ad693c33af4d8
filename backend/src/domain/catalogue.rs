//! Catalogue filtering, scoping, and pagination semantics.
//!
//! The visibility rules for browsing and searching live here as pure
//! functions so they can be exercised without a running store. Admins may
//! widen the scope to every collection or pin it to a specific one;
//! everyone else is confined to their own default collection, and scope
//! parameters they pass are ignored rather than rejected.

use uuid::Uuid;

use pagination::{PageRequest, PageSummary};

use crate::domain::book::{Book, Category};
use crate::domain::user::User;

/// Raw scope switches taken from the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeParams {
    /// `all=true`: request every collection (admins only).
    pub all: bool,
    /// `collectionId=...`: request one specific collection (admins only).
    pub collection_id: Option<Uuid>,
}

/// Requested catalogue visibility, before the caller's default collection is
/// known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    /// No collection restriction.
    AllCollections,
    /// Restricted to a single named collection.
    Collection(Uuid),
    /// Restricted to whichever collection is the caller's default.
    CallerDefaultCollection,
}

impl FilterScope {
    /// Decide the scope for a caller.
    ///
    /// Precedence: an admin asking for `all` wins, then an admin naming a
    /// collection, then the caller's default. Non-admin callers always end
    /// up on their default collection regardless of the parameters they
    /// sent.
    #[must_use]
    pub fn for_caller(caller: &User, params: ScopeParams) -> Self {
        if caller.is_admin() {
            if params.all {
                return Self::AllCollections;
            }
            if let Some(collection_id) = params.collection_id {
                return Self::Collection(collection_id);
            }
        }

        Self::CallerDefaultCollection
    }

    /// Substitute the caller's default collection, if any.
    ///
    /// Returns `None` only for [`FilterScope::CallerDefaultCollection`] when
    /// the caller owns no collection; that state maps to an empty result,
    /// never an error.
    #[must_use]
    pub fn resolve(self, default_collection: Option<Uuid>) -> Option<CatalogueScope> {
        match self {
            Self::AllCollections => Some(CatalogueScope::AllCollections),
            Self::Collection(id) => Some(CatalogueScope::Collection(id)),
            Self::CallerDefaultCollection => {
                default_collection.map(CatalogueScope::Collection)
            }
        }
    }
}

/// Fully resolved catalogue visibility, as handed to a book store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogueScope {
    /// Every collection.
    AllCollections,
    /// One collection.
    Collection(Uuid),
}

impl CatalogueScope {
    fn admits(self, book: &Book) -> bool {
        match self {
            Self::AllCollections => true,
            Self::Collection(id) => book.collection_id() == id,
        }
    }
}

/// Content filter applied on top of the scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueFilter {
    text: Option<String>,
    category: Option<Category>,
}

impl CatalogueFilter {
    /// Build a filter, discarding blank text queries.
    #[must_use]
    pub fn new(text: Option<&str>, category: Option<Category>) -> Self {
        let text = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);
        Self { text, category }
    }

    /// Free-text query, if one survived trimming.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Exact category restriction, if any.
    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Whether the filter restricts anything beyond the scope.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.text.is_none() && self.category.is_none()
    }
}

/// Strategy deciding whether a book matches a free-text query.
///
/// The production store expresses the same semantics in SQL; this trait
/// exists so the matching rule has exactly one replaceable definition for
/// in-memory evaluation, and so a future engine (say, a proper text index)
/// can slot in without touching the callers.
pub trait TextMatch {
    /// Whether `query` matches `book`.
    fn matches(&self, query: &str, book: &Book) -> bool;
}

/// Case-insensitive substring match over title, author, and ISBN.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatch;

impl TextMatch for SubstringMatch {
    fn matches(&self, query: &str, book: &Book) -> bool {
        let needle = query.to_lowercase();
        [
            book.title().as_ref(),
            book.author().as_ref(),
            book.isbn().as_ref(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// One page of catalogue results together with its envelope numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct CataloguePage {
    /// Books on this page, newest first.
    pub books: Vec<Book>,
    /// Page number, page count, and total size of the filtered set.
    pub summary: PageSummary,
}

impl CataloguePage {
    /// The empty page returned when the caller has no collection to browse.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self {
            books: Vec::new(),
            summary: PageSummary::new(request, 0),
        }
    }
}

/// Apply scope, filter, ordering, and windowing to an in-memory snapshot.
///
/// Matching books are ordered newest first by `added_at` with the book id as
/// a descending tiebreaker, so repeated calls over unchanged data return
/// identical pages and consecutive pages never overlap.
#[must_use]
pub fn select_page<M: TextMatch>(
    books: &[Book],
    scope: CatalogueScope,
    filter: &CatalogueFilter,
    matcher: &M,
    request: PageRequest,
) -> CataloguePage {
    let mut matching: Vec<&Book> = books
        .iter()
        .filter(|book| scope.admits(book))
        .filter(|book| {
            filter
                .category()
                .is_none_or(|category| book.category() == category)
        })
        .filter(|book| {
            filter
                .text()
                .is_none_or(|query| matcher.matches(query, book))
        })
        .collect();

    matching.sort_by(|a, b| {
        b.added_at()
            .cmp(&a.added_at())
            .then_with(|| b.id().cmp(&a.id()))
    });

    let total = matching.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let window = matching
        .into_iter()
        .skip(offset)
        .take(usize::try_from(request.page_size()).unwrap_or(usize::MAX))
        .cloned()
        .collect();

    CataloguePage {
        books: window,
        summary: PageSummary::new(request, total),
    }
}
