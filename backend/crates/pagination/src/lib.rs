//! Page-window and pagination envelope primitives shared by catalogue
//! endpoints.
//!
//! Raw `page` and `limit` query parameters arrive untrusted and loosely
//! typed. [`PageRequest::from_raw`] normalises them once, at the edge, so the
//! query layer only ever sees a window that satisfies the documented
//! invariants. [`PageSummary`] derives the envelope fields (`total`,
//! `totalPages`) that list responses echo back to clients.
//!
//! # Invariants
//!
//! - `page` is at least [`MIN_PAGE`]; out-of-range input clamps, it never
//!   errors.
//! - `page_size` lies within [`MIN_PAGE_SIZE`]..=[`MAX_PAGE_SIZE`].
//! - `total_pages` is `ceil(total / page_size)`, which is `0` when `total`
//!   is `0` and at least `1` whenever `total` is positive.

use serde::Serialize;

/// First page number; requests below this clamp up to it.
pub const MIN_PAGE: u32 = 1;

/// Page number used when the caller supplies none.
pub const DEFAULT_PAGE: u32 = 1;

/// Smallest permitted page size.
pub const MIN_PAGE_SIZE: u32 = 1;

/// Page size used when the caller supplies none.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest permitted page size; larger requests clamp down to it.
pub const MAX_PAGE_SIZE: u32 = 50;

/// A normalised pagination window.
///
/// Construct via [`PageRequest::from_raw`] so the clamping rules are applied
/// exactly once. The window is deliberately immutable afterwards.
///
/// # Examples
///
/// ```
/// use pagination::PageRequest;
///
/// let window = PageRequest::from_raw(Some(3), Some(10));
/// assert_eq!(window.page(), 3);
/// assert_eq!(window.page_size(), 10);
/// assert_eq!(window.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Build a window from raw, caller-supplied parameters.
    ///
    /// Missing values fall back to [`DEFAULT_PAGE`] and
    /// [`DEFAULT_PAGE_SIZE`]; out-of-range values clamp rather than error so
    /// a hostile query string can never produce a rejected request or an
    /// oversized read.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
    ///
    /// assert_eq!(PageRequest::from_raw(None, None).page_size(), DEFAULT_PAGE_SIZE);
    /// assert_eq!(PageRequest::from_raw(Some(-4), Some(9_999)).page(), 1);
    /// assert_eq!(PageRequest::from_raw(Some(-4), Some(9_999)).page_size(), MAX_PAGE_SIZE);
    /// ```
    #[must_use]
    pub fn from_raw(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            page_size: clamp_page_size(page_size),
        }
    }

    /// One-based page number, always at least [`MIN_PAGE`].
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Records per page, always within [`MIN_PAGE_SIZE`]..=[`MAX_PAGE_SIZE`].
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of records preceding this window in the full ordered result.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page)
            .saturating_sub(1)
            .saturating_mul(u64::from(self.page_size))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::from_raw(None, None)
    }
}

/// Envelope totals derived from a window and the matching record count.
///
/// # Examples
///
/// ```
/// use pagination::{PageRequest, PageSummary};
///
/// let summary = PageSummary::new(PageRequest::from_raw(Some(1), Some(20)), 41);
/// assert_eq!(summary.total_pages(), 3);
/// assert!(!summary.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    page: u32,
    page_size: u32,
    total: u64,
    total_pages: u64,
}

impl PageSummary {
    /// Derive the envelope for `total` matching records viewed through
    /// `request`.
    ///
    /// `total_pages` is the ceiling of `total / page_size`: zero when no
    /// records match, and at least one otherwise.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(request.page_size()));
        Self {
            page: request.page(),
            page_size: request.page_size(),
            total,
            total_pages,
        }
    }

    /// The window's one-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The window's page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Count of records matching the filter across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages needed to cover every matching record.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// True when no records match the filter at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn clamp_page(raw: Option<i64>) -> u32 {
    raw.map_or(DEFAULT_PAGE, |value| {
        u32::try_from(value.max(i64::from(MIN_PAGE))).unwrap_or(u32::MAX)
    })
}

fn clamp_page_size(raw: Option<i64>) -> u32 {
    raw.map_or(DEFAULT_PAGE_SIZE, |value| {
        let clamped = value.clamp(i64::from(MIN_PAGE_SIZE), i64::from(MAX_PAGE_SIZE));
        u32::try_from(clamped).unwrap_or(MAX_PAGE_SIZE)
    })
}
