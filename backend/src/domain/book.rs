//! Book and review data model.
//!
//! Books live in a per-user collection and carry their reviews inline as an
//! append-only list. Field constructors validate the same bounds the HTTP
//! payload schema advertises so adapters can re-check stored rows on read.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::{UserId, Username};

/// Maximum allowed length for a book title.
pub const TITLE_MAX: usize = 200;
/// Maximum allowed length for an author name.
pub const AUTHOR_MAX: usize = 200;
/// Minimum allowed length for an ISBN.
pub const ISBN_MIN: usize = 3;
/// Maximum allowed length for an ISBN.
pub const ISBN_MAX: usize = 30;
/// Lowest accepted review rating.
pub const RATING_MIN: i64 = 1;
/// Highest accepted review rating.
pub const RATING_MAX: i64 = 5;
/// Maximum allowed length for a review comment.
pub const COMMENT_MAX: usize = 1000;

/// Validation errors returned by the field constructors in this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyAuthor,
    AuthorTooLong { max: usize },
    IsbnTooShort { min: usize },
    IsbnTooLong { max: usize },
    UnknownCategory { value: String },
    RatingOutOfRange,
    CommentTooLong { max: usize },
}

impl fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyAuthor => write!(f, "author must not be empty"),
            Self::AuthorTooLong { max } => write!(f, "author must be at most {max} characters"),
            Self::IsbnTooShort { min } => write!(f, "isbn must be at least {min} characters"),
            Self::IsbnTooLong { max } => write!(f, "isbn must be at most {max} characters"),
            Self::UnknownCategory { value } => write!(f, "unknown category \"{value}\""),
            Self::RatingOutOfRange => {
                write!(
                    f,
                    "rating must be an integer between {RATING_MIN} and {RATING_MAX}"
                )
            }
            Self::CommentTooLong { max } => {
                write!(f, "comment must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for BookValidationError {}

/// Book title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`], trimming surrounding whitespace.
    pub fn new(title: impl Into<String>) -> Result<Self, BookValidationError> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(BookValidationError::TitleTooLong { max: TITLE_MAX });
        }

        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

/// Book author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author(String);

impl Author {
    /// Validate and construct an [`Author`], trimming surrounding whitespace.
    pub fn new(author: impl Into<String>) -> Result<Self, BookValidationError> {
        let author = author.into();
        let trimmed = author.trim();
        if trimmed.is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }
        if trimmed.chars().count() > AUTHOR_MAX {
            return Err(BookValidationError::AuthorTooLong { max: AUTHOR_MAX });
        }

        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Author {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Author> for String {
    fn from(value: Author) -> Self {
        value.0
    }
}

/// International Standard Book Number, kept as entered.
///
/// Hyphenation and the 10/13 digit split are deliberately not normalised;
/// the text filter matches against the stored form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isbn(String);

impl Isbn {
    /// Validate and construct an [`Isbn`], trimming surrounding whitespace.
    pub fn new(isbn: impl Into<String>) -> Result<Self, BookValidationError> {
        let isbn = isbn.into();
        let trimmed = isbn.trim();
        let length = trimmed.chars().count();
        if length < ISBN_MIN {
            return Err(BookValidationError::IsbnTooShort { min: ISBN_MIN });
        }
        if length > ISBN_MAX {
            return Err(BookValidationError::IsbnTooLong { max: ISBN_MAX });
        }

        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Isbn> for String {
    fn from(value: Isbn) -> Self {
        value.0
    }
}

/// Fixed catalogue taxonomy.
///
/// The set is closed: payloads naming anything outside it are rejected
/// rather than minted as new categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Fiction,
    Programming,
    Philosophy,
    SelfHelp,
    Science,
    Design,
    History,
    Systems,
}

impl Category {
    /// Every category, in presentation order.
    pub const ALL: [Self; 8] = [
        Self::Fiction,
        Self::Programming,
        Self::Philosophy,
        Self::SelfHelp,
        Self::Science,
        Self::Design,
        Self::History,
        Self::Systems,
    ];

    /// Canonical display form, as stored and matched exactly.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::Programming => "Programming",
            Self::Philosophy => "Philosophy",
            Self::SelfHelp => "Self Help",
            Self::Science => "Science",
            Self::Design => "Design",
            Self::History => "History",
            Self::Systems => "Systems",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BookValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| BookValidationError::UnknownCategory {
                value: value.to_owned(),
            })
    }
}

/// Review rating on the 1 to 5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    /// Numeric rating value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = BookValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(BookValidationError::RatingOutOfRange);
        }

        let value = u8::try_from(value).map_err(|_| BookValidationError::RatingOutOfRange)?;
        Ok(Self(value))
    }
}

impl From<Rating> for i64 {
    fn from(value: Rating) -> Self {
        Self::from(value.0)
    }
}

/// Free-text review comment; empty is allowed and is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewComment(String);

impl ReviewComment {
    /// Validate and construct a [`ReviewComment`], kept verbatim.
    pub fn new(comment: impl Into<String>) -> Result<Self, BookValidationError> {
        let comment = comment.into();
        if comment.chars().count() > COMMENT_MAX {
            return Err(BookValidationError::CommentTooLong { max: COMMENT_MAX });
        }

        Ok(Self(comment))
    }

    /// Whether the reviewer left the comment blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for ReviewComment {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ReviewComment> for String {
    fn from(value: ReviewComment) -> Self {
        value.0
    }
}

impl TryFrom<String> for ReviewComment {
    type Error = BookValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A single review embedded in a book document.
///
/// `username` is a snapshot of the reviewer's name at the time of writing and
/// is never rewritten afterwards, so reviews keep attributing their original
/// author even if the account is renamed or removed.
///
/// Serialises to the camelCase shape stored in the `reviews` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    id: Uuid,
    user_id: UserId,
    username: Username,
    rating: Rating,
    #[serde(default)]
    comment: ReviewComment,
    created_at: DateTime<Utc>,
}

impl Review {
    /// Build a [`Review`] from validated components.
    #[must_use]
    pub fn new(
        id: Uuid,
        user_id: UserId,
        username: Username,
        rating: Rating,
        comment: ReviewComment,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            username,
            rating,
            comment,
            created_at,
        }
    }

    /// Stable review identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identifier of the reviewing user.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Reviewer's username as it was when the review was written.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Rating on the 1 to 5 scale.
    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Free-text comment, possibly empty.
    #[must_use]
    pub fn comment(&self) -> &ReviewComment {
        &self.comment
    }

    /// When the review was appended.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// The validated fields shared by book creation and replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookAttributes {
    pub title: Title,
    pub author: Author,
    pub isbn: Isbn,
    pub category: Category,
}

/// A catalogued book together with its embedded reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: Uuid,
    collection_id: Uuid,
    title: Title,
    author: Author,
    isbn: Isbn,
    category: Category,
    added_at: DateTime<Utc>,
    reviews: Vec<Review>,
}

impl Book {
    /// Build a [`Book`] from validated components.
    #[must_use]
    pub fn new(
        id: Uuid,
        collection_id: Uuid,
        attributes: BookAttributes,
        added_at: DateTime<Utc>,
        reviews: Vec<Review>,
    ) -> Self {
        let BookAttributes {
            title,
            author,
            isbn,
            category,
        } = attributes;
        Self {
            id,
            collection_id,
            title,
            author,
            isbn,
            category,
            added_at,
            reviews,
        }
    }

    /// Stable book identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Collection the book belongs to.
    #[must_use]
    pub fn collection_id(&self) -> Uuid {
        self.collection_id
    }

    /// Book title.
    #[must_use]
    pub fn title(&self) -> &Title {
        &self.title
    }

    /// Book author.
    #[must_use]
    pub fn author(&self) -> &Author {
        &self.author
    }

    /// ISBN as entered.
    #[must_use]
    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    /// Catalogue category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// When the book entered the catalogue; newest-first sort key.
    #[must_use]
    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Reviews in append order.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }
}
