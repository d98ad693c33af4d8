//! Random sample catalogue generation.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::rngs::SmallRng;
use uuid::Uuid;

use crate::domain::{
    Author, Book, BookAttributes, BookValidationError, Category, Isbn, RATING_MAX, RATING_MIN,
    Rating, Review, ReviewComment, Title, User,
};

const TITLE_HEADS: [&str; 8] = [
    "The Silent",
    "A Field Guide to the",
    "Notes on the",
    "The Last",
    "Beyond the",
    "The Care of the",
    "Letters from the",
    "A Short History of the",
];

const TITLE_TAILS: [&str; 8] = [
    "Archive",
    "Harbour",
    "Compiler",
    "Orchard",
    "Meridian",
    "Workshop",
    "Lighthouse",
    "Expedition",
];

const FIRST_NAMES: [&str; 8] = [
    "Nadia", "Tomas", "Priya", "Callum", "Ines", "Viktor", "Maren", "Dashiell",
];

const LAST_NAMES: [&str; 8] = [
    "Okafor", "Lindqvist", "Marchetti", "Ba", "Sorensen", "Kavanagh", "Ames", "Petrov",
];

const COMMENTS: [&str; 6] = [
    "Could not put it down.",
    "Slow start, strong finish.",
    "Lent my copy out and never got it back.",
    "Re-read it every couple of years.",
    "The middle chapters drag a little.",
    "Better than I expected from the cover.",
];

/// Chance that a generated review carries a comment rather than just a rating.
const COMMENT_PROBABILITY: f64 = 0.6;

/// How far back in time generated books are spread.
const ADDED_WITHIN_DAYS: i64 = 14;

const MAX_REVIEWS_PER_BOOK: usize = 3;

/// Generate `count` random books for `collection_id`, reviewed by `reviewer`.
///
/// Books are spread over the previous two weeks so the newest-first catalogue
/// ordering is visible immediately; each book carries up to three reviews.
///
/// # Errors
/// Returns [`BookValidationError`] if a generated component fails domain
/// validation.
pub fn generate_books(
    rng: &mut SmallRng,
    collection_id: Uuid,
    reviewer: &User,
    count: usize,
    now: DateTime<Utc>,
) -> Result<Vec<Book>, BookValidationError> {
    (0..count)
        .map(|_| generate_book(rng, collection_id, reviewer, now))
        .collect()
}

fn generate_book(
    rng: &mut SmallRng,
    collection_id: Uuid,
    reviewer: &User,
    now: DateTime<Utc>,
) -> Result<Book, BookValidationError> {
    let title = format!("{} {}", pick(rng, &TITLE_HEADS), pick(rng, &TITLE_TAILS));
    let author = format!("{} {}", pick(rng, &FIRST_NAMES), pick(rng, &LAST_NAMES));
    let isbn = format!("978-{:09}", rng.gen_range(0..1_000_000_000u64));
    let category = pick(rng, &Category::ALL);

    let attributes = BookAttributes {
        title: Title::new(title)?,
        author: Author::new(author)?,
        isbn: Isbn::new(isbn)?,
        category,
    };

    let added_at = now
        - Duration::days(rng.gen_range(0..ADDED_WITHIN_DAYS))
        - Duration::minutes(rng.gen_range(0..24 * 60));

    let review_count = rng.gen_range(0..=MAX_REVIEWS_PER_BOOK);
    let reviews = (0..review_count)
        .map(|offset| generate_review(rng, reviewer, added_at, offset))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Book::new(
        Uuid::new_v4(),
        collection_id,
        attributes,
        added_at,
        reviews,
    ))
}

fn generate_review(
    rng: &mut SmallRng,
    reviewer: &User,
    added_at: DateTime<Utc>,
    offset: usize,
) -> Result<Review, BookValidationError> {
    let rating = Rating::try_from(rng.gen_range(RATING_MIN..=RATING_MAX))?;
    let comment = if rng.gen_bool(COMMENT_PROBABILITY) {
        ReviewComment::new(pick(rng, &COMMENTS))?
    } else {
        ReviewComment::default()
    };
    // Stagger review timestamps so append order matches creation order.
    let stagger = i64::try_from(offset).unwrap_or(i64::MAX).saturating_mul(48);
    let created_at = added_at + Duration::hours(rng.gen_range(1..48) + stagger);

    Ok(Review::new(
        Uuid::new_v4(),
        reviewer.id().clone(),
        reviewer.username().clone(),
        rating,
        comment,
        created_at,
    ))
}

#[expect(
    clippy::indexing_slicing,
    reason = "gen_range(0..len) keeps the index in bounds"
)]
fn pick<T: Copy>(rng: &mut SmallRng, pool: &[T]) -> T {
    pool[rng.gen_range(0..pool.len())]
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rand::SeedableRng;
    use rstest::rstest;

    fn reviewer() -> User {
        User::from_parts("123e4567-e89b-12d3-a456-426614174000", "admin", true)
    }

    #[rstest]
    fn generates_the_requested_number_of_books() {
        let mut rng = SmallRng::seed_from_u64(7);
        let collection_id = Uuid::new_v4();

        let books = generate_books(&mut rng, collection_id, &reviewer(), 15, Utc::now())
            .expect("generation succeeds");

        assert_eq!(books.len(), 15);
        assert!(books.iter().all(|b| b.collection_id() == collection_id));
    }

    #[rstest]
    fn generated_books_are_recent_and_lightly_reviewed() {
        let mut rng = SmallRng::seed_from_u64(42);
        let now = Utc::now();

        let books = generate_books(&mut rng, Uuid::new_v4(), &reviewer(), 30, now)
            .expect("generation succeeds");

        for book in &books {
            assert!(book.added_at() <= now);
            assert!(now - book.added_at() <= Duration::days(ADDED_WITHIN_DAYS + 1));
            assert!(book.reviews().len() <= MAX_REVIEWS_PER_BOOK);
            for review in book.reviews() {
                assert_eq!(review.username().as_ref(), "admin");
                assert!(review.created_at() > book.added_at());
            }
        }
    }

    #[rstest]
    fn seeded_rng_makes_generation_deterministic() {
        let collection_id = Uuid::nil();
        let now = Utc::now();

        let mut first_rng = SmallRng::seed_from_u64(99);
        let first = generate_books(&mut first_rng, collection_id, &reviewer(), 5, now)
            .expect("generation succeeds");
        let mut second_rng = SmallRng::seed_from_u64(99);
        let second = generate_books(&mut second_rng, collection_id, &reviewer(), 5, now)
            .expect("generation succeeds");

        let first_titles: Vec<_> = first.iter().map(|b| b.title().as_ref().to_owned()).collect();
        let second_titles: Vec<_> = second
            .iter()
            .map(|b| b.title().as_ref().to_owned())
            .collect();
        assert_eq!(first_titles, second_titles);
    }
}
