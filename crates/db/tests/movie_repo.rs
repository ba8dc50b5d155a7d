//! Integration tests for `MovieRepo` against a real database.
//!
//! Each test gets a fresh database with the crate's migrations applied:
//! - Insert, read back, existence
//! - Full replace and delete
//! - Mixed units of work and their row counts
//! - Atomicity when a unit fails partway
//! - The off-theaters search cutoff

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use movies_core::movie::{Movie, Room};
use movies_core::repository::{MovieFilter, MovieRepository, RepoError, UnitOfWork};
use movies_core::types::Timestamp;
use movies_db::repositories::MovieRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn release() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap()
}

fn new_movie(title: &str) -> Movie {
    Movie {
        id: 0,
        title: title.to_string(),
        summary: "A girl wanders into a world of spirits.".to_string(),
        poster_uri: "https://posters.example.com/spirited.png".to_string(),
        release_date: release(),
        off_theaters_date: release() + Duration::days(30),
        room: Room::Standard,
        duration: Duration::minutes(125),
    }
}

async fn insert(repo: &MovieRepo, movie: Movie) -> Movie {
    let mut work = UnitOfWork::new();
    work.add(movie);
    assert_eq!(repo.save_changes(work).await.unwrap(), 1);

    repo.find_all().await.unwrap().pop().unwrap()
}

// ---------------------------------------------------------------------------
// Insert / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_insert_then_find_by_id(pool: PgPool) {
    let repo = MovieRepo::new(pool);

    let stored = insert(&repo, new_movie("Spirited Away")).await;

    assert!(stored.id > 0);
    let found = repo.find_by_id(stored.id).await.unwrap().unwrap();
    assert_eq!(found, Movie { id: stored.id, ..new_movie("Spirited Away") });
    assert!(repo.any(stored.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_id_is_absent(pool: PgPool) {
    let repo = MovieRepo::new(pool);

    assert_eq!(repo.find_by_id(999).await.unwrap(), None);
    assert!(!repo.any(999).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_all_orders_by_id(pool: PgPool) {
    let repo = MovieRepo::new(pool);
    let first = insert(&repo, new_movie("First")).await;
    let second = insert(&repo, new_movie("Second")).await;

    let ids: Vec<_> = repo.find_all().await.unwrap().iter().map(|m| m.id).collect();

    assert_eq!(ids, vec![first.id, second.id]);
}

// ---------------------------------------------------------------------------
// Replace / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_overwrites_every_field(pool: PgPool) {
    let repo = MovieRepo::new(pool);
    let stored = insert(&repo, new_movie("Spirited Away")).await;

    let replacement = Movie {
        id: stored.id,
        title: "Princess Mononoke".to_string(),
        summary: "A prince is caught in a war between forest gods and humans.".to_string(),
        poster_uri: "https://posters.example.com/mononoke.png".to_string(),
        release_date: release() + Duration::days(2),
        off_theaters_date: release() + Duration::days(60),
        room: Room::ThreeD,
        duration: Duration::minutes(134),
    };
    let mut work = UnitOfWork::new();
    work.update(replacement.clone());

    assert_eq!(repo.save_changes(work).await.unwrap(), 1);
    assert_eq!(repo.find_by_id(stored.id).await.unwrap(), Some(replacement));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_removes_row(pool: PgPool) {
    let repo = MovieRepo::new(pool);
    let stored = insert(&repo, new_movie("Doomed")).await;

    let mut work = UnitOfWork::new();
    work.remove(stored.id);

    assert_eq!(repo.save_changes(work).await.unwrap(), 1);
    assert!(!repo.any(stored.id).await.unwrap());
    assert_eq!(repo.find_by_id(stored.id).await.unwrap(), None);
}

// ---------------------------------------------------------------------------
// Unit of work
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_mixed_unit_returns_total_rows_affected(pool: PgPool) {
    let repo = MovieRepo::new(pool);
    let kept = insert(&repo, new_movie("Kept")).await;
    let dropped = insert(&repo, new_movie("Dropped")).await;

    let mut work = UnitOfWork::new();
    work.add(new_movie("Added"));
    work.update(Movie {
        id: kept.id,
        title: "Kept and renamed".to_string(),
        ..new_movie("unused")
    });
    work.remove(dropped.id);
    work.remove(dropped.id + 1000);

    assert_eq!(repo.save_changes(work).await.unwrap(), 3);

    let titles: Vec<_> = repo
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(titles, vec!["Kept and renamed".to_string(), "Added".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_unit_commits_nothing(pool: PgPool) {
    let repo = MovieRepo::new(pool);

    assert_eq!(repo.save_changes(UnitOfWork::new()).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failing_unit_leaves_store_untouched(pool: PgPool) {
    let repo = MovieRepo::new(pool);
    let existing = insert(&repo, new_movie("Existing")).await;

    // The second insert overflows the VARCHAR(100) title column.
    let mut work = UnitOfWork::new();
    work.add(new_movie("Would be added"));
    work.add(new_movie(&"x".repeat(101)));
    work.remove(existing.id);

    let result = repo.save_changes(work).await;

    assert_matches!(result, Err(RepoError::Backend(_)));
    let all = repo.find_all().await.unwrap();
    assert_eq!(all, vec![existing]);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_off_theaters_search_is_strictly_after_cutoff(pool: PgPool) {
    let repo = MovieRepo::new(pool);
    let cutoff = release() + Duration::days(30);
    for (title, off) in [
        ("Before", cutoff - Duration::seconds(1)),
        ("At", cutoff),
        ("After", cutoff + Duration::seconds(1)),
    ] {
        insert(
            &repo,
            Movie {
                off_theaters_date: off,
                ..new_movie(title)
            },
        )
        .await;
    }

    let found = repo
        .search(MovieFilter::OffTheatersAfter(cutoff))
        .await
        .unwrap();

    let titles: Vec<_> = found.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["After"]);
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_unrepresentable_duration_is_reported_corrupt(pool: PgPool) {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO movies \
             (title, summary, poster_uri, release_date, off_theaters_date, room, duration_secs) \
         VALUES ('Broken', 'A row no entity can hold.', 'https://x.io/', $1, $2, 'Imax', $3) \
         RETURNING id",
    )
    .bind(release())
    .bind(release() + Duration::days(1))
    .bind(i64::MAX)
    .fetch_one(&pool)
    .await
    .unwrap();
    let repo = MovieRepo::new(pool);

    assert_matches!(
        repo.find_by_id(id).await,
        Err(RepoError::Corrupt { id: corrupt_id, .. }) if corrupt_id == id
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_room_check_constraint_rejects_unknown_room(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO movies \
             (title, summary, poster_uri, release_date, off_theaters_date, room, duration_secs) \
         VALUES ('Odd', 'A room that does not exist.', 'https://x.io/', $1, $2, '4DX', 600)",
    )
    .bind(release())
    .bind(release() + Duration::days(1))
    .execute(&pool)
    .await;

    let err = result.unwrap_err();
    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.constraint(), Some("ck_movies_room"));
}
