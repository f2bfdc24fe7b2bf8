//! Tests for the SQLite and in-memory leaderboard stores.

use std::num::NonZeroUsize;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::NamedTempFile;

use word_battle::{
    DEFAULT_LIMIT, Difficulty, DifficultyFilter, InMemoryLeaderboard, LeaderboardEntry,
    LeaderboardStore, LeaderboardSubmission, SqliteLeaderboard, StoreErrorKind,
};

/// Creates a migrated store in a temporary file. The file handle must stay in
/// scope to keep the database alive.
fn setup_sqlite() -> (NamedTempFile, SqliteLeaderboard) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteLeaderboard::open(&db_path).expect("Failed to open store");
    (db_file, store)
}

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, minute, 0)
        .single()
        .expect("valid date")
}

fn entry(name: &str, score: u32, difficulty: Difficulty, minute: u32) -> LeaderboardEntry {
    LeaderboardEntry::new(
        name.to_string(),
        score,
        difficulty,
        at(minute),
        vec!["Fourmi".to_string()],
        "fr".to_string(),
    )
}

fn limit(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("nonzero")
}

fn names(entries: &[word_battle::StoredEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|stored| stored.entry().player_name().clone())
        .collect()
}

/// Runs the same ranking checks against any store.
async fn check_ranking(store: &dyn LeaderboardStore) {
    store
        .submit(entry("Alice", 3, Difficulty::Easy, 1))
        .await
        .expect("submit failed");
    store
        .submit(entry("Bob", 7, Difficulty::Hard, 2))
        .await
        .expect("submit failed");
    store
        .submit(entry("Carol", 7, Difficulty::Hard, 0))
        .await
        .expect("submit failed");
    store
        .submit(entry("Dave", 5, Difficulty::Medium, 3))
        .await
        .expect("submit failed");

    let all = store
        .list_top(DifficultyFilter::All, DEFAULT_LIMIT)
        .await
        .expect("list failed");
    // Equal scores: the earlier game ranks first.
    assert_eq!(names(&all), vec!["Carol", "Bob", "Dave", "Alice"]);

    let hard = store
        .list_top(DifficultyFilter::Only(Difficulty::Hard), limit(5))
        .await
        .expect("list failed");
    assert_eq!(names(&hard), vec!["Carol", "Bob"]);

    let top_two = store
        .list_top(DifficultyFilter::All, limit(2))
        .await
        .expect("list failed");
    assert_eq!(top_two.len(), 2);
}

#[tokio::test]
async fn test_sqlite_ranking() {
    let (_db, store) = setup_sqlite();
    check_ranking(&store).await;
}

#[tokio::test]
async fn test_in_memory_ranking() {
    let store = InMemoryLeaderboard::new();
    check_ranking(&store).await;
}

#[tokio::test]
async fn test_sqlite_round_trips_entry() {
    let (_db, store) = setup_sqlite();
    let submitted = LeaderboardEntry::new(
        "  Zoé ".to_string(),
        4,
        Difficulty::Medium,
        at(30),
        vec![
            "Ant".to_string(),
            "Anteater".to_string(),
            "Lion".to_string(),
        ],
        "en".to_string(),
    );

    let stored = store.submit(submitted).await.expect("submit failed");
    assert!(*stored.id() > 0);
    assert_eq!(stored.entry().player_name(), "Zoé");

    let listed = store
        .list_top(DifficultyFilter::All, DEFAULT_LIMIT)
        .await
        .expect("list failed");
    assert_eq!(listed, vec![stored]);
    assert_eq!(*listed[0].entry().date(), at(30));
    assert_eq!(listed[0].entry().words().len(), 3);
}

#[tokio::test]
async fn test_duplicates_are_kept() {
    let (_db, store) = setup_sqlite();
    let first = store
        .submit(entry("Ada", 2, Difficulty::Easy, 5))
        .await
        .expect("submit failed");
    let second = store
        .submit(entry("Ada", 2, Difficulty::Easy, 5))
        .await
        .expect("submit failed");
    assert_ne!(first.id(), second.id());

    let listed = store
        .list_top(DifficultyFilter::All, DEFAULT_LIMIT)
        .await
        .expect("list failed");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id(), first.id());
}

#[tokio::test]
async fn test_invalid_names_are_refused() {
    let (_db, sqlite) = setup_sqlite();
    let memory = InMemoryLeaderboard::new();
    let stores: [&dyn LeaderboardStore; 2] = [&sqlite, &memory];

    for store in stores {
        let err = store
            .submit(entry("   ", 1, Difficulty::Easy, 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::InvalidEntry);

        let err = store
            .submit(entry(&"x".repeat(21), 1, Difficulty::Easy, 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::InvalidEntry);

        let listed = store
            .list_top(DifficultyFilter::All, DEFAULT_LIMIT)
            .await
            .expect("list failed");
        assert!(listed.is_empty());
    }
}

#[tokio::test]
async fn test_reopening_keeps_entries() {
    let (db, store) = setup_sqlite();
    store
        .submit(entry("Ada", 9, Difficulty::Hard, 0))
        .await
        .expect("submit failed");
    drop(store);

    let reopened = SqliteLeaderboard::open(db.path().to_str().expect("Invalid path"))
        .expect("reopen failed");
    let listed = reopened
        .list_top(DifficultyFilter::All, DEFAULT_LIMIT)
        .await
        .expect("list failed");
    assert_eq!(names(&listed), vec!["Ada"]);
}

#[test]
fn test_difficulty_filter_parses() {
    assert_eq!(DifficultyFilter::from_str("all"), Ok(DifficultyFilter::All));
    assert_eq!(DifficultyFilter::from_str("ALL"), Ok(DifficultyFilter::All));
    assert_eq!(
        DifficultyFilter::from_str("Hard"),
        Ok(DifficultyFilter::Only(Difficulty::Hard))
    );
    assert!(DifficultyFilter::from_str("extreme").is_err());
    assert_eq!(DifficultyFilter::Only(Difficulty::Easy).to_string(), "easy");
    assert!(DifficultyFilter::All.admits(Difficulty::Medium));
    assert!(!DifficultyFilter::Only(Difficulty::Hard).admits(Difficulty::Easy));
}

#[test]
fn test_submission_fills_defaults() {
    let submission: LeaderboardSubmission =
        serde_json::from_str(r#"{"playerName": "Ada", "score": 0, "difficulty": "easy"}"#)
            .expect("parse failed");
    let entry = submission.into_entry(at(45)).expect("convert failed");
    assert_eq!(*entry.score(), 0);
    assert_eq!(*entry.date(), at(45));
    assert!(entry.words().is_empty());
    assert_eq!(entry.language(), "fr");
}

#[test]
fn test_submission_requires_fields() {
    let submission: LeaderboardSubmission =
        serde_json::from_str(r#"{"playerName": "Ada", "difficulty": "easy"}"#)
            .expect("parse failed");
    let err = submission.into_entry(at(0)).unwrap_err();
    assert_eq!(err.kind, StoreErrorKind::InvalidEntry);
    assert_eq!(err.message, "Missing required fields");
}
