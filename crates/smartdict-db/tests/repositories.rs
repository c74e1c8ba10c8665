//! Integration tests for the `SQLite` repositories against an in-memory database.

use smartdict_core::{
    DictationItem, HistoryRecord, HistoryRepository, Language, Mode, NewSavedDictation, NewUser,
    RepositoryError, SessionConfig, UserRepository,
};
use smartdict_db::TestDb;

fn record(item_count: usize) -> HistoryRecord {
    HistoryRecord {
        language: Language::Chinese,
        mode: Mode::Passage,
        item_count,
        elapsed_seconds: 42,
    }
}

fn session() -> SessionConfig {
    SessionConfig::new(
        vec![
            DictationItem::new("貓"),
            DictationItem::new("，").with_spoken("逗號"),
        ],
        Language::Chinese,
        Mode::Vocabulary,
    )
}

#[tokio::test]
async fn history_is_listed_newest_first() {
    let db = TestDb::new().await.unwrap();
    let repos = db.repos();

    repos.history.insert("u1", &record(1), 50).await.unwrap();
    repos.history.insert("u1", &record(2), 50).await.unwrap();
    repos.history.insert("u2", &record(9), 50).await.unwrap();

    let entries = repos.history.list("u1").await.unwrap();
    let counts: Vec<_> = entries.iter().map(|e| e.item_count).collect();
    assert_eq!(counts, vec![2, 1]);
    assert_eq!(entries[0].language, Language::Chinese);
    assert_eq!(entries[0].elapsed_seconds, 42);
}

#[tokio::test]
async fn history_is_trimmed_to_limit() {
    let db = TestDb::new().await.unwrap();
    let repo = db.history_repository();

    for n in 0..55 {
        repo.insert("u1", &record(n), 50).await.unwrap();
    }

    let entries = repo.list("u1").await.unwrap();
    assert_eq!(entries.len(), 50);
    assert_eq!(entries.first().unwrap().item_count, 54);
    assert_eq!(entries.last().unwrap().item_count, 5);
}

#[tokio::test]
async fn history_clear_only_affects_one_user() {
    let db = TestDb::new().await.unwrap();
    let repos = db.repos();

    repos.history.insert("u1", &record(1), 50).await.unwrap();
    repos.history.insert("u2", &record(1), 50).await.unwrap();
    repos.history.clear("u1").await.unwrap();

    assert!(repos.history.list("u1").await.unwrap().is_empty());
    assert_eq!(repos.history.list("u2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn library_round_trips_items() {
    let db = TestDb::new().await.unwrap();
    let repos = db.repos();

    let saved = repos
        .library
        .save(NewSavedDictation::new("u1", "", &session()))
        .await
        .unwrap();
    assert_eq!(saved.title, "未命名默書");

    let fetched = repos.library.get("u1", saved.id).await.unwrap();
    assert_eq!(fetched.items, saved.items);
    assert_eq!(fetched.items[1].text_to_speak(), "逗號");
    assert_eq!(fetched.mode, Mode::Vocabulary);

    // Presets are scoped per user
    assert!(matches!(
        repos.library.get("u2", saved.id).await,
        Err(RepositoryError::NotFound(_))
    ));
}

#[tokio::test]
async fn library_lists_newest_first_and_deletes() {
    let db = TestDb::new().await.unwrap();
    let repos = db.repos();

    let first = repos
        .library
        .save(NewSavedDictation::new("u1", "Week 1", &session()))
        .await
        .unwrap();
    let second = repos
        .library
        .save(NewSavedDictation::new("u1", "Week 2", &session()))
        .await
        .unwrap();

    let titles: Vec<_> = repos
        .library
        .list("u1")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["Week 2", "Week 1"]);

    repos.library.delete("u1", first.id).await.unwrap();
    assert!(matches!(
        repos.library.delete("u1", first.id).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert_eq!(repos.library.list("u1").await.unwrap()[0].id, second.id);
}

#[tokio::test]
async fn deleting_user_removes_their_data() {
    let db = TestDb::new().await.unwrap();
    let repos = db.repos();

    let user = NewUser {
        name: "Mei".into(),
        avatar: "🐰".into(),
        is_custom: false,
    }
    .into_profile();
    repos.users.insert(&user).await.unwrap();
    repos
        .library
        .save(NewSavedDictation::new(&user.id, "x", &session()))
        .await
        .unwrap();
    repos.history.insert(&user.id, &record(3), 50).await.unwrap();

    let fetched = repos.users.get(&user.id).await.unwrap();
    assert_eq!(fetched, user);

    repos.users.delete(&user.id).await.unwrap();

    assert!(repos.users.list().await.unwrap().is_empty());
    assert!(repos.library.list(&user.id).await.unwrap().is_empty());
    assert!(repos.history.list(&user.id).await.unwrap().is_empty());
    assert!(matches!(
        repos.users.get(&user.id).await,
        Err(RepositoryError::NotFound(_))
    ));
}

#[tokio::test]
async fn duplicate_user_id_is_rejected() {
    let db = TestDb::new().await.unwrap();
    let repo = db.user_repository();

    let user = NewUser {
        name: "Ka Ho".into(),
        avatar: "🐶".into(),
        is_custom: false,
    }
    .into_profile();
    repo.insert(&user).await.unwrap();

    assert!(matches!(
        repo.insert(&user).await,
        Err(RepositoryError::AlreadyExists(_))
    ));
}
