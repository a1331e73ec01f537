use super::*;
use crate::error::KvError;
use crate::kv::{FileKeyValueStore, MemoryKeyValueStore};
use async_trait::async_trait;
use chrono::TimeZone;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;

/// Memory backend whose reads and writes can be switched to fail
#[derive(Default)]
struct FlakyBackend {
    inner: MemoryKeyValueStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyBackend {
    fn failure(key: &str) -> KvError {
        KvError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyBackend {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::failure(key));
        }
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), KvError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::failure(key));
        }
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), KvError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::failure(key));
        }
        self.inner.remove_item(key).await
    }
}

fn create_movie(id: &str, title: &str) -> Movie {
    Movie::new(
        id,
        title,
        "2021",
        vec!["Sci-Fi".to_string()],
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
}

fn memory_backend() -> Arc<MemoryKeyValueStore> {
    Arc::new(MemoryKeyValueStore::new())
}

async fn stored_ids(backend: Arc<dyn KeyValueStore>) -> Vec<String> {
    let fresh = MovieStore::open(backend).await.unwrap();
    fresh.all().into_iter().map(|m| m.id).collect()
}

#[tokio::test]
async fn test_add_update_then_reload() {
    let backend = memory_backend();
    let store = MovieStore::open(backend.clone()).await.unwrap();

    let dune = create_movie("1", "Dune");
    store.add(dune.clone()).await.unwrap();

    let mut watched = dune.clone();
    watched.watched = true;
    assert_eq!(store.update(watched).await.unwrap(), Outcome::Applied);

    let reloaded = MovieStore::open(backend).await.unwrap();
    let movies = reloaded.all();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, "1");
    assert!(movies[0].watched);
}

#[tokio::test]
async fn test_load_without_entry_is_empty() {
    let store = MovieStore::new(memory_backend());
    let movies = store.load().await.unwrap();
    assert!(movies.is_empty());
    assert!(store.is_empty());
    assert!(!store.is_dirty());
}

#[tokio::test]
async fn test_load_malformed_payload_is_empty_and_backed_up() {
    let backend = memory_backend();
    backend.set_item(MOVIE_STORAGE_KEY, "{not json").await.unwrap();

    let store = MovieStore::open(backend.clone()).await.unwrap();
    assert!(store.is_empty());
    assert_eq!(
        backend.get_item(MOVIE_BACKUP_KEY).await.unwrap().as_deref(),
        Some("{not json")
    );

    // Wrong shape is treated the same as invalid JSON
    backend.set_item(MOVIE_STORAGE_KEY, r#"{"id":"1"}"#).await.unwrap();
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_load_read_failure_is_reported_and_cache_kept() {
    let backend = Arc::new(FlakyBackend::default());
    let store = MovieStore::open(backend.clone()).await.unwrap();
    store.add(create_movie("1", "Dune")).await.unwrap();

    backend.fail_reads.store(true, Ordering::SeqCst);
    let err = store.load().await.unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_update_replaces_every_field() {
    let store = MovieStore::new(memory_backend());
    let mut original = create_movie("1", "Dune");
    original.rating = Some(8.0);
    original.review = Some("sandy".to_string());
    original.is_favorite = Some(true);
    store.add(original).await.unwrap();

    let replacement = Movie {
        id: "1".to_string(),
        title: "Dune: Part One".to_string(),
        year: "2021".to_string(),
        genres: vec![],
        watched: true,
        date_added: "2024-01-01T00:00:00.000Z".to_string(),
        date_watched: None,
        is_favorite: None,
        rating: None,
        review: None,
        notes: Some("imax".to_string()),
        rewatch: None,
        hide_from_recent: None,
    };
    store.update(replacement.clone()).await.unwrap();

    assert_eq!(store.get("1"), Some(replacement));
}

#[tokio::test]
async fn test_update_unknown_id_is_noop() {
    let backend = memory_backend();
    let store = MovieStore::new(backend.clone());
    store.add(create_movie("1", "Dune")).await.unwrap();
    let before = store.all();

    let outcome = store.update(create_movie("2", "Arrival")).await.unwrap();
    assert_eq!(outcome, Outcome::NotFound);
    assert_eq!(store.all(), before);
    assert_eq!(stored_ids(backend).await, vec!["1"]);
}

#[tokio::test]
async fn test_update_unknown_id_does_not_write() {
    let backend = memory_backend();
    let store = MovieStore::new(backend.clone());

    store.update(create_movie("9", "Heat")).await.unwrap();
    assert_eq!(backend.get_item(MOVIE_STORAGE_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_delete_twice_equals_once() {
    let backend = memory_backend();
    let store = MovieStore::new(backend.clone());
    store.add(create_movie("1", "Dune")).await.unwrap();
    store.add(create_movie("2", "Arrival")).await.unwrap();

    assert_eq!(store.delete("1").await.unwrap(), Outcome::Applied);
    let after_first = store.all();
    assert_eq!(store.delete("1").await.unwrap(), Outcome::NotFound);

    assert_eq!(store.all(), after_first);
    assert_eq!(stored_ids(backend).await, vec!["2"]);
}

#[tokio::test]
async fn test_duplicate_id_rejected() {
    let store = MovieStore::new(memory_backend());
    store.add(create_movie("1", "Dune")).await.unwrap();

    let err = store.add(create_movie("1", "Dune (again)")).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(ref id) if id == "1"));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("1").unwrap().title, "Dune");
}

#[tokio::test]
async fn test_invalid_records_rejected() {
    let store = MovieStore::new(memory_backend());

    let err = store.add(create_movie("1", "  ")).await.unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));

    store.add(create_movie("1", "Dune")).await.unwrap();
    let mut out_of_range = create_movie("1", "Dune");
    out_of_range.rating = Some(10.5);
    let err = store.update(out_of_range).await.unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));
    assert_eq!(store.get("1").unwrap().rating, None);
}

#[tokio::test]
async fn test_persist_failure_keeps_change_in_memory_until_flush() {
    let backend = Arc::new(FlakyBackend::default());
    let store = MovieStore::open(backend.clone()).await.unwrap();

    backend.fail_writes.store(true, Ordering::SeqCst);
    let err = store.add(create_movie("1", "Dune")).await.unwrap_err();
    assert!(err.is_persistence_failure());
    assert!(store.contains("1"));
    assert!(store.is_dirty());
    assert!(stored_ids(backend.clone()).await.is_empty());

    backend.fail_writes.store(false, Ordering::SeqCst);
    store.flush().await.unwrap();
    assert!(!store.is_dirty());
    assert_eq!(stored_ids(backend).await, vec!["1"]);
}

#[tokio::test]
async fn test_staged_change_visible_before_persist() {
    let backend = memory_backend();
    let store = MovieStore::new(backend.clone());

    let pending = store.stage_add(create_movie("1", "Dune")).unwrap();
    assert!(store.contains("1"));
    assert!(store.is_dirty());
    assert_eq!(backend.get_item(MOVIE_STORAGE_KEY).await.unwrap(), None);

    pending.persist().await.unwrap();
    assert!(!store.is_dirty());
    assert_eq!(stored_ids(backend).await, vec!["1"]);
}

#[tokio::test]
async fn test_unpersisted_change_lost_on_restart() {
    let backend = memory_backend();
    let store = MovieStore::new(backend.clone());
    store.add(create_movie("1", "Dune")).await.unwrap();

    let pending = store.stage_add(create_movie("2", "Arrival")).unwrap();
    drop(pending);

    assert_eq!(store.len(), 2);
    assert_eq!(stored_ids(backend).await, vec!["1"]);
}

#[tokio::test]
async fn test_older_snapshot_never_overwrites_newer() {
    let backend = memory_backend();
    let store = MovieStore::new(backend.clone());

    let first = store.stage_add(create_movie("1", "Dune")).unwrap();
    let second = store.stage_add(create_movie("2", "Arrival")).unwrap();
    assert!(second.generation() > first.generation());

    second.persist().await.unwrap();
    assert_eq!(first.persist().await.unwrap(), Outcome::Applied);

    assert_eq!(stored_ids(backend).await, vec!["1", "2"]);
    assert!(!store.is_dirty());
}

#[tokio::test]
async fn test_interleaved_adds_keep_ids_unique() {
    let backend = memory_backend();
    let store = MovieStore::new(backend.clone());

    let adds = (0..20).map(|i| store.add(create_movie(&i.to_string(), "Movie")));
    for result in futures::future::join_all(adds).await {
        result.unwrap();
    }
    let dupes = (0..5).map(|i| store.add(create_movie(&i.to_string(), "Again")));
    let rejected = futures::future::join_all(dupes)
        .await
        .into_iter()
        .filter(|r| matches!(r, Err(StoreError::DuplicateId(_))))
        .count();
    assert_eq!(rejected, 5);

    let ids: HashSet<String> = store.all().into_iter().map(|m| m.id).collect();
    assert_eq!(ids.len(), 20);
    assert_eq!(store.len(), 20);
    assert_eq!(stored_ids(backend).await.len(), 20);
}

#[tokio::test]
async fn test_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let backend: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(dir.path()));
    let store = MovieStore::open(backend.clone()).await.unwrap();

    let mut full = create_movie("1", "Alien");
    full.watched = true;
    full.date_watched = Some("2024-01-02T00:00:00.000Z".to_string());
    full.is_favorite = Some(true);
    full.rating = Some(9.5);
    full.review = Some("tense".to_string());
    full.notes = Some("director's cut".to_string());
    full.rewatch = Some(true);
    full.hide_from_recent = Some(true);
    store.add(full).await.unwrap();
    store.add(create_movie("2", "Heat")).await.unwrap();

    let reloaded = MovieStore::open(backend).await.unwrap();
    assert_eq!(reloaded.all(), store.all());
}

#[tokio::test]
async fn test_reads_legacy_payload() {
    let backend = memory_backend();
    backend
        .set_item(
            MOVIE_STORAGE_KEY,
            r#"[{"id":"1712345678901","title":"Her","year":"2013","genres":["Romance","Drama"],"watched":false,"dateAdded":"2024-04-05T19:34:38.901Z","isFavorite":false}]"#,
        )
        .await
        .unwrap();

    let store = MovieStore::open(backend).await.unwrap();
    let her = store.get("1712345678901").unwrap();
    assert_eq!(her.genres, vec!["Romance", "Drama"]);
    assert_eq!(her.is_favorite, Some(false));
}

#[tokio::test]
async fn test_clear_removes_everything() {
    let backend = memory_backend();
    let store = MovieStore::new(backend.clone());
    store.add(create_movie("1", "Dune")).await.unwrap();

    store.clear().await.unwrap();
    assert!(store.is_empty());
    assert_eq!(backend.get_item(MOVIE_STORAGE_KEY).await.unwrap(), None);
    assert!(!store.is_dirty());
}

#[tokio::test]
async fn test_next_id_skips_taken_ids() {
    let store = MovieStore::new(memory_backend());
    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

    let first = store.next_id(now);
    assert_eq!(first, "1700000000000");
    store.add(create_movie(&first, "Dune")).await.unwrap();

    assert_eq!(store.next_id(now), "1700000000001");
}

/// Memory backend whose reads yield to the scheduler before answering
#[derive(Default)]
struct YieldingBackend {
    inner: MemoryKeyValueStore,
}

#[async_trait]
impl KeyValueStore for YieldingBackend {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        tokio::task::yield_now().await;
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), KvError> {
        self.inner.remove_item(key).await
    }
}

#[tokio::test]
async fn test_add_during_reload_survives() {
    let backend = Arc::new(YieldingBackend::default());
    let store = MovieStore::new(backend.clone());

    let (loaded, added) = tokio::join!(store.load(), store.add(create_movie("1", "Dune")));
    added.unwrap();
    assert_eq!(ids_of(&loaded.unwrap()), vec!["1"]);

    assert!(store.contains("1"));
    assert!(!store.is_dirty());
    assert_eq!(stored_ids(backend).await, vec!["1"]);
}

#[tokio::test]
async fn test_legacy_record_can_still_be_updated() {
    let backend = memory_backend();
    backend
        .set_item(
            MOVIE_STORAGE_KEY,
            r#"[{"id":"1","title":"","year":"1995","genres":["Drama"],"dateAdded":"2024-01-01T00:00:00.000Z","rating":12}]"#,
        )
        .await
        .unwrap();
    let store = MovieStore::open(backend.clone()).await.unwrap();

    let legacy = store.get("1").unwrap();
    let toggled = legacy.toggled_watched(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    assert_eq!(store.update(toggled).await.unwrap(), Outcome::Applied);

    let mut repaired = store.get("1").unwrap();
    repaired.title = "Heat".to_string();
    repaired.rating = Some(9.0);
    assert_eq!(store.update(repaired).await.unwrap(), Outcome::Applied);

    let reloaded = MovieStore::open(backend).await.unwrap();
    let heat = reloaded.get("1").unwrap();
    assert!(heat.watched);
    assert_eq!(heat.title, "Heat");
    assert_eq!(heat.rating, Some(9.0));
}

fn ids_of(movies: &[Movie]) -> Vec<String> {
    movies.iter().map(|m| m.id.clone()).collect()
}
