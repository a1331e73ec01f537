use chrono::{DateTime, Utc};
use cinelog_models::Movie;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

/// Key holding the JSON array of every movie
pub const MOVIE_STORAGE_KEY: &str = "movies";

/// Key receiving the last payload that could not be parsed
pub const MOVIE_BACKUP_KEY: &str = "movies.bak";

/// Whether a keyed mutation found its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NotFound,
}

struct Cache {
    movies: Vec<Movie>,
    /// Bumped on every change to `movies`
    generation: u64,
}

/// The single source of truth for the movie collection.
///
/// Reads are served from an in-memory cache. Every mutation is applied to
/// the cache first, then the whole collection is written to the backing
/// [`KeyValueStore`] under [`MOVIE_STORAGE_KEY`]. Construct one per
/// application and share it by reference or `Arc`.
pub struct MovieStore {
    backend: Arc<dyn KeyValueStore>,
    cache: RwLock<Cache>,
    /// Serializes durable writes; holds the newest generation written
    write_gate: Mutex<u64>,
    persisted_generation: AtomicU64,
}

impl MovieStore {
    /// An empty store; call [`MovieStore::load`] to populate it
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            cache: RwLock::new(Cache {
                movies: Vec::new(),
                generation: 0,
            }),
            write_gate: Mutex::new(0),
            persisted_generation: AtomicU64::new(0),
        }
    }

    /// Create a store and load the persisted collection into it
    pub async fn open(backend: Arc<dyn KeyValueStore>) -> StoreResult<Self> {
        let store = Self::new(backend);
        store.load().await?;
        Ok(store)
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, Cache> {
        self.cache.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, Cache> {
        self.cache.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read the durable collection and replace the cache with it.
    ///
    /// A missing entry yields an empty collection. An unparseable entry is
    /// copied to [`MOVIE_BACKUP_KEY`] and also yields an empty collection.
    ///
    /// A change staged while the read is in flight wins: the cache is kept and
    /// its pending write still goes through.
    pub async fn load(&self) -> StoreResult<Vec<Movie>> {
        let mut persisted = self.write_gate.lock().await;
        let read_generation = self.read_cache().generation;

        let movies = match self.backend.get_item(MOVIE_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Movie>>(&raw) {
                Ok(movies) => {
                    info!("Loaded {} movies from storage", movies.len());
                    movies
                }
                Err(e) => {
                    warn!(
                        "Stored movie collection is unreadable ({}). Starting with an empty collection.",
                        e
                    );
                    if let Err(backup_err) = self.backend.set_item(MOVIE_BACKUP_KEY, &raw).await {
                        warn!("Failed to back up unreadable movie collection: {}", backup_err);
                    } else {
                        info!("Backed up unreadable movie collection to '{}'", MOVIE_BACKUP_KEY);
                    }
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No stored movie collection, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read movie collection: {}", e);
                return Err(e.into());
            }
        };

        let mut cache = self.write_cache();
        if cache.generation != read_generation {
            debug!(
                "Collection changed during load (generation {} -> {}), keeping in-memory state",
                read_generation, cache.generation
            );
            return Ok(cache.movies.clone());
        }
        cache.movies = movies.clone();
        cache.generation += 1;
        // The cache now mirrors what is durable
        *persisted = cache.generation;
        self.persisted_generation.store(cache.generation, Ordering::SeqCst);

        Ok(movies)
    }

    /// Snapshot of every movie, in insertion order
    pub fn all(&self) -> Vec<Movie> {
        self.read_cache().movies.clone()
    }

    pub fn get(&self, id: &str) -> Option<Movie> {
        self.read_cache().movies.iter().find(|m| m.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read_cache().movies.iter().any(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.read_cache().movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_cache().movies.is_empty()
    }

    /// True while the cache holds changes the backend has not accepted
    pub fn is_dirty(&self) -> bool {
        self.read_cache().generation > self.persisted_generation.load(Ordering::SeqCst)
    }

    /// A timestamp-derived id (milliseconds) not yet used in the collection
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let cache = self.read_cache();
        let mut candidate = now.timestamp_millis();
        while cache.movies.iter().any(|m| m.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    fn stage<F>(&self, change: F) -> StoreResult<PendingWrite<'_>>
    where
        F: FnOnce(&mut Vec<Movie>) -> StoreResult<Outcome>,
    {
        let mut cache = self.write_cache();
        let outcome = change(&mut cache.movies)?;
        if outcome == Outcome::NotFound {
            return Ok(PendingWrite {
                store: self,
                generation: cache.generation,
                payload: None,
                outcome,
            });
        }

        cache.generation += 1;
        let payload = serde_json::to_string(&cache.movies)?;
        Ok(PendingWrite {
            store: self,
            generation: cache.generation,
            payload: Some(payload),
            outcome,
        })
    }

    /// Append a movie to the cache. Rejects invalid records and taken ids.
    pub fn stage_add(&self, movie: Movie) -> StoreResult<PendingWrite<'_>> {
        movie.validate()?;
        self.stage(|movies| {
            if movies.iter().any(|m| m.id == movie.id) {
                return Err(StoreError::DuplicateId(movie.id));
            }
            debug!("Adding movie {} ({})", movie.id, movie.title);
            movies.push(movie);
            Ok(Outcome::Applied)
        })
    }

    /// Replace the whole record sharing `movie.id`; no-op when absent
    pub fn stage_update(&self, movie: Movie) -> StoreResult<PendingWrite<'_>> {
        self.stage(|movies| match movies.iter_mut().find(|m| m.id == movie.id) {
            Some(existing) => {
                movie.validate_replacing(existing)?;
                debug!("Updating movie {}", movie.id);
                *existing = movie;
                Ok(Outcome::Applied)
            }
            None => {
                debug!("Update skipped: no movie with id {}", movie.id);
                Ok(Outcome::NotFound)
            }
        })
    }

    /// Remove the record with `id`; no-op when absent
    pub fn stage_delete(&self, id: &str) -> StoreResult<PendingWrite<'_>> {
        self.stage(|movies| {
            let before = movies.len();
            movies.retain(|m| m.id != id);
            if movies.len() == before {
                debug!("Delete skipped: no movie with id {}", id);
                Ok(Outcome::NotFound)
            } else {
                debug!("Deleted movie {}", id);
                Ok(Outcome::Applied)
            }
        })
    }

    pub async fn add(&self, movie: Movie) -> StoreResult<()> {
        self.stage_add(movie)?.persist().await.map(|_| ())
    }

    pub async fn update(&self, movie: Movie) -> StoreResult<Outcome> {
        self.stage_update(movie)?.persist().await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<Outcome> {
        self.stage_delete(id)?.persist().await
    }

    /// Write the current cache, recovering from an earlier failed write
    pub async fn flush(&self) -> StoreResult<()> {
        let pending = {
            let cache = self.read_cache();
            PendingWrite {
                store: self,
                generation: cache.generation,
                payload: Some(serde_json::to_string(&cache.movies)?),
                outcome: Outcome::Applied,
            }
        };
        pending.persist().await.map(|_| ())
    }

    /// Drop every movie and remove the durable entry
    pub async fn clear(&self) -> StoreResult<()> {
        let mut persisted = self.write_gate.lock().await;
        let generation = {
            let mut cache = self.write_cache();
            cache.movies.clear();
            cache.generation += 1;
            cache.generation
        };

        if let Err(e) = self.backend.remove_item(MOVIE_STORAGE_KEY).await {
            warn!("Failed to clear stored movies: {}", e);
            return Err(e.into());
        }
        *persisted = generation;
        self.persisted_generation.store(generation, Ordering::SeqCst);
        info!("Cleared movie collection");
        Ok(())
    }

    async fn write_snapshot(&self, generation: u64, payload: &str) -> StoreResult<()> {
        let mut persisted = self.write_gate.lock().await;
        if *persisted >= generation {
            debug!(
                "Skipping write of generation {} (generation {} already persisted)",
                generation, *persisted
            );
            return Ok(());
        }

        if let Err(e) = self.backend.set_item(MOVIE_STORAGE_KEY, payload).await {
            warn!(
                "Failed to persist movie collection (generation {}): {}. In-memory changes are kept.",
                generation, e
            );
            return Err(e.into());
        }

        *persisted = generation;
        self.persisted_generation.store(generation, Ordering::SeqCst);
        debug!("Persisted movie collection (generation {}, {} bytes)", generation, payload.len());
        Ok(())
    }
}

/// A mutation already visible in the cache but not yet durable.
///
/// Carries a snapshot of the whole collection. Persisting an older snapshot
/// after a newer one has been written is a no-op.
#[must_use = "staged changes are lost on exit unless persisted"]
pub struct PendingWrite<'a> {
    store: &'a MovieStore,
    generation: u64,
    payload: Option<String>,
    outcome: Outcome,
}

impl<'a> PendingWrite<'a> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn persist(self) -> StoreResult<Outcome> {
        if let Some(payload) = &self.payload {
            self.store.write_snapshot(self.generation, payload).await?;
        }
        Ok(self.outcome)
    }
}

#[cfg(test)]
mod tests;
