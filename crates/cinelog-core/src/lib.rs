pub mod error;
pub mod kv;
pub mod preferences;
pub mod query;
pub mod stats;
pub mod store;

pub use error::{KvError, StoreError, StoreResult};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use preferences::{Palette, Preferences, DARK_MODE_KEY, DARK_PALETTE, LIGHT_PALETTE};
pub use query::{by_status, favorites, recent_additions, search_by_title, sort_movies, FavoriteSort, SortOption, RECENT_LIMIT};
pub use stats::{monthly_goal, summarize, MonthlyGoal, WatchlistSummary};
pub use store::{MovieStore, Outcome, PendingWrite, MOVIE_BACKUP_KEY, MOVIE_STORAGE_KEY};
