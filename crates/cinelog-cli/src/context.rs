use cinelog_config::{Config, PathManager};
use cinelog_core::{FileKeyValueStore, KeyValueStore, MovieStore, Preferences};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Load and validate `config.toml`, using defaults when it is absent
pub fn load_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid config in {}: {}", config_file.display(), e))?;
    Ok(config)
}

/// Everything a library command needs, built once per run
pub struct AppContext {
    pub storage_dir: PathBuf,
    pub config: Config,
    pub store: MovieStore,
    pub preferences: Preferences,
}

impl AppContext {
    pub async fn open(paths: &PathManager, config: Config) -> Result<Self> {
        let storage_dir = config.storage_dir(paths.storage_dir());
        debug!("Using storage directory {}", storage_dir.display());
        paths.ensure_directories(&storage_dir).map_err(|e| {
            color_eyre::eyre::eyre!("Failed to create storage directory {}: {}", storage_dir.display(), e)
        })?;

        let backend: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(&storage_dir));
        let store = MovieStore::open(backend.clone())
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load movies from {}: {}", storage_dir.display(), e))?;
        let preferences = Preferences::new(backend);

        Ok(Self {
            storage_dir,
            config,
            store,
            preferences,
        })
    }
}
