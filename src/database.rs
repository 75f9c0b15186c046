//! Roster handle: every collection of one data directory
//!
//! ```ignore
//! use rosterdb::Roster;
//!
//! // 1. Data directory with defaults from roster.toml
//! let roster = Roster::open("/data/gym")?;
//!
//! // 2. Builder for custom wiring
//! let roster = Roster::builder()
//!     .path("/data/gym")
//!     .notifier(my_toasts)
//!     .open()?;
//!
//! // 3. Ephemeral (no files, testing)
//! let roster = Roster::ephemeral();
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use roster_core::{
    keys, Error, EventBus, Exercise, ExerciseCategory, ExerciseType, Meal, Notifier, Record,
    Result, StoragePort, Student, Supplement, SubscriptionId,
};
use roster_primitives::{
    BackupDocument, BackupManager, ChangeBus, Collection, FeatureStore, RestoreReport,
    RESTORE_FAILED_MESSAGE,
};
use roster_storage::{FileStore, LogNotifier, MemoryStore, SafeCodec};

use crate::config::{RosterConfig, CONFIG_FILE_NAME};

/// All collections of one roster
///
/// Collections are public fields; they share one storage port, one notifier
/// and one change bus.
pub struct Roster {
    /// Trainees with their programs, diets and supplement plans
    pub students: Collection<Student>,
    /// Exercise catalog
    pub exercises: Collection<Exercise>,
    /// Exercise types
    pub exercise_types: Collection<ExerciseType>,
    /// Exercise categories
    pub exercise_categories: Collection<ExerciseCategory>,
    /// Meal catalog
    pub meals: Collection<Meal>,
    /// Supplement catalog
    pub supplements: Collection<Supplement>,
    codec: SafeCodec,
    bus: Arc<dyn EventBus>,
    backups: BackupManager,
    path: Option<PathBuf>,
    config: RosterConfig,
}

impl Roster {
    /// Open (creating if needed) the data directory at `path`
    ///
    /// Writes a default `roster.toml` on first open.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or config cannot be created or read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// In-memory roster with the default quota; nothing touches disk
    pub fn ephemeral() -> Self {
        let config = RosterConfig::default();
        let port = Arc::new(MemoryStore::with_quota(config.quota()));
        Self::assemble(
            port,
            Arc::new(LogNotifier),
            Arc::new(ChangeBus::new()),
            None,
            config,
        )
    }

    /// Builder for custom storage, notifier or config
    pub fn builder() -> RosterBuilder {
        RosterBuilder::new()
    }

    fn assemble(
        port: Arc<dyn StoragePort>,
        notifier: Arc<dyn Notifier>,
        bus: Arc<dyn EventBus>,
        path: Option<PathBuf>,
        config: RosterConfig,
    ) -> Self {
        let codec = SafeCodec::new(port, notifier);
        let students = Collection::new(keys::STUDENTS, codec.clone(), Arc::clone(&bus));
        let exercises = Collection::new(keys::EXERCISES, codec.clone(), Arc::clone(&bus));
        let exercise_types =
            Collection::new(keys::EXERCISE_TYPES, codec.clone(), Arc::clone(&bus));
        let exercise_categories =
            Collection::new(keys::EXERCISE_CATEGORIES, codec.clone(), Arc::clone(&bus));
        let meals = Collection::new(keys::MEALS, codec.clone(), Arc::clone(&bus));
        let supplements = Collection::new(keys::SUPPLEMENTS, codec.clone(), Arc::clone(&bus));

        Self {
            students,
            exercises,
            exercise_types,
            exercise_categories,
            meals,
            supplements,
            backups: BackupManager::new(codec.clone(), Arc::clone(&bus)),
            codec,
            bus,
            path,
            config,
        }
    }

    // =========================================================================
    // Handles
    // =========================================================================

    /// Collection of any record type under `key`, sharing this roster's wiring
    pub fn collection<T: Record>(&self, key: impl Into<String>) -> Collection<T> {
        Collection::new(key, self.codec.clone(), Arc::clone(&self.bus))
    }

    /// Live view of `collection`, refreshed on every change signal
    pub fn watch<T: Record>(&self, collection: &Collection<T>) -> FeatureStore<T> {
        FeatureStore::attach(collection.clone())
    }

    /// Call `listener` after every change in this process
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.bus.subscribe(Arc::new(listener))
    }

    /// Stop calling a listener; `false` if it was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// The shared change bus
    pub fn bus(&self) -> &Arc<dyn EventBus> {
        &self.bus
    }

    /// The shared codec
    pub fn codec(&self) -> &SafeCodec {
        &self.codec
    }

    /// Effective configuration
    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Data directory, `None` when not file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True when nothing is written to disk
    pub fn is_ephemeral(&self) -> bool {
        self.path.is_none()
    }

    /// Keys currently present in storage
    ///
    /// # Errors
    ///
    /// Returns the backend's read error.
    pub fn stored_keys(&self) -> Result<Vec<String>> {
        self.codec.keys()
    }

    // =========================================================================
    // Backup
    // =========================================================================

    /// Backup of every known collection
    pub fn export_backup(&self) -> BackupDocument {
        self.backups.export(&keys::ALL)
    }

    /// Restore every known collection present in `doc`
    ///
    /// # Errors
    ///
    /// See [`BackupManager::restore`].
    pub fn restore_backup(&self, doc: &BackupDocument) -> Result<RestoreReport> {
        self.backups.restore(doc, &keys::ALL)
    }

    /// Restore only `keys` from `doc`
    ///
    /// # Errors
    ///
    /// See [`BackupManager::restore`].
    pub fn restore_backup_keys(&self, doc: &BackupDocument, keys: &[&str]) -> Result<RestoreReport> {
        self.backups.restore(doc, keys)
    }

    /// Write a backup of every known collection to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn export_to_file(&self, path: &Path) -> Result<()> {
        let text = self.export_backup().to_json_pretty()?;
        fs::write(path, text).map_err(|e| {
            error!(path = %path.display(), error = %e, "cannot write backup file");
            Error::from(e)
        })?;
        info!(path = %path.display(), "backup written");
        Ok(())
    }

    /// Restore every known collection from the backup file at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid backup,
    /// or if the restore itself fails. The user is notified in every case.
    pub fn restore_from_file(&self, path: &Path) -> Result<RestoreReport> {
        self.restore_from_file_keys(path, &keys::ALL)
    }

    /// Restore only `keys` from the backup file at `path`
    ///
    /// # Errors
    ///
    /// See [`Roster::restore_from_file`].
    pub fn restore_from_file_keys(&self, path: &Path, keys: &[&str]) -> Result<RestoreReport> {
        let text = fs::read_to_string(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "cannot read backup file");
            self.codec.notify_error(RESTORE_FAILED_MESSAGE);
            Error::from(e)
        })?;
        let doc = self.backups.parse(&text)?;
        self.backups.restore(&doc, keys)
    }
}

impl std::fmt::Debug for Roster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Roster")
            .field("path", &self.path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Roster`]
///
/// Without a path or storage the roster is ephemeral. A custom storage port
/// takes precedence over the path's `FileStore`; the path is still recorded
/// and its `roster.toml` still read.
#[derive(Default)]
pub struct RosterBuilder {
    path: Option<PathBuf>,
    storage: Option<Arc<dyn StoragePort>>,
    notifier: Option<Arc<dyn Notifier>>,
    bus: Option<Arc<dyn EventBus>>,
    config: Option<RosterConfig>,
}

impl RosterBuilder {
    /// Create new builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set data directory
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Use a custom storage port
    pub fn storage(mut self, storage: Arc<dyn StoragePort>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Send user-visible notices to `notifier` instead of the log
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Share an existing change bus
    pub fn bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Use `config` instead of reading `roster.toml`
    pub fn config(mut self, config: RosterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Open the roster
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created, or
    /// `roster.toml` cannot be written, read or validated.
    pub fn open(self) -> Result<Roster> {
        let config = match (self.config, &self.path) {
            (Some(config), _) => {
                config.durability_mode()?;
                config
            }
            (None, Some(path)) => {
                fs::create_dir_all(path)?;
                let config_path = path.join(CONFIG_FILE_NAME);
                RosterConfig::write_default_if_missing(&config_path)?;
                RosterConfig::from_file(&config_path)?
            }
            (None, None) => RosterConfig::default(),
        };

        let port: Arc<dyn StoragePort> = match (self.storage, &self.path) {
            (Some(storage), _) => storage,
            (None, Some(path)) => Arc::new(
                FileStore::open(path.clone())?
                    .with_quota(config.quota())
                    .with_sync(config.sync_writes()?),
            ),
            (None, None) => Arc::new(MemoryStore::with_quota(config.quota())),
        };

        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(LogNotifier) as Arc<dyn Notifier>);
        let bus = self
            .bus
            .unwrap_or_else(|| Arc::new(ChangeBus::new()) as Arc<dyn EventBus>);

        info!(
            path = ?self.path,
            durability = %config.durability,
            quota = ?config.quota(),
            "roster opened"
        );
        Ok(Roster::assemble(port, notifier, bus, self.path, config))
    }
}
