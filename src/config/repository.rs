//! Award settings persistence.
//!
//! Settings are the only mutable state in the engine. A repository loads
//! them before a calculation and saves them when the user edits them; the
//! calculation itself only ever sees an immutable snapshot.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::records::AwardSettingsRecord;

use super::loader::load_yaml;
use super::types::{AwardSettings, RateTable};

/// Loads and stores [`AwardSettings`].
///
/// Implementations must be safe to share between threads; concurrent
/// calculations each take their own snapshot through [`load`](Self::load).
pub trait SettingsRepository: Send + Sync {
    /// Returns the current settings, or the defaults if none were saved.
    fn load(&self) -> EngineResult<AwardSettings>;

    /// Validates and stores new settings.
    fn save(&self, settings: &AwardSettings) -> EngineResult<()>;

    /// Discards saved settings and returns the defaults.
    fn reset(&self) -> EngineResult<AwardSettings>;
}

/// Settings held in memory, for tests and single-process use.
///
/// # Example
///
/// ```
/// use cleaning_cost_engine::config::{AwardSettings, InMemorySettingsRepository, SettingsRepository};
///
/// let repository = InMemorySettingsRepository::new();
/// let mut settings = repository.load().unwrap();
/// settings.use_penalties = false;
/// repository.save(&settings).unwrap();
///
/// assert!(!repository.load().unwrap().use_penalties);
/// assert_eq!(repository.reset().unwrap(), AwardSettings::default());
/// ```
#[derive(Debug, Default)]
pub struct InMemorySettingsRepository {
    settings: RwLock<AwardSettings>,
}

impl InMemorySettingsRepository {
    /// Creates a repository holding the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding the given settings.
    pub fn with_settings(settings: AwardSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

impl SettingsRepository for InMemorySettingsRepository {
    fn load(&self) -> EngineResult<AwardSettings> {
        let settings = self.settings.read().unwrap_or_else(PoisonError::into_inner);
        Ok(settings.clone())
    }

    fn save(&self, settings: &AwardSettings) -> EngineResult<()> {
        settings.validate()?;
        let mut current = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        *current = settings.clone();
        Ok(())
    }

    fn reset(&self) -> EngineResult<AwardSettings> {
        let defaults = AwardSettings::default();
        let mut current = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        *current = defaults.clone();
        Ok(defaults)
    }
}

/// Settings kept in a YAML file.
///
/// A missing file means defaults. The file may use either snake_case or
/// camelCase field names; unusable values in it are replaced and logged.
#[derive(Debug, Clone)]
pub struct YamlSettingsRepository {
    path: PathBuf,
    table: RateTable,
}

impl YamlSettingsRepository {
    /// Creates a repository for the file at `path`, checking condition keys
    /// against the built-in rate table.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_table(path, RateTable::default())
    }

    /// Creates a repository that checks condition keys against `table`.
    pub fn with_table<P: AsRef<Path>>(path: P, table: RateTable) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            table,
        }
    }

    /// The settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, message: impl ToString) -> EngineError {
        EngineError::SettingsWriteError {
            path: self.path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl SettingsRepository for YamlSettingsRepository {
    fn load(&self) -> EngineResult<AwardSettings> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "No saved settings, using defaults");
            return Ok(AwardSettings::default());
        }

        let record: AwardSettingsRecord = load_yaml(&self.path)?;
        let converted = record.into_settings(&self.table);
        converted.value.validate()?;

        info!(
            path = %self.path.display(),
            replaced = converted.warnings.len(),
            "Loaded award settings"
        );
        Ok(converted.value)
    }

    fn save(&self, settings: &AwardSettings) -> EngineResult<()> {
        settings.validate()?;

        let yaml = serde_yaml::to_string(settings).map_err(|e| self.write_error(e))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }
        fs::write(&self.path, yaml).map_err(|e| self.write_error(e))?;

        info!(path = %self.path.display(), "Saved award settings");
        Ok(())
    }

    fn reset(&self) -> EngineResult<AwardSettings> {
        match fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "Reset award settings"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(self.write_error(e)),
        }
        Ok(AwardSettings::default())
    }
}
