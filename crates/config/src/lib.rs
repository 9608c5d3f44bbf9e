use std::fs::{read_to_string, write};

use assetsync_store::CacheConfig;
use assetsync_sync::SyncConfig;
use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result as EyreResult, WrapErr};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.toml";

/// Default blob directory, relative to the home directory
pub const DEFAULT_SOURCE_DIR: &str = "blobs";

#[derive(Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct ConfigFile {
    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    pub source: SourceConfig,
}

#[derive(Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct SourceConfig {
    pub path: Utf8PathBuf,
}

impl SourceConfig {
    #[must_use]
    pub const fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl ConfigFile {
    #[must_use]
    pub const fn new(sync: SyncConfig, cache: CacheConfig, source: SourceConfig) -> Self {
        Self {
            sync,
            cache,
            source,
        }
    }

    /// Default configuration for a fresh home directory.
    #[must_use]
    pub fn for_home(dir: &Utf8Path) -> Self {
        Self::new(
            SyncConfig::default(),
            CacheConfig::default(),
            SourceConfig::new(dir.join(DEFAULT_SOURCE_DIR)),
        )
    }

    #[must_use]
    pub fn exists(dir: &Utf8Path) -> bool {
        dir.join(CONFIG_FILE).is_file()
    }

    pub fn load(dir: &Utf8Path) -> EyreResult<Self> {
        let path = dir.join(CONFIG_FILE);
        let content = read_to_string(&path)
            .wrap_err_with(|| format!("failed to read configuration from {path:?}"))?;

        let config: Self = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse configuration from {path:?}"))?;

        config
            .cache
            .validate()
            .wrap_err_with(|| format!("invalid configuration in {path:?}"))?;

        Ok(config)
    }

    pub fn save(&self, dir: &Utf8Path) -> EyreResult<()> {
        let path = dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)?;

        write(&path, content)
            .wrap_err_with(|| format!("failed to write configuration to {path:?}"))?;

        Ok(())
    }

    /// Only write config file if changes are detected
    pub fn save_if_changed(&self, dir: &Utf8Path) -> EyreResult<bool> {
        let path = dir.join(CONFIG_FILE);
        let new_content = toml::to_string_pretty(self)?;

        let changed = match read_to_string(&path) {
            Ok(existing) => existing != new_content,
            Err(_) => true,
        };

        if changed {
            write(&path, new_content)
                .wrap_err_with(|| format!("failed to write configuration to {path:?}"))?;
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::*;

    fn home() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().to_owned();

        (dir, path)
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, home) = home();
        let config = ConfigFile::for_home(&home);

        assert!(!ConfigFile::exists(&home));
        config.save(&home).unwrap();
        assert!(ConfigFile::exists(&home));

        let loaded = ConfigFile::load(&home).unwrap();
        assert_eq!(loaded.sync, SyncConfig::default());
        assert_eq!(loaded.cache, CacheConfig::default());
        assert_eq!(loaded.source.path, home.join(DEFAULT_SOURCE_DIR));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let (_dir, home) = home();

        write(
            home.join(CONFIG_FILE),
            "[sync]\nslow_sync_threshold_ms = 250\n\n[source]\npath = \"/srv/blobs\"\n",
        )
        .unwrap();

        let loaded = ConfigFile::load(&home).unwrap();
        assert_eq!(loaded.sync.slow_sync_threshold, Duration::from_millis(250));
        assert_eq!(loaded.sync.buffer_capacity, 256);
        assert_eq!(loaded.sync.pool_size, 16);
        assert_eq!(loaded.cache, CacheConfig::default());
        assert_eq!(loaded.source.path, Utf8PathBuf::from("/srv/blobs"));
    }

    #[test]
    fn test_save_if_changed() {
        let (_dir, home) = home();
        let config = ConfigFile::for_home(&home);

        assert!(config.save_if_changed(&home).unwrap());
        assert!(!config.save_if_changed(&home).unwrap());
    }

    #[test]
    fn test_zero_cleanup_interval_fails_to_load() {
        let (_dir, home) = home();

        write(
            home.join(CONFIG_FILE),
            "[cache]\npurge_after_ms = 1000\ncleanup_interval_ms = 0\n\n[source]\npath = \"/srv/blobs\"\n",
        )
        .unwrap();

        let err = ConfigFile::load(&home).unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));
        assert!(format!("{err:?}").contains("cleanup_interval_ms"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let (_dir, home) = home();

        let err = ConfigFile::load(&home).unwrap_err();
        assert!(err.to_string().contains("failed to read configuration"));
    }
}
