//! Backing file path configuration.
//!
//! # Responsibility
//! - Resolve the ranking file path from an explicit argument, an injected
//!   configuration provider, or the built-in default.
//! - Provide ready-made providers for hosts.
//!
//! # Invariants
//! - An unavailable or empty configuration value means "no override"; path
//!   lookup never fails.

use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name used when neither the caller nor configuration names a path.
pub const DEFAULT_CSV_FILE_PATH: &str = "ranking.csv";

/// Source of an optional ranking file path override.
pub trait ConfigProvider {
    /// Returns the configured path, or `None` when nothing is configured.
    fn csv_file_path(&self) -> Option<PathBuf>;
}

/// Provider that never overrides the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfig;

impl ConfigProvider for NoConfig {
    fn csv_file_path(&self) -> Option<PathBuf> {
        None
    }
}

/// Provider holding a value fixed by the host.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig(pub Option<PathBuf>);

impl ConfigProvider for StaticConfig {
    fn csv_file_path(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

impl<F> ConfigProvider for F
where
    F: Fn() -> Option<PathBuf>,
{
    fn csv_file_path(&self) -> Option<PathBuf> {
        self()
    }
}

#[derive(Debug, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    csv_file_path: Option<String>,
}

/// Provider reading `{"csv_file_path": "..."}` from a JSON settings file.
///
/// The file is read on every lookup. A missing or unreadable file, invalid
/// JSON, or an absent key all yield `None`.
#[derive(Debug, Clone)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for JsonSettingsFile {
    fn csv_file_path(&self) -> Option<PathBuf> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                debug!(
                    "event=config_lookup module=config status=unavailable source={} error={}",
                    self.path.display(),
                    err
                );
                return None;
            }
        };

        match serde_json::from_str::<SettingsDocument>(&content) {
            Ok(document) => document.csv_file_path.map(PathBuf::from),
            Err(err) => {
                debug!(
                    "event=config_lookup module=config status=invalid source={} error={}",
                    self.path.display(),
                    err
                );
                None
            }
        }
    }
}

/// Picks the backing file path: `explicit`, then `config`, then the default.
///
/// Empty paths from either source are skipped.
pub fn resolve_csv_path<C>(explicit: Option<&Path>, config: &C) -> PathBuf
where
    C: ConfigProvider + ?Sized,
{
    if let Some(path) = explicit.filter(|path| !path.as_os_str().is_empty()) {
        debug!(
            "event=config_lookup module=config status=ok source=explicit path={}",
            path.display()
        );
        return path.to_path_buf();
    }

    if let Some(path) = config
        .csv_file_path()
        .filter(|path| !path.as_os_str().is_empty())
    {
        debug!(
            "event=config_lookup module=config status=ok source=provider path={}",
            path.display()
        );
        return path;
    }

    debug!(
        "event=config_lookup module=config status=ok source=default path={}",
        DEFAULT_CSV_FILE_PATH
    );
    PathBuf::from(DEFAULT_CSV_FILE_PATH)
}

#[cfg(test)]
mod tests {
    use super::{
        resolve_csv_path, ConfigProvider, JsonSettingsFile, NoConfig, StaticConfig,
        DEFAULT_CSV_FILE_PATH,
    };
    use std::path::{Path, PathBuf};

    #[test]
    fn explicit_path_wins_over_provider() {
        let config = StaticConfig(Some(PathBuf::from("configured.csv")));
        let resolved = resolve_csv_path(Some(Path::new("explicit.csv")), &config);
        assert_eq!(resolved, PathBuf::from("explicit.csv"));
    }

    #[test]
    fn provider_value_wins_over_default() {
        let config = || Some(PathBuf::from("from_closure.csv"));
        assert_eq!(
            resolve_csv_path(None, &config),
            PathBuf::from("from_closure.csv")
        );
    }

    #[test]
    fn empty_values_fall_back_to_default() {
        let config = StaticConfig(Some(PathBuf::new()));
        let resolved = resolve_csv_path(Some(Path::new("")), &config);
        assert_eq!(resolved, PathBuf::from(DEFAULT_CSV_FILE_PATH));
        assert_eq!(
            resolve_csv_path(None, &NoConfig),
            PathBuf::from(DEFAULT_CSV_FILE_PATH)
        );
    }

    #[test]
    fn json_settings_file_reads_csv_path() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        std::fs::write(&settings_path, r#"{"csv_file_path": "data/rank.csv"}"#).unwrap();

        let provider = JsonSettingsFile::new(&settings_path);
        assert_eq!(
            provider.csv_file_path(),
            Some(PathBuf::from("data/rank.csv"))
        );
    }

    #[test]
    fn json_settings_file_lookup_failures_mean_no_override() {
        let dir = tempfile::tempdir().unwrap();

        let missing = JsonSettingsFile::new(dir.path().join("missing.json"));
        assert_eq!(missing.csv_file_path(), None);

        let invalid_path = dir.path().join("invalid.json");
        std::fs::write(&invalid_path, "not json").unwrap();
        assert_eq!(JsonSettingsFile::new(&invalid_path).csv_file_path(), None);

        let no_key_path = dir.path().join("no_key.json");
        std::fs::write(&no_key_path, r#"{"other": 1}"#).unwrap();
        assert_eq!(JsonSettingsFile::new(&no_key_path).csv_file_path(), None);
    }
}
