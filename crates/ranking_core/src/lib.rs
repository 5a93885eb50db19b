//! Persistent popularity ranking backed by a flat CSV file.
//! Counts live in memory and are rewritten to disk after every increment.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{
    resolve_csv_path, ConfigProvider, JsonSettingsFile, NoConfig, StaticConfig,
    DEFAULT_CSV_FILE_PATH,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{normalize_name, Entry, RankingMap};
pub use repo::csv_file::{CsvRankingFile, RANKING_COLUMN_COUNT, RANKING_COLUMN_NAME};
pub use repo::{RankingBackend, RankingError, RankingResult};
pub use service::ranking_store::RankingStore;
