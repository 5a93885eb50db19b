//! Ranking persistence contracts and file-backed implementation.
//!
//! # Responsibility
//! - Define the load/save contract the ranking store persists through.
//! - Keep CSV layout details inside the persistence boundary.
//!
//! # Invariants
//! - `save` always writes the full mapping, never a delta.
//! - Load paths reject counts that are not non-negative integers instead of
//!   masking them.

use crate::model::entry::RankingMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub mod csv_file;

pub type RankingResult<T> = Result<T, RankingError>;

/// Error for ranking load, save and parse operations.
#[derive(Debug)]
pub enum RankingError {
    /// The backing file could not be created, opened, read or written.
    Io { path: PathBuf, source: io::Error },
    /// A data row carries a value that cannot be coerced to its column type.
    Parse {
        line: u64,
        column: &'static str,
        value: String,
    },
    /// A data row lacks a required column.
    MissingColumn { line: u64, column: &'static str },
    /// The file is not structurally valid CSV.
    Csv(csv::Error),
}

impl Display for RankingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "ranking file `{}`: {source}", path.display())
            }
            Self::Parse {
                line,
                column,
                value,
            } => write!(f, "invalid {column} value `{value}` on line {line}"),
            Self::MissingColumn { line, column } => {
                write!(f, "missing {column} column on line {line}")
            }
            Self::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RankingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv(err) => Some(err),
            Self::Parse { .. } | Self::MissingColumn { .. } => None,
        }
    }
}

impl From<csv::Error> for RankingError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Storage interface the ranking store loads from and persists to.
pub trait RankingBackend {
    fn load(&self) -> RankingResult<RankingMap>;
    fn save(&self, ranking: &RankingMap) -> RankingResult<()>;
}
