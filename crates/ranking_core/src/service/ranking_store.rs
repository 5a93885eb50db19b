//! Popularity ranking use-case service.
//!
//! # Responsibility
//! - Load the ranking once at construction and serve queries from memory.
//! - Persist the full mapping after every increment.
//!
//! # Invariants
//! - After a successful `increment` or `save`, the backend holds exactly the
//!   in-memory mapping.
//! - `increment` mutates memory before persisting. When persisting fails the
//!   error is returned and memory stays ahead of the backend until the next
//!   successful `save`.

use crate::config::{resolve_csv_path, ConfigProvider, NoConfig};
use crate::model::entry::{normalize_name, Entry, RankingMap};
use crate::repo::csv_file::CsvRankingFile;
use crate::repo::{RankingBackend, RankingResult};
use log::{debug, error};
use std::path::Path;

/// In-memory ranking synchronized with a persistence backend.
pub struct RankingStore<B: RankingBackend = CsvRankingFile> {
    backend: B,
    ranking: RankingMap,
}

impl RankingStore<CsvRankingFile> {
    /// Opens a CSV-backed store at `path`, or at the default file name.
    ///
    /// # Side effects
    /// - Creates an empty file when the resolved path does not exist.
    pub fn open(path: Option<&Path>) -> RankingResult<Self> {
        Self::open_with_config(path, &NoConfig)
    }

    /// Opens a CSV-backed store, consulting `config` when `path` is `None`.
    ///
    /// # Errors
    /// - `RankingError::Io` when the file cannot be created or read.
    /// - `RankingError::Parse` when a count is not a non-negative integer.
    pub fn open_with_config<C>(path: Option<&Path>, config: &C) -> RankingResult<Self>
    where
        C: ConfigProvider + ?Sized,
    {
        let resolved = resolve_csv_path(path, config);
        Self::with_backend(CsvRankingFile::open(resolved)?)
    }

    /// Path of the backing CSV file.
    pub fn path(&self) -> &Path {
        self.backend.path()
    }
}

impl<B: RankingBackend> RankingStore<B> {
    /// Creates a store and loads its mapping from `backend`.
    pub fn with_backend(backend: B) -> RankingResult<Self> {
        let ranking = backend.load()?;
        Ok(Self { backend, ranking })
    }

    /// Returns the most counted name not listed in `exclude`.
    ///
    /// Equal counts resolve to the name loaded or inserted first.
    pub fn get_most_popular(&self, exclude: &[&str]) -> Option<&str> {
        self.ranking.most_popular(exclude)
    }

    /// Counts one more occurrence of `name` and persists the ranking.
    ///
    /// `name` is stored in title case, so `"aLICE"` and `"Alice"` share one
    /// entry.
    pub fn increment(&mut self, name: &str) -> RankingResult<()> {
        let name = normalize_name(name);
        let count = self.ranking.increment(name.as_str());
        debug!(
            "event=ranking_increment module=service name={} count={}",
            name, count
        );

        self.save().map_err(|err| {
            error!(
                "event=ranking_increment module=service status=error name={} error_code=persist_failed error={}",
                name, err
            );
            err
        })
    }

    /// Rewrites the backend from the in-memory mapping.
    pub fn save(&self) -> RankingResult<()> {
        self.backend.save(&self.ranking)
    }

    /// Replaces the in-memory mapping with the backend's current content.
    pub fn reload(&mut self) -> RankingResult<()> {
        self.ranking = self.backend.load()?;
        Ok(())
    }

    /// Count for `name` as stored, `0` when absent.
    pub fn count(&self, name: &str) -> u64 {
        self.ranking.get_or_zero(name)
    }

    /// Entries in iteration order.
    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.ranking
            .iter()
            .map(|(name, count)| Entry::new(name, count))
    }

    /// Entries by count descending, ties in iteration order.
    pub fn ranked(&self) -> Vec<Entry> {
        self.ranking.ranked()
    }

    pub fn ranking(&self) -> &RankingMap {
        &self.ranking
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}
