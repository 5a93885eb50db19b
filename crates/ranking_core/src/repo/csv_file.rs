//! CSV file backend for rankings.
//!
//! # Responsibility
//! - Create the backing file on first use.
//! - Parse the `NAME,COUNT` table into an ordered mapping.
//! - Rewrite the whole table on every save.
//!
//! # Invariants
//! - A missing file is created empty before any read; an empty file parses
//!   to an empty mapping.
//! - Saves stage the table in a temp file beside the resolved target and
//!   rename it over the target, so readers see either the old table or the
//!   new one. Symlinks are followed. When the directory refuses the temp
//!   file, the target is truncated and written in place.
//! - Rows are written in mapping iteration order, header first.

use super::{RankingBackend, RankingError, RankingResult};
use crate::model::entry::RankingMap;
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use log::{debug, error, info};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

pub const RANKING_COLUMN_NAME: &str = "NAME";
pub const RANKING_COLUMN_COUNT: &str = "COUNT";

/// Ranking table stored as a flat CSV file.
#[derive(Debug, Clone)]
pub struct CsvRankingFile {
    path: PathBuf,
}

impl CsvRankingFile {
    /// Binds to `path`, creating a zero-byte file when none exists.
    ///
    /// # Errors
    /// - Returns `RankingError::Io` when the file cannot be created, e.g. the
    ///   parent directory is missing or not writable.
    pub fn open(path: impl Into<PathBuf>) -> RankingResult<Self> {
        let path = path.into();
        ensure_file(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> RankingError {
        RankingError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn replace_contents(&self, bytes: &[u8]) -> io::Result<()> {
        // Symlinks are followed so the link itself survives the rename.
        let target = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = match NamedTempFile::new_in(dir) {
            Ok(staged) => staged,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                debug!(
                    "event=ranking_save module=repo status=fallback path={} mode=in_place error={}",
                    target.display(),
                    err
                );
                return overwrite_in_place(&target, bytes);
            }
            Err(err) => return Err(err),
        };
        staged.write_all(bytes)?;
        if let Ok(metadata) = fs::metadata(&target) {
            staged.as_file().set_permissions(metadata.permissions())?;
        }
        staged.as_file().sync_all()?;
        staged.persist(&target).map_err(|err| err.error)?;
        Ok(())
    }
}

fn overwrite_in_place(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(target)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl RankingBackend for CsvRankingFile {
    fn load(&self) -> RankingResult<RankingMap> {
        let started_at = Instant::now();
        let result = fs::read_to_string(&self.path)
            .map_err(|source| self.io_error(source))
            .and_then(|content| parse_table(&content));

        match &result {
            Ok(ranking) => info!(
                "event=ranking_load module=repo status=ok path={} entries={} duration_ms={}",
                self.path.display(),
                ranking.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=ranking_load module=repo status=error path={} duration_ms={} error={}",
                self.path.display(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn save(&self, ranking: &RankingMap) -> RankingResult<()> {
        let started_at = Instant::now();
        let bytes = render_table(ranking)?;

        match self.replace_contents(&bytes) {
            Ok(()) => {
                info!(
                    "event=ranking_save module=repo status=ok path={} entries={} bytes={} duration_ms={}",
                    self.path.display(),
                    ranking.len(),
                    bytes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=ranking_save module=repo status=error path={} duration_ms={} error_code=write_failed error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    source
                );
                Err(self.io_error(source))
            }
        }
    }
}

fn ensure_file(path: &Path) -> RankingResult<()> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            info!(
                "event=ranking_file_create module=repo status=ok path={}",
                path.display()
            );
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => {
            error!(
                "event=ranking_file_create module=repo status=error path={} error_code=create_failed error={}",
                path.display(),
                source
            );
            Err(RankingError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Parses CSV text with a `NAME,COUNT` header into a ranking.
///
/// Column positions come from the header; extra columns are ignored.
/// Duplicate names keep their first position and take the last count.
pub fn parse_table(content: &str) -> RankingResult<RankingMap> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let name_index = column_index(&headers, RANKING_COLUMN_NAME);
    let count_index = column_index(&headers, RANKING_COLUMN_COUNT);

    let mut ranking = RankingMap::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());

        let name = field(&record, name_index).ok_or(RankingError::MissingColumn {
            line,
            column: RANKING_COLUMN_NAME,
        })?;
        let raw_count = field(&record, count_index).ok_or(RankingError::MissingColumn {
            line,
            column: RANKING_COLUMN_COUNT,
        })?;
        let count = raw_count
            .trim()
            .parse::<u64>()
            .map_err(|_| RankingError::Parse {
                line,
                column: RANKING_COLUMN_COUNT,
                value: raw_count.to_string(),
            })?;

        ranking.set(name, count);
    }

    Ok(ranking)
}

/// Renders a ranking as CSV bytes: header row, then one row per entry.
pub fn render_table(ranking: &RankingMap) -> RankingResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([RANKING_COLUMN_NAME, RANKING_COLUMN_COUNT])?;
    for (name, count) in ranking.iter() {
        writer.write_record([name, count.to_string().as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|err| RankingError::Csv(csv::Error::from(err.into_error())))
}

fn column_index(headers: &StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|header| header == column)
}

fn field<'r>(record: &'r StringRecord, index: Option<usize>) -> Option<&'r str> {
    index.and_then(|index| record.get(index))
}

#[cfg(test)]
mod tests {
    use super::{overwrite_in_place, parse_table, render_table};
    use crate::model::entry::RankingMap;
    use crate::repo::RankingError;

    #[test]
    fn parse_empty_text_yields_empty_ranking() {
        assert!(parse_table("").unwrap().is_empty());
        assert!(parse_table("NAME,COUNT\n").unwrap().is_empty());
    }

    #[test]
    fn parse_uses_header_positions_and_ignores_extra_columns() {
        let ranking = parse_table("COUNT,NOTE,NAME\r\n4,x,Ann\r\n 2 ,y,Bob\r\n").unwrap();
        let rows: Vec<(&str, u64)> = ranking.iter().collect();
        assert_eq!(rows, vec![("Ann", 4), ("Bob", 2)]);
    }

    #[test]
    fn parse_rejects_non_integer_and_negative_counts() {
        let err = parse_table("NAME,COUNT\nAnn,1\nBob,abc\n").unwrap_err();
        assert!(matches!(
            err,
            RankingError::Parse { line: 3, column: "COUNT", ref value } if value == "abc"
        ));

        let err = parse_table("NAME,COUNT\nBob,-2\n").unwrap_err();
        assert!(matches!(err, RankingError::Parse { .. }));
    }

    #[test]
    fn parse_reports_missing_count_field() {
        let err = parse_table("NAME,COUNT\nAnn\n").unwrap_err();
        assert!(matches!(
            err,
            RankingError::MissingColumn {
                line: 2,
                column: "COUNT"
            }
        ));
    }

    #[test]
    fn render_quotes_names_that_need_it() {
        let ranking: RankingMap = [("Smith, John", 2), ("Ann", 1)].into_iter().collect();
        let text = String::from_utf8(render_table(&ranking).unwrap()).unwrap();
        assert_eq!(text, "NAME,COUNT\n\"Smith, John\",2\nAnn,1\n");
    }

    #[test]
    fn overwrite_in_place_truncates_longer_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.csv");
        std::fs::write(&path, "NAME,COUNT\nLongerName,100\n").unwrap();

        overwrite_in_place(&path, b"NAME,COUNT\nAnn,1\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "NAME,COUNT\nAnn,1\n"
        );
    }
}
