use std::{
    fs::{self, File, OpenOptions},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{EvaluationSnapshot, RecommendationItem},
};

pub const BATCH_PREFIX: &str = "recommendations_";
pub const EVALUATION_PREFIX: &str = "evaluated_";
const EXTENSION: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const MAX_COLLISION_SUFFIX: u32 = 999;

/// Formats a run timestamp the way it appears in file names and snapshots
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time, used to stamp new files
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Directory of recommendation batches and evaluation snapshots
///
/// Every write creates a new file named after its timestamp. A name that is
/// already taken gets a zero-padded `_NNN` suffix, so files never overwrite
/// each other and lexicographic order stays chronological.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loads the newest recommendation batch by file name
    pub fn latest_batch(&self) -> AppResult<(PathBuf, Vec<RecommendationItem>)> {
        let path = self
            .latest_with_prefix(BATCH_PREFIX)?
            .ok_or_else(|| self.no_batches())?;

        let items: Vec<RecommendationItem> = read_json(&path)?;

        tracing::info!(path = %path.display(), items = items.len(), "Loaded recommendation batch");

        Ok((path, items))
    }

    /// Writes a new batch file stamped `at`.
    ///
    /// Items that have not been rated yet are written without an
    /// `actual_rating` key.
    pub fn write_batch_at(&self, items: &[RecommendationItem], at: NaiveDateTime) -> AppResult<PathBuf> {
        let entries = items.iter().map(batch_entry).collect::<AppResult<Vec<Value>>>()?;
        let path = self.write_new(BATCH_PREFIX, &format_timestamp(at), &entries)?;
        tracing::info!(path = %path.display(), items = items.len(), "Saved recommendation batch");
        Ok(path)
    }

    /// Writes a new evaluation snapshot named after its `evaluated_at` stamp
    pub fn write_evaluation(&self, snapshot: &EvaluationSnapshot) -> AppResult<PathBuf> {
        let path = self.write_new(EVALUATION_PREFIX, &snapshot.evaluated_at, snapshot)?;
        tracing::info!(
            path = %path.display(),
            source = %snapshot.source,
            "Saved evaluation snapshot"
        );
        Ok(path)
    }

    /// Reads back a previously written evaluation snapshot
    pub fn read_evaluation(&self, path: &Path) -> AppResult<EvaluationSnapshot> {
        read_json(path)
    }

    fn latest_with_prefix(&self, prefix: &str) -> AppResult<Option<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut latest: Option<String> = None;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with(prefix) || !name.ends_with(EXTENSION) {
                continue;
            }
            if latest.as_ref().map_or(true, |current| name > *current) {
                latest = Some(name);
            }
        }

        Ok(latest.map(|name| self.dir.join(name)))
    }

    fn write_new<T: Serialize + ?Sized>(&self, prefix: &str, stamp: &str, value: &T) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let (path, file) = self.create_unique(prefix, stamp)?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(path)
    }

    fn create_unique(&self, prefix: &str, stamp: &str) -> AppResult<(PathBuf, File)> {
        let candidates = std::iter::once(format!("{prefix}{stamp}{EXTENSION}")).chain(
            (1..=MAX_COLLISION_SUFFIX).map(|n| format!("{prefix}{stamp}_{n:03}{EXTENSION}")),
        );

        for name in candidates {
            let path = self.dir.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(file = %name, "Snapshot name taken, trying next suffix");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(format!(
            "More than {} files named {}{} in {}",
            MAX_COLLISION_SUFFIX,
            prefix,
            stamp,
            self.dir.display()
        )))
    }

    fn no_batches(&self) -> AppError {
        AppError::NotFound(format!(
            "No recommendation files found in {}",
            self.dir.display()
        ))
    }
}

fn batch_entry(item: &RecommendationItem) -> AppResult<Value> {
    let mut entry = serde_json::to_value(item)?;
    if item.actual_rating.is_none() {
        if let Value::Object(fields) = &mut entry {
            fields.remove("actual_rating");
        }
    }
    Ok(entry)
}

/// File name without its directory, as recorded in snapshots
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::InvalidInput(format!("{}: {}", path.display(), e)))
}
