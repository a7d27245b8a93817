//! The feedback log file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use loan_model::FeedbackEntry;
use tracing::{debug, info, warn};

use crate::error::{FeedbackError, Result};
use crate::format::{COLUMNS, Layout, decode, encode, header_line};
use crate::lock::{LockMode, LogLock, sibling_with_suffix};

/// Default file name of the log.
pub const DEFAULT_LOG_FILE: &str = "feedback_results.csv";

/// A data row that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number where the record starts.
    pub line: u64,
    pub reason: String,
}

/// Result of reading the whole log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogSnapshot {
    /// Decoded entries in file order.
    pub entries: Vec<FeedbackEntry>,
    /// Rows that were skipped, in file order.
    pub skipped: Vec<SkippedRow>,
    /// Whether the file existed at all.
    pub exists: bool,
}

impl LogSnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Handle to a feedback log on disk.
///
/// The handle itself holds no open file; every operation opens the file,
/// takes the sidecar lock, and releases both before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackLog {
    path: PathBuf,
}

fn io_error(operation: &'static str, path: &Path) -> impl FnOnce(io::Error) -> FeedbackError {
    let path = path.to_path_buf();
    move |source| FeedbackError::Io {
        operation,
        path,
        source,
    }
}

fn csv_error(operation: &'static str, path: &Path) -> impl FnOnce(csv::Error) -> FeedbackError {
    let path = path.to_path_buf();
    move |source| FeedbackError::Csv {
        operation,
        path,
        source,
    }
}

fn writer_for<W: Write>(inner: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(inner)
}

impl FeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn ensure_parent(&self) -> Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(io_error("create directory", parent))
            }
            _ => Ok(()),
        }
    }

    fn parent_missing(&self) -> bool {
        self.path
            .parent()
            .is_some_and(|parent| !parent.as_os_str().is_empty() && !parent.is_dir())
    }

    fn header_mismatch(&self, header: &csv::StringRecord) -> FeedbackError {
        FeedbackError::HeaderMismatch {
            path: self.path.clone(),
            expected: COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            found: header.iter().map(str::to_string).collect(),
        }
    }

    /// Only the current layout may be appended to; legacy files must be
    /// rewritten first so rows never mix column counts.
    fn check_append_header(&self, file: &mut File) -> Result<()> {
        file.seek(SeekFrom::Start(0))
            .map_err(io_error("read", &self.path))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(&*file);
        let header = reader
            .headers()
            .map_err(csv_error("read", &self.path))?
            .clone();
        match Layout::detect(&header) {
            Some(Layout::Current) => Ok(()),
            _ => Err(self.header_mismatch(&header)),
        }
    }

    /// Appends one entry, creating the file with a header first if needed.
    ///
    /// Existing rows are never rewritten. A file whose last line lacks a
    /// trailing newline gets one before the new row. A file with any header
    /// other than the current column list is refused with
    /// [`FeedbackError::HeaderMismatch`].
    pub fn append(&self, entry: &FeedbackEntry) -> Result<()> {
        self.ensure_parent()?;
        let _lock = LogLock::acquire(&self.path, LockMode::Exclusive)?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(io_error("open", &self.path))?;
        let len = file
            .metadata()
            .map_err(io_error("inspect", &self.path))?
            .len();

        if len == 0 {
            file.write_all(header_line().as_bytes())
                .map_err(io_error("write", &self.path))?;
            debug!(path = %self.path.display(), "Created feedback log");
        } else {
            self.check_append_header(&mut file)?;
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))
                .and_then(|_| file.read_exact(&mut last))
                .map_err(io_error("read", &self.path))?;
            if last[0] != b'\n' {
                file.write_all(b"\n").map_err(io_error("write", &self.path))?;
            }
        }

        let mut writer = writer_for(file);
        writer
            .write_record(encode(entry))
            .map_err(csv_error("write", &self.path))?;
        let file = writer
            .into_inner()
            .map_err(|err| (io_error("write", &self.path))(err.into_error()))?;
        file.sync_all().map_err(io_error("sync", &self.path))?;

        info!(
            path = %self.path.display(),
            prediction = %entry.prediction,
            rating = entry.rating.get(),
            "Feedback recorded"
        );
        Ok(())
    }

    /// Reads every entry.
    ///
    /// Undecodable rows are skipped and listed in the snapshot. A header
    /// that is not a known column list fails the whole read.
    pub fn read_all(&self) -> Result<LogSnapshot> {
        if self.parent_missing() {
            return Ok(LogSnapshot::default());
        }
        let _lock = LogLock::acquire(&self.path, LockMode::Shared)?;

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(LogSnapshot::default());
            }
            Err(err) => return Err(io_error("read", &self.path)(err)),
        };
        let mut snapshot = LogSnapshot {
            exists: true,
            ..LogSnapshot::default()
        };
        if file
            .metadata()
            .map_err(io_error("read", &self.path))?
            .len()
            == 0
        {
            return Ok(snapshot);
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        let header = reader
            .headers()
            .map_err(csv_error("read", &self.path))?
            .clone();
        let layout = Layout::detect(&header).ok_or_else(|| self.header_mismatch(&header))?;

        for record in reader.records() {
            match record {
                Ok(record) => {
                    if record.iter().all(|field| field.trim().is_empty()) {
                        continue;
                    }
                    let line = record.position().map_or(0, csv::Position::line);
                    match decode(&record, layout) {
                        Ok(entry) => snapshot.entries.push(entry),
                        Err(reason) => snapshot.skipped.push(SkippedRow { line, reason }),
                    }
                }
                Err(err) if err.is_io_error() => {
                    return Err(csv_error("read", &self.path)(err));
                }
                Err(err) => {
                    let line = err.position().map_or(0, csv::Position::line);
                    snapshot.skipped.push(SkippedRow {
                        line,
                        reason: err.to_string(),
                    });
                }
            }
        }

        for row in &snapshot.skipped {
            warn!(
                path = %self.path.display(),
                line = row.line,
                reason = %row.reason,
                "Skipped malformed feedback row"
            );
        }
        debug!(
            path = %self.path.display(),
            loaded = snapshot.entries.len(),
            skipped = snapshot.skipped.len(),
            "Read feedback log"
        );
        Ok(snapshot)
    }

    /// Replaces the whole log with `entries`.
    ///
    /// The new content goes to a temporary sibling file that is synced and
    /// then renamed over the log, so readers see either the old file or
    /// the new one.
    pub fn rewrite(&self, entries: &[FeedbackEntry]) -> Result<()> {
        self.ensure_parent()?;
        let _lock = LogLock::acquire(&self.path, LockMode::Exclusive)?;

        let temp_path = sibling_with_suffix(&self.path, ".tmp");
        let result = self.write_temp(&temp_path, entries).and_then(|()| {
            fs::rename(&temp_path, &self.path).map_err(|source| {
                FeedbackError::AtomicWriteFailed {
                    temp_path: temp_path.clone(),
                    target_path: self.path.clone(),
                    source,
                }
            })
        });
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result?;

        info!(
            path = %self.path.display(),
            entries = entries.len(),
            "Feedback log rewritten"
        );
        Ok(())
    }

    fn write_temp(&self, temp_path: &Path, entries: &[FeedbackEntry]) -> Result<()> {
        let mut file = File::create(temp_path).map_err(io_error("create", temp_path))?;
        file.write_all(header_line().as_bytes())
            .map_err(io_error("write", temp_path))?;

        let mut writer = writer_for(file);
        for entry in entries {
            writer
                .write_record(encode(entry))
                .map_err(csv_error("write", temp_path))?;
        }
        let file = writer
            .into_inner()
            .map_err(|err| (io_error("write", temp_path))(err.into_error()))?;
        file.sync_all().map_err(io_error("sync", temp_path))
    }

    /// Deletes the log. Returns whether a file was removed.
    pub fn reset(&self) -> Result<bool> {
        if self.parent_missing() {
            return Ok(false);
        }
        let _lock = LogLock::acquire(&self.path, LockMode::Exclusive)?;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Feedback log reset");
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(io_error("delete", &self.path)(err)),
        }
    }

    /// Copies the log's bytes unchanged into `out`.
    pub fn export<W: Write + ?Sized>(&self, out: &mut W) -> Result<u64> {
        if self.parent_missing() {
            return Err(FeedbackError::NotFound {
                path: self.path.clone(),
            });
        }
        let _lock = LogLock::acquire(&self.path, LockMode::Shared)?;
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(FeedbackError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(err) => return Err(io_error("read", &self.path)(err)),
        };
        let copied = io::copy(&mut file, out).map_err(io_error("export", &self.path))?;
        debug!(path = %self.path.display(), bytes = copied, "Exported feedback log");
        Ok(copied)
    }
}
