//! Saving downloaded export blobs.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use tracing::debug;

/// File name an export is saved under on `date`.
///
/// ```
/// use chrono::NaiveDate;
/// use powerplan_dash::controller::export_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
/// assert_eq!(export_file_name(date), "powerplan-data-2025-07-07.csv");
/// ```
pub fn export_file_name(date: NaiveDate) -> String {
    format!("powerplan-data-{}.csv", date.format("%Y-%m-%d"))
}

/// Destination for export blobs.
pub trait ExportSink: Send + Sync + 'static {
    /// Stores `contents` under `file_name` and returns where it landed.
    ///
    /// # Errors
    ///
    /// Returns the I/O error that prevented the file from being saved. No
    /// partial file is left behind.
    fn save(&self, file_name: &str, contents: &[u8]) -> io::Result<PathBuf>;
}

/// Saves exports into a directory.
///
/// The blob is written to a temporary file in the same directory and only
/// renamed into place once fully written. A failed save drops the temporary
/// file, which removes it.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ExportSink for DirectorySink {
    fn save(&self, file_name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let mut transient = NamedTempFile::new_in(&self.directory)?;
        debug!(path = %transient.path().display(), "writing export");
        transient.write_all(contents)?;
        transient.flush()?;

        let target = self.directory.join(file_name);
        transient.persist(&target).map_err(|e| e.error)?;
        Ok(target)
    }
}
