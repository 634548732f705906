use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use cforce_logging::cforce_debug;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("report {report} not exported: {} is not a usable directory ({reason})", dir.display())]
    OutputDir {
        report: String,
        dir: PathBuf,
        reason: String,
    },
    #[error("report {report} not exported: {source}")]
    Write {
        report: String,
        #[source]
        source: io::Error,
    },
}

/// Drops finished Markdown reports into the export directory.
///
/// A report is staged in a temp file beside its destination and renamed into
/// place, so a reader never sees half a document and re-exporting the same
/// target replaces the earlier file.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn write(&self, filename: &str, markdown: &str) -> Result<PathBuf, PersistError> {
        self.prepare_dir(filename)?;

        let write_err = |source: io::Error| PersistError::Write {
            report: filename.to_string(),
            source,
        };
        let destination = self.dir.join(filename);
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        staged.write_all(markdown.as_bytes()).map_err(write_err)?;
        staged.as_file_mut().sync_all().map_err(write_err)?;
        staged
            .persist(&destination)
            .map_err(|err| write_err(err.error))?;

        cforce_debug!("report {} written ({} bytes)", destination.display(), markdown.len());
        Ok(destination)
    }

    fn prepare_dir(&self, report: &str) -> Result<(), PersistError> {
        let reject = |reason: String| PersistError::OutputDir {
            report: report.to_string(),
            dir: self.dir.clone(),
            reason,
        };
        if self.dir.exists() {
            if !self.dir.is_dir() {
                return Err(reject("not a directory".to_string()));
            }
            return Ok(());
        }
        fs::create_dir_all(&self.dir).map_err(|err| reject(err.to_string()))
    }
}
