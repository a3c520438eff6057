use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use super::domain::SubmissionRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("submission store unavailable: {0}")]
    Unavailable(String),
    #[error("unable to write submission: {0}")]
    Write(String),
}

/// Destination for finished submissions (spreadsheet in production).
#[async_trait]
pub trait SubmissionStore: Send + Sync + std::fmt::Debug {
    async fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError>;
}

/// Appends rows to a local CSV file; used when no spreadsheet is configured.
#[derive(Debug, Clone)]
pub struct CsvFileStore {
    path: PathBuf,
    guard: Arc<Mutex<()>>,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SubmissionStore for CsvFileStore {
    async fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        let row = record.row();
        let path = self.path.clone();
        let guard = Arc::clone(&self.guard);

        tokio::task::spawn_blocking(move || {
            let _lock = guard
                .lock()
                .map_err(|_| StoreError::Unavailable("csv store mutex poisoned".to_string()))?;
            append_row(&path, &row)
        })
        .await
        .map_err(|err| StoreError::Unavailable(err.to_string()))??;

        debug!(path = %self.path.display(), "appended submission row");
        Ok(())
    }
}

fn append_row(path: &Path, row: &[String]) -> Result<(), StoreError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| StoreError::Write(err.to_string()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);
    writer
        .write_record(row)
        .map_err(|err| StoreError::Write(err.to_string()))?;
    writer
        .flush()
        .map_err(|err| StoreError::Write(err.to_string()))
}
