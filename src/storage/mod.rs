// src/storage/mod.rs
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::extractors::section::SectionId;
use crate::filings::FiscalYear;
use crate::utils::error::StorageError;

/// Header written before the language-model block in the output file.
pub const ANALYSIS_SEPARATOR: &str = "\n\n===== LLM Analysis =====\n";

/// File-backed store of extracted filing sections.
///
/// One file per (ticker, fiscal year, section). Entries never expire; delete
/// the files to force a fresh extraction.
#[derive(Debug, Clone)]
pub struct SectionCache {
    base_dir: PathBuf,
}

impl SectionCache {
    /// The directory is created lazily on the first write.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self { base_dir: base_dir.as_ref().to_path_buf() }
    }

    /// `{base}/sec_utils/{TICKER}_{FYEAR}_{SECTION}.txt`
    pub fn entry_path(&self, ticker: &str, fiscal_year: FiscalYear, section: SectionId) -> PathBuf {
        self.base_dir
            .join("sec_utils")
            .join(format!("{}_{}_{}.txt", ticker, fiscal_year, section))
    }

    /// Returns the cached text verbatim, or `None` when there is no entry.
    pub fn read(&self, ticker: &str, fiscal_year: FiscalYear, section: SectionId) -> Result<Option<String>, StorageError> {
        let path = self.entry_path(ticker, fiscal_year, section);
        if !path.exists() {
            tracing::debug!("Section cache miss: {}", path.display());
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        tracing::debug!("Section cache hit: {} ({} bytes)", path.display(), text.len());
        Ok(Some(text))
    }

    pub fn write(&self, ticker: &str, fiscal_year: FiscalYear, section: SectionId, text: &str) -> Result<PathBuf, StorageError> {
        let path = self.entry_path(ticker, fiscal_year, section);
        save_to_file(text, &path)?;
        tracing::debug!("Cached section text at {}", path.display());
        Ok(path)
    }
}

/// Writes `data` to `file_path`, replacing any existing content.
/// Missing parent directories are created.
pub fn save_to_file<P: AsRef<Path>>(data: &str, file_path: P) -> Result<(), StorageError> {
    let file_path = file_path.as_ref();
    if let Some(parent) = file_path.parent() {
        // `parent()` is Some("") for bare file names
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(file_path)?;
    file.write_all(data.as_bytes())?;
    Ok(())
}

/// Appends a labelled analysis block to an existing output file.
pub fn append_analysis<P: AsRef<Path>>(body: &str, file_path: P) -> Result<(), StorageError> {
    let file_path = file_path.as_ref();
    let mut file = OpenOptions::new().append(true).open(file_path)?;
    file.write_all(ANALYSIS_SEPARATOR.as_bytes())?;
    file.write_all(body.as_bytes())?;
    tracing::info!("Appended analysis to {}", file_path.display());
    Ok(())
}
