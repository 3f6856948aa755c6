// src/input.rs
use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::filings::FiscalYear;
use crate::utils::error::InputError;

/// Interactive prompts give up after this many rejected answers.
pub const MAX_PROMPT_ATTEMPTS: usize = 5;

static TICKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]+$").expect("Failed to compile TICKER_RE")
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}$").expect("Failed to compile YEAR_RE")
});

/// Trims and upper-cases; the result must be non-empty ASCII letters.
pub fn validate_ticker(raw: &str) -> Result<String, InputError> {
    let ticker = raw.trim().to_uppercase();
    if TICKER_RE.is_match(&ticker) {
        Ok(ticker)
    } else {
        Err(InputError::InvalidTicker(raw.trim().to_string()))
    }
}

/// Exactly four digits. "latest" is only accepted on the command line.
pub fn validate_fiscal_year(raw: &str) -> Result<FiscalYear, InputError> {
    let raw = raw.trim();
    if !YEAR_RE.is_match(raw) {
        return Err(InputError::InvalidYear(raw.to_string()));
    }
    raw.parse()
}

/// Checks that `path` can be opened for writing.
///
/// The probe file is removed again only if the probe created it.
pub fn probe_writable(path: &Path) -> Result<(), InputError> {
    let existed = path.exists();
    let probe = OpenOptions::new().create(true).append(true).open(path);

    match probe {
        Ok(file) => {
            drop(file);
            if !existed {
                std::fs::remove_file(path).map_err(|source| InputError::UnwritablePath {
                    path: path.display().to_string(),
                    source,
                })?;
            }
            Ok(())
        }
        Err(source) => Err(InputError::UnwritablePath { path: path.display().to_string(), source }),
    }
}

pub fn default_output_path(ticker: &str, fiscal_year: FiscalYear) -> PathBuf {
    PathBuf::from(format!("{}_{}_balance_sheet_analysis.txt", ticker, fiscal_year))
}

/// Asks `question` until `validate` accepts the answer, at most `max_attempts` times.
pub fn prompt_with_retries<R, W, T, F>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
    max_attempts: usize,
    validate: F,
) -> Result<T, InputError>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Result<T, InputError>,
{
    for attempt in 1..=max_attempts {
        write!(writer, "{}", question)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(InputError::Closed);
        }

        match validate(line.trim()) {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::debug!("Rejected input on attempt {}/{}: {}", attempt, max_attempts, e);
                writeln!(writer, "{}", e)?;
            }
        }
    }
    Err(InputError::TooManyAttempts(max_attempts))
}

/// Output-path prompt: an empty answer selects `default`.
pub fn prompt_output_path<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    default: &Path,
) -> Result<PathBuf, InputError> {
    let question = format!("Enter save path [default: {}]: ", default.display());
    prompt_with_retries(reader, writer, &question, MAX_PROMPT_ATTEMPTS, |answer| {
        let path = if answer.is_empty() { default.to_path_buf() } else { PathBuf::from(answer) };
        probe_writable(&path)?;
        Ok(path)
    })
}
