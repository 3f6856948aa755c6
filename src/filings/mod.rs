// src/filings/mod.rs
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::fmp::models::FilingRecord;
use crate::utils::error::{FmpError, InputError};

/// Source of 10-K filing listings for a ticker.
#[async_trait]
pub trait FilingSearch: Send + Sync {
    /// Returns the filing records in the order the service lists them.
    async fn search_10k(&self, ticker: &str) -> Result<Vec<FilingRecord>, FmpError>;
}

/// Fiscal year of the requested report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiscalYear {
    /// Whatever the filing service lists first
    Latest,
    Year(u16),
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiscalYear::Latest => f.write_str("latest"),
            FiscalYear::Year(year) => write!(f, "{:04}", year),
        }
    }
}

impl FromStr for FiscalYear {
    type Err = InputError;

    /// Accepts "latest" or exactly four ASCII digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "latest" {
            return Ok(FiscalYear::Latest);
        }
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            let year = s.parse::<u16>().map_err(|_| InputError::InvalidYear(s.to_string()))?;
            return Ok(FiscalYear::Year(year));
        }
        Err(InputError::InvalidYear(s.to_string()))
    }
}

/// Outcome of looking up a filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilingLookup {
    Found { url: String, filing_date: String },
    NotFound,
    /// Transport failure or non-success status; holds the status text
    UpstreamError(String),
}

impl FilingLookup {
    pub fn url(&self) -> Option<&str> {
        match self {
            FilingLookup::Found { url, .. } => Some(url),
            _ => None,
        }
    }
}

impl fmt::Display for FilingLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilingLookup::Found { url, filing_date } => write!(f, "Link: {}\nFiling Date: {}", url, filing_date),
            FilingLookup::NotFound => f.write_str("No matching report found"),
            FilingLookup::UpstreamError(status) => write!(f, "Failed to retrieve data: {}", status),
        }
    }
}

/// Picks the filing for `fiscal_year` out of a listing.
///
/// `Latest` takes the first record as listed; records are not re-sorted by date.
/// An explicit year takes the first record whose filing date starts with that year.
pub fn select_filing(records: &[FilingRecord], fiscal_year: FiscalYear) -> FilingLookup {
    let selected = match fiscal_year {
        FiscalYear::Latest => records.first(),
        FiscalYear::Year(_) => {
            let wanted = fiscal_year.to_string();
            records.iter().find(|r| r.filing_year() == wanted)
        }
    };

    match selected {
        Some(record) if !record.final_link.is_empty() => FilingLookup::Found {
            url: record.final_link.clone(),
            filing_date: record.filling_date.clone(),
        },
        _ => FilingLookup::NotFound,
    }
}

/// Resolves a ticker and fiscal year to a filing URL.
#[derive(Clone)]
pub struct FilingLocator {
    search: Arc<dyn FilingSearch>,
}

impl FilingLocator {
    pub fn new(search: Arc<dyn FilingSearch>) -> Self {
        Self { search }
    }

    /// Never fails outright: service errors come back as `FilingLookup::UpstreamError`.
    pub async fn locate(&self, ticker: &str, fiscal_year: FiscalYear) -> FilingLookup {
        tracing::info!("Looking up 10-K filing for {} ({})", ticker, fiscal_year);

        let records = match self.search.search_10k(ticker).await {
            Ok(records) => records,
            Err(FmpError::Http(status)) => return FilingLookup::UpstreamError(status.as_u16().to_string()),
            Err(e) => {
                tracing::warn!("Filing search failed for {}: {}", ticker, e);
                return FilingLookup::UpstreamError(e.to_string());
            }
        };

        let lookup = select_filing(&records, fiscal_year);
        match &lookup {
            FilingLookup::Found { url, filing_date } => {
                tracing::info!("Found filing dated {}: {}", filing_date, url)
            }
            other => tracing::warn!("No usable filing for {} ({}): {}", ticker, fiscal_year, other),
        }
        lookup
    }
}
