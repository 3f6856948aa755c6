// src/extractors/section.rs
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::filings::{FilingLocator, FiscalYear};
use crate::storage::{self, SectionCache};
use crate::utils::error::ExtractError;

/// Item of a 10-K report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Item1,
    Item1A,
    Item1B,
    Item2,
    Item3,
    Item4,
    Item5,
    Item6,
    Item7,
    Item7A,
    Item8,
    Item9,
    Item9A,
    Item9B,
    Item10,
    Item11,
    Item12,
    Item13,
    Item14,
    Item15,
}

impl SectionId {
    pub const ALL: [SectionId; 20] = [
        SectionId::Item1, SectionId::Item1A, SectionId::Item1B, SectionId::Item2,
        SectionId::Item3, SectionId::Item4, SectionId::Item5, SectionId::Item6,
        SectionId::Item7, SectionId::Item7A, SectionId::Item8, SectionId::Item9,
        SectionId::Item9A, SectionId::Item9B, SectionId::Item10, SectionId::Item11,
        SectionId::Item12, SectionId::Item13, SectionId::Item14, SectionId::Item15,
    ];

    /// Code used by the extractor service and in cache file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Item1 => "1",
            SectionId::Item1A => "1A",
            SectionId::Item1B => "1B",
            SectionId::Item2 => "2",
            SectionId::Item3 => "3",
            SectionId::Item4 => "4",
            SectionId::Item5 => "5",
            SectionId::Item6 => "6",
            SectionId::Item7 => "7",
            SectionId::Item7A => "7A",
            SectionId::Item8 => "8",
            SectionId::Item9 => "9",
            SectionId::Item9A => "9A",
            SectionId::Item9B => "9B",
            SectionId::Item10 => "10",
            SectionId::Item11 => "11",
            SectionId::Item12 => "12",
            SectionId::Item13 => "13",
            SectionId::Item14 => "14",
            SectionId::Item15 => "15",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = ExtractError;

    /// Case-sensitive: "7A" is accepted, "7a" is not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ExtractError::InvalidSection(s.to_string()))
    }
}

impl TryFrom<u32> for SectionId {
    type Error = ExtractError;

    /// Integer form of the purely numeric items (1 through 15).
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        value.to_string().parse()
    }
}

/// Remote service that extracts a section's text from a filing.
#[async_trait]
pub trait SectionSource: Send + Sync {
    async fn fetch_section(&self, filing_url: &str, section: SectionId) -> Result<String, ExtractError>;
}

#[derive(Debug, Clone)]
pub struct ExtractedSection {
    pub ticker: String,
    pub fiscal_year: FiscalYear,
    pub section: SectionId,
    pub filing_url: String,
    pub text: String,
    /// true when the text came from the section cache
    pub from_cache: bool,
}

/// Fetches 10-K sections, serving repeat requests from the section cache.
pub struct SectionExtractor {
    locator: FilingLocator,
    source: Arc<dyn SectionSource>,
    cache: SectionCache,
}

impl SectionExtractor {
    pub fn new(locator: FilingLocator, source: Arc<dyn SectionSource>, cache: SectionCache) -> Self {
        Self { locator, source, cache }
    }

    /// Returns the text of `section` from the ticker's 10-K for `fiscal_year`.
    ///
    /// Without `report_address` the filing is located first; a failed lookup ends
    /// the call with `ExtractError::FilingNotLocated` before cache or extractor are touched.
    /// A cache miss calls the extractor and stores its reply unchanged.
    /// `save_path` additionally receives a copy of the text.
    pub async fn get_10k_section(
        &self,
        ticker: &str,
        fiscal_year: FiscalYear,
        section: SectionId,
        report_address: Option<&str>,
        save_path: Option<&Path>,
    ) -> Result<ExtractedSection, ExtractError> {
        let filing_url = match report_address {
            Some(url) => url.to_string(),
            None => {
                let lookup = self.locator.locate(ticker, fiscal_year).await;
                match lookup.url() {
                    Some(url) => url.to_string(),
                    None => return Err(ExtractError::FilingNotLocated(lookup.to_string())),
                }
            }
        };

        let (text, from_cache) = match self.cache.read(ticker, fiscal_year, section)? {
            Some(text) => (text, true),
            None => {
                tracing::info!("Extracting item {} for {} ({})", section, ticker, fiscal_year);
                let text = self.source.fetch_section(&filing_url, section).await?;
                self.cache.write(ticker, fiscal_year, section, &text)?;
                (text, false)
            }
        };

        if let Some(path) = save_path {
            storage::save_to_file(&text, path)?;
            tracing::info!("Saved item {} text to {}", section, path.display());
        }

        Ok(ExtractedSection {
            ticker: ticker.to_string(),
            fiscal_year,
            section,
            filing_url,
            text,
            from_cache,
        })
    }
}
