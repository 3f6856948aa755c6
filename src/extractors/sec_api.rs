// src/extractors/sec_api.rs
use async_trait::async_trait;

use crate::extractors::section::{SectionId, SectionSource};
use crate::utils::error::ExtractError;

const SEC_API_EXTRACTOR_URL: &str = "https://api.sec-api.io/extractor";

/// Client for the sec-api.io 10-K item extractor.
pub struct ExtractorApi {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl ExtractorApi {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: SEC_API_EXTRACTOR_URL.to_string(),
        })
    }

    /// Returns the section as plain text (`type=text`), exactly as the service sends it.
    pub async fn get_section(&self, filing_url: &str, section: SectionId) -> Result<String, ExtractError> {
        tracing::debug!("Requesting item {} of {} from extractor", section, filing_url);

        let response = self.client.get(&self.endpoint)
            .query(&[
                ("url", filing_url),
                ("item", section.as_str()),
                ("type", "text"),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Extractor returned HTTP {} for item {} of {}", status, section, filing_url);
            return Err(ExtractError::Http(status));
        }

        let text = response.text().await?;
        tracing::debug!("Extractor returned {} bytes for item {}", text.len(), section);
        Ok(text)
    }
}

#[async_trait]
impl SectionSource for ExtractorApi {
    async fn fetch_section(&self, filing_url: &str, section: SectionId) -> Result<String, ExtractError> {
        self.get_section(filing_url, section).await
    }
}
