// src/fmp/client.rs
use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;

use crate::analysis::balance_sheet::{BalanceSheet, BalanceSheetSource};
use crate::filings::FilingSearch;
use crate::fmp::models::{BalanceSheetStatement, FilingRecord};
use crate::utils::error::FmpError;

const FMP_API_BASE: &str = "https://financialmodelingprep.com/api/v3";
/// Annual periods requested per balance sheet (yfinance-style four years)
pub const DEFAULT_BALANCE_SHEET_PERIODS: usize = 4;

/// Client for the Financial Modeling Prep REST API.
pub struct FmpClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    periods: usize,
}

impl FmpClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FmpError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: FMP_API_BASE.to_string(),
            periods: DEFAULT_BALANCE_SHEET_PERIODS,
        })
    }

    pub fn with_periods(mut self, periods: usize) -> Self {
        self.periods = periods.max(1);
        self
    }

    /// GETs `{base}/{path}` with the API key attached and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, FmpError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("Requesting FMP endpoint: {}", url);

        let response = self.client.get(&url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            return Err(FmpError::Http(status));
        }

        // FMP reports bad keys and exhausted plans as a 200 with an object body,
        // so decode from text to keep the payload for the error message.
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let snippet: String = body.chars().take(200).collect();
            FmpError::Parse(format!("{} (body: {})", e, snippet))
        })
    }

    /// Lists the company's 10-K filings as ordered by FMP.
    pub async fn sec_filings(&self, ticker: &str) -> Result<Vec<FilingRecord>, FmpError> {
        let query = [("type", "10-k".to_string()), ("page", "0".to_string())];
        let filings: Vec<FilingRecord> = self.get_json(&format!("sec_filings/{}", ticker), &query).await?;
        tracing::debug!("FMP returned {} filing records for {}", filings.len(), ticker);
        Ok(filings)
    }

    /// Fetches annual balance sheet statements, most recent period first.
    pub async fn balance_sheet_statements(&self, ticker: &str) -> Result<Vec<BalanceSheetStatement>, FmpError> {
        let query = [("period", "annual".to_string()), ("limit", self.periods.to_string())];
        self.get_json(&format!("balance-sheet-statement/{}", ticker), &query).await
    }
}

#[async_trait]
impl FilingSearch for FmpClient {
    async fn search_10k(&self, ticker: &str) -> Result<Vec<FilingRecord>, FmpError> {
        self.sec_filings(ticker).await
    }
}

#[async_trait]
impl BalanceSheetSource for FmpClient {
    async fn balance_sheet(&self, ticker: &str) -> Result<BalanceSheet, FmpError> {
        let statements = self.balance_sheet_statements(ticker).await?;
        tracing::debug!("FMP returned {} balance sheet periods for {}", statements.len(), ticker);
        Ok(BalanceSheet::from_statements(&statements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filings::{FilingLocator, FilingLookup, FiscalYear};
    use crate::utils::error::ExtractError;
    use crate::utils::AppError;
    use std::sync::Arc;

    #[test]
    fn test_periods_are_at_least_one() {
        let client = FmpClient::new("key").unwrap();
        assert_eq!(client.periods, DEFAULT_BALANCE_SHEET_PERIODS);
        assert_eq!(client.with_periods(0).periods, 1);
    }

    #[tokio::test]
    async fn test_transport_errors_do_not_expose_api_key() {
        let mut client = FmpClient::new("SECRETKEY123").unwrap();
        client.client = reqwest::Client::builder().no_proxy().build().unwrap();
        // nothing listens on the discard port
        client.base_url = "http://127.0.0.1:9".to_string();

        let err = client.sec_filings("ACME").await.unwrap_err();
        assert!(matches!(err, FmpError::Network(_)));
        assert!(!err.to_string().contains("SECRETKEY123"), "{}", err);
        assert!(!format!("{:?}", err).contains("SECRETKEY123"));

        let lookup = FilingLocator::new(Arc::new(client)).locate("ACME", FiscalYear::Latest).await;
        assert!(matches!(lookup, FilingLookup::UpstreamError(_)));
        assert!(!lookup.to_string().contains("SECRETKEY123"), "{}", lookup);

        let app_err = AppError::from(ExtractError::FilingNotLocated(lookup.to_string()));
        assert!(!format!("{:?}", app_err).contains("SECRETKEY123"));
    }

    #[tokio::test]
    #[ignore] // Requires network access and FMP_API_KEY
    async fn test_sec_filings_live() {
        let key = std::env::var("FMP_API_KEY").expect("FMP_API_KEY");
        let client = FmpClient::new(key).unwrap();
        let filings = client.sec_filings("AAPL").await.unwrap();
        assert!(!filings.is_empty());
        assert!(!filings[0].final_link.is_empty());
    }
}
