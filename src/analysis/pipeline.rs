// src/analysis/pipeline.rs
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::balance_sheet::BalanceSheetSource;
use crate::analysis::llm::{self, AnalysisOutcome, LanguageModel};
use crate::analysis::prompt::{self, BALANCE_SHEET_INSTRUCTION};
use crate::extractors::section::{SectionExtractor, SectionId};
use crate::filings::FiscalYear;
use crate::storage;
use crate::utils::AppError;

/// Inputs for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub fiscal_year: FiscalYear,
    pub section: SectionId,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output: PathBuf,
    pub prompt: String,
    /// `None` when the analysis stage was not run
    pub analysis: Option<AnalysisOutcome>,
}

impl RunReport {
    pub fn summary(&self) -> String {
        let saved = format!("Data and instructions saved to {}", self.output.display());
        match &self.analysis {
            None => saved,
            Some(AnalysisOutcome::Completed(_)) => format!("{} (LLM analysis appended)", saved),
            Some(AnalysisOutcome::Failed(reason)) => format!("{} (LLM analysis failed: {})", saved, reason),
        }
    }
}

/// Language model plus the time it is given to answer.
pub struct Analyst {
    pub model: Arc<dyn LanguageModel>,
    pub timeout: Duration,
}

/// Balance sheet + filing section -> prompt file -> optional LLM analysis.
pub struct Pipeline {
    balance_sheets: Arc<dyn BalanceSheetSource>,
    extractor: SectionExtractor,
    analyst: Option<Analyst>,
}

impl Pipeline {
    pub fn new(balance_sheets: Arc<dyn BalanceSheetSource>, extractor: SectionExtractor) -> Self {
        Self { balance_sheets, extractor, analyst: None }
    }

    pub fn with_analyst(mut self, analyst: Analyst) -> Self {
        self.analyst = Some(analyst);
        self
    }

    /// Runs every stage in order. The prompt is on disk before the model is
    /// asked anything, so a model failure still leaves a usable file.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<RunReport, AppError> {
        tracing::info!("Fetching balance sheet data...");
        let sheet = self.balance_sheets.balance_sheet(&request.ticker).await?;
        if sheet.is_empty() {
            tracing::warn!("Balance sheet for {} has no line items", request.ticker);
        }
        let table = prompt::balance_sheet_block(&sheet);

        tracing::info!("Fetching 10-K report section...");
        let section = self.extractor
            .get_10k_section(&request.ticker, request.fiscal_year, request.section, None, None)
            .await?;
        tracing::info!(
            "Using item {} of {} ({}) from {} [{}]",
            section.section,
            section.ticker,
            section.fiscal_year,
            section.filing_url,
            if section.from_cache { "cached" } else { "extracted" }
        );

        let prompt = prompt::combine_prompt(BALANCE_SHEET_INSTRUCTION, &section.text, Some(&table));
        storage::save_to_file(&prompt, &request.output)?;
        tracing::info!("Saved prompt to {}", request.output.display());

        let analysis = match &self.analyst {
            Some(analyst) => {
                let outcome = llm::analyze(analyst.model.as_ref(), &prompt, analyst.timeout).await;
                storage::append_analysis(&outcome.as_block(), &request.output)?;
                Some(outcome)
            }
            None => {
                tracing::debug!("No language model configured, skipping analysis");
                None
            }
        };

        Ok(RunReport { output: request.output.clone(), prompt, analysis })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::balance_sheet::{BalanceSheet, LineItem};
    use crate::analysis::llm::tests::StubModel;
    use crate::extractors::section::tests::StubSource;
    use crate::filings::tests::{record, StubSearch};
    use crate::filings::FilingLocator;
    use crate::storage::{SectionCache, ANALYSIS_SEPARATOR};
    use crate::utils::error::FmpError;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    struct StubBalanceSheets(BalanceSheet);

    #[async_trait]
    impl BalanceSheetSource for StubBalanceSheets {
        async fn balance_sheet(&self, _ticker: &str) -> Result<BalanceSheet, FmpError> {
            Ok(self.0.clone())
        }
    }

    fn acme_sheet() -> BalanceSheet {
        BalanceSheet {
            periods: vec!["2023-09-30".to_string()],
            rows: vec![
                LineItem { label: "Total Assets".to_string(), values: vec![Some(100.0)] },
                LineItem { label: "Total Liabilities".to_string(), values: vec![Some(40.0)] },
            ],
        }
    }

    fn pipeline(dir: &TempDir, source: Arc<StubSource>) -> Pipeline {
        let search = Arc::new(StubSearch::with_records(vec![record("http://x/filing.htm", "2023-02-01")]));
        let extractor = SectionExtractor::new(
            FilingLocator::new(search),
            source,
            SectionCache::new(dir.path().join(".cache")),
        );
        Pipeline::new(Arc::new(StubBalanceSheets(acme_sheet())), extractor)
    }

    fn request(dir: &TempDir) -> AnalysisRequest {
        AnalysisRequest {
            ticker: "ACME".to_string(),
            fiscal_year: FiscalYear::Year(2023),
            section: SectionId::Item7,
            output: dir.path().join("reports/ACME_2023_balance_sheet_analysis.txt"),
        }
    }

    fn expected_prompt() -> String {
        format!(
            "Balance sheet:\n{}\n\nResource: Risk factors text\n\nInstruction: {}",
            acme_sheet().to_string().trim(),
            BALANCE_SHEET_INSTRUCTION
        )
    }

    #[tokio::test]
    async fn test_end_to_end_without_model() {
        let dir = TempDir::new().unwrap();
        let source = Arc::new(StubSource::new("Risk factors text"));
        let report = pipeline(&dir, source.clone()).run(&request(&dir)).await.unwrap();

        assert_eq!(report.prompt, expected_prompt());
        assert!(report.prompt.starts_with("Balance sheet:\n2023-09-30\nTotal Assets"));
        assert_eq!(fs::read_to_string(&report.output).unwrap(), expected_prompt());
        assert!(report.analysis.is_none());
        assert_eq!(
            report.summary(),
            format!("Data and instructions saved to {}", report.output.display())
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_prompt_layout_for_two_line_balance_sheet() {
        let prompt = prompt::combine_prompt(
            BALANCE_SHEET_INSTRUCTION,
            "Risk factors text",
            Some("Balance sheet:\nTotal Assets  100\nTotal Liabilities  40"),
        );
        assert_eq!(
            prompt,
            format!(
                "Balance sheet:\nTotal Assets  100\nTotal Liabilities  40\n\nResource: Risk factors text\n\nInstruction: {}",
                BALANCE_SHEET_INSTRUCTION
            )
        );
        assert!(prompt.ends_with("well-structured response.\n"));
    }

    #[tokio::test]
    async fn test_analysis_is_appended() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir, Arc::new(StubSource::new("Risk factors text"))).with_analyst(Analyst {
            model: Arc::new(StubModel::Reply("Leverage is moderate.".to_string())),
            timeout: Duration::from_secs(5),
        });

        let report = pipeline.run(&request(&dir)).await.unwrap();
        assert_eq!(
            fs::read_to_string(&report.output).unwrap(),
            format!("{}{}Leverage is moderate.", expected_prompt(), ANALYSIS_SEPARATOR)
        );
        assert!(report.summary().ends_with("(LLM analysis appended)"));
    }

    #[tokio::test]
    async fn test_model_failure_keeps_prompt_and_reports_success() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir, Arc::new(StubSource::new("Risk factors text"))).with_analyst(Analyst {
            model: Arc::new(StubModel::Fail),
            timeout: Duration::from_secs(5),
        });

        let report = pipeline.run(&request(&dir)).await.expect("run should succeed");
        let written = fs::read_to_string(&report.output).unwrap();

        assert!(written.starts_with(&expected_prompt()));
        assert!(written.ends_with("Analysis failed: Invalid API key or authentication failed"));
        assert!(matches!(report.analysis, Some(AnalysisOutcome::Failed(_))));
        assert!(report.summary().contains("LLM analysis failed"));
    }

    #[tokio::test]
    async fn test_unlocated_filing_aborts_before_writing() {
        let dir = TempDir::new().unwrap();
        let mut req = request(&dir);
        req.fiscal_year = FiscalYear::Year(2019);

        let err = pipeline(&dir, Arc::new(StubSource::new("unused"))).run(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "Extraction failed: No matching report found");
        assert!(!req.output.exists());
    }
}
