// src/main.rs
mod analysis;
mod config;
mod extractors;
mod filings;
mod fmp;
mod input;
mod storage;
mod utils;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use analysis::llm::OpenAiChat;
use analysis::{AnalysisRequest, Analyst, Pipeline};
use config::Config;
use extractors::{ExtractorApi, SectionExtractor, SectionId};
use filings::{FilingLocator, FiscalYear};
use fmp::FmpClient;
use storage::SectionCache;
use utils::AppError;

/// Balance sheet + 10-K section prompt builder with optional LLM analysis
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol of the company (prompted for if omitted)
    #[arg(short, long)]
    ticker: Option<String>,

    /// Fiscal year of the 10-K report, "yyyy" or "latest" (prompted for if omitted)
    #[arg(short = 'y', long)]
    fyear: Option<String>,

    /// File the prompt (and analysis) is written to (prompted for if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 10-K item to include
    #[arg(short, long, default_value = "7")]
    section: String,

    /// Annual balance sheet periods to include
    #[arg(long, default_value_t = fmp::client::DEFAULT_BALANCE_SHEET_PERIODS)]
    periods: usize,

    /// Section cache directory (overrides SECTION_CACHE_DIR)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Skip the language-model stage even when OPENAI_API_KEY is set
    #[arg(long)]
    no_analysis: bool,

    /// Chat model used for the analysis (overrides LLM_MODEL)
    #[arg(long)]
    model: Option<String>,
}

/// Fills in whatever the command line left out by asking on stdin.
fn collect_request(args: &Args, section: SectionId) -> Result<AnalysisRequest, AppError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();

    let ticker = match &args.ticker {
        Some(raw) => input::validate_ticker(raw)?,
        None => input::prompt_with_retries(
            &mut reader,
            &mut writer,
            "Enter company ticker symbol (e.g., AAPL, TSLA): ",
            input::MAX_PROMPT_ATTEMPTS,
            input::validate_ticker,
        )?,
    };

    let fiscal_year = match &args.fyear {
        Some(raw) => raw.parse::<FiscalYear>()?,
        None => input::prompt_with_retries(
            &mut reader,
            &mut writer,
            "Enter fiscal year for 10-K report (e.g., 2024): ",
            input::MAX_PROMPT_ATTEMPTS,
            input::validate_fiscal_year,
        )?,
    };

    let output = match &args.output {
        Some(path) => {
            input::probe_writable(path)?;
            path.clone()
        }
        None => {
            let default = input::default_output_path(&ticker, fiscal_year);
            input::prompt_output_path(&mut reader, &mut writer, &default)?
        }
    };

    Ok(AnalysisRequest { ticker, fiscal_year, section, output })
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Load .env, then parse CLI arguments
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }
    let args = Args::parse();
    tracing::debug!("Parsed args: {:?}", args);

    // 3. Required credentials are checked before any work
    let mut config = Config::from_env()?;
    if let Some(dir) = &args.cache_dir {
        config.cache_dir = dir.clone();
    }
    if let (Some(llm), Some(model)) = (config.llm.as_mut(), &args.model) {
        llm.model = model.clone();
    }

    let section: SectionId = args.section.parse()?;
    let request = collect_request(&args, section)?;
    tracing::info!("Starting analysis for {} ({}), item {}", request.ticker, request.fiscal_year, request.section);

    // 4. Wire up the service clients
    let fmp = Arc::new(FmpClient::new(&config.fmp_api_key)?.with_periods(args.periods));
    let extractor = SectionExtractor::new(
        FilingLocator::new(fmp.clone()),
        Arc::new(ExtractorApi::new(&config.sec_api_key)?),
        SectionCache::new(&config.cache_dir),
    );
    let mut pipeline = Pipeline::new(fmp, extractor);

    match (&config.llm, args.no_analysis) {
        (Some(llm), false) => {
            let model = OpenAiChat::new(llm.clone()).map_err(|e| AppError::Config(e.to_string()))?;
            pipeline = pipeline.with_analyst(Analyst { model: Arc::new(model), timeout: llm.timeout });
        }
        (Some(_), true) => tracing::info!("LLM analysis disabled by --no-analysis"),
        (None, _) => tracing::debug!("OPENAI_API_KEY not set, LLM analysis skipped"),
    }

    // 5. Run
    let report = pipeline.run(&request).await?;
    tracing::debug!("Prompt length: {} chars", report.prompt.len());
    println!("\nAnalysis completed: {}", report.summary());

    Ok(())
}
