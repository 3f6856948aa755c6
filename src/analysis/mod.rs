// src/analysis/mod.rs
pub mod balance_sheet;
pub mod llm;
pub mod pipeline;
pub mod prompt;

pub use pipeline::{AnalysisRequest, Analyst, Pipeline};
