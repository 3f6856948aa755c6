// src/extractors/mod.rs
pub mod sec_api;
pub mod section;

// Re-export key extraction types for convenience
pub use sec_api::ExtractorApi;
pub use section::{SectionExtractor, SectionId};
