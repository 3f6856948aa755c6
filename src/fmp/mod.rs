// src/fmp/mod.rs
pub mod client;
pub mod models;

pub use client::FmpClient;
