//! Data layer for the HR analytics dashboard.
//!
//! Reads employee, training, participation and performance sheets from the
//! Google Sheets values API, parses them into typed records, computes the
//! figures each dashboard view shows, and summarizes free-text feedback with
//! Gemini.

pub mod analysis;
pub mod config;
pub mod error;
pub mod google_api;
pub mod parse;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::DashboardConfig;
pub use error::{HrError, ViewError};
pub use google_api::{GeminiClient, Generation, SheetRange, SheetsClient, TextGenerator};
pub use parse::{FallbackPolicy, ParseOptions, SheetSchema};
pub use services::HrDataService;
