//! Google Sheets API v4: read a named range.
//!
//! `GET {base}/{spreadsheet_id}/values/{Sheet!A:G}?key=...`. The sheet must be
//! readable with an API key (shared with "anyone with the link").

use async_trait::async_trait;
use serde::Deserialize;

use super::{endpoint_url, read_failure, require};
use crate::config::DashboardConfig;
use crate::error::HrError;
use crate::parse::RawRow;

/// A1-notation column span on one sheet, e.g. `Funcionários!A:G`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    pub start_column: String,
    pub end_column: String,
}

impl SheetRange {
    pub fn new(sheet: &str, start_column: &str, end_column: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
            start_column: start_column.to_string(),
            end_column: end_column.to_string(),
        }
    }
}

impl std::fmt::Display for SheetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}!{}:{}", self.sheet, self.start_column, self.end_column)
    }
}

/// Anything that can return the data rows of a range (header excluded).
#[async_trait]
pub trait RangeReader: Send + Sync {
    async fn read_range(&self, range: &SheetRange) -> Result<Vec<RawRow>, HrError>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<RawRow>,
}

#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: Option<String>,
    api_key: Option<String>,
}

impl SheetsClient {
    pub fn new(config: &DashboardConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &DashboardConfig) -> Self {
        Self {
            client,
            base_url: config.sheets_base_url.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            api_key: config.sheets_api_key.clone(),
        }
    }

    /// Fetch one range and drop its header row. No caching: every call goes
    /// to the network.
    pub async fn fetch_range(&self, range: &SheetRange) -> Result<Vec<RawRow>, HrError> {
        let api_key = require(&self.api_key, "Google Sheets API key")?;
        let spreadsheet_id = require(&self.spreadsheet_id, "Spreadsheet id")?;

        let range_text = range.to_string();
        let url = endpoint_url(
            &self.base_url,
            &[spreadsheet_id, "values", &range_text],
            api_key,
        )?;
        log::debug!("Fetching sheet range {}", range_text);

        let resp = self.client.get(url).send().await.map_err(|e| {
            log::error!("Sheet request for {} failed: {}", range_text, e);
            HrError::Network(e.to_string())
        })?;

        if !resp.status().is_success() {
            let reason = resp.status().canonical_reason().unwrap_or("Request failed");
            let (status, message) = read_failure(resp, reason).await;
            log::error!(
                "Error fetching sheet data for range {}: status {} - {}",
                range_text,
                status,
                message
            );
            return Err(HrError::Fetch {
                range: range_text,
                status,
                message,
            });
        }

        let body: ValueRange = resp.json().await?;
        let mut rows = body.values;
        if !rows.is_empty() {
            rows.remove(0);
        }
        log::debug!("Sheet range {} returned {} data rows", range_text, rows.len());
        Ok(rows)
    }
}

#[async_trait]
impl RangeReader for SheetsClient {
    async fn read_range(&self, range: &SheetRange) -> Result<Vec<RawRow>, HrError> {
        self.fetch_range(range).await
    }
}
