//! Row parsers: raw spreadsheet rows → typed records.
//!
//! Each entity reads fixed column indices. Rows shorter than the entity's
//! minimum column count are dropped with a warning; individual fields never
//! fail a row (numbers coerce to 0, unknown statuses fall back to a default).
//!
//! Two sheet generations exist (`SheetSchema`) and two fallback behaviours for
//! empty cells (`FallbackPolicy`); both are explicit options so output is
//! deterministic for a given configuration.

pub mod employee;
pub mod enrollment;
pub mod performance;
pub mod training;

pub use employee::parse_employees;
pub use enrollment::parse_enrollments;
pub use performance::parse_performance_metrics;
pub use training::parse_trainings;

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HrError;

/// One spreadsheet row as returned by the values API. Cells are usually
/// strings but may be numbers or booleans depending on render options.
pub type RawRow = Vec<Value>;

/// Which generation of the spreadsheet layout to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SheetSchema {
    /// Live layout: employees A:G, trainings A:M, performance A:F (no id).
    #[default]
    Current,
    /// Earlier layout: employees A:E, trainings A:N (with satisfaction),
    /// performance A:G (with id).
    Legacy,
}

impl FromStr for SheetSchema {
    type Err = HrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(SheetSchema::Current),
            "legacy" => Ok(SheetSchema::Legacy),
            other => Err(HrError::Configuration(format!(
                "Unknown sheet schema '{}' (expected 'current' or 'legacy')",
                other
            ))),
        }
    }
}

/// What an empty or missing cell becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Placeholder ids (`TEMP_ID_3`), placeholder labels, today's date.
    Placeholder,
    /// Leave text empty and optional values `None`.
    #[default]
    PassThrough,
}

impl FromStr for FallbackPolicy {
    type Err = HrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(FallbackPolicy::Placeholder),
            "pass-through" | "passthrough" => Ok(FallbackPolicy::PassThrough),
            other => Err(HrError::Configuration(format!(
                "Unknown fallback policy '{}' (expected 'placeholder' or 'pass-through')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub schema: SheetSchema,
    pub fallback: FallbackPolicy,
    /// Date used by the placeholder policy for missing dates.
    pub today: NaiveDate,
}

impl ParseOptions {
    pub fn new(schema: SheetSchema, fallback: FallbackPolicy) -> Self {
        Self {
            schema,
            fallback,
            today: chrono::Local::now().date_naive(),
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new(SheetSchema::default(), FallbackPolicy::default())
    }
}

/// Render a cell as text. Null and empty strings count as missing.
pub fn cell_text(cell: &Value) -> Option<String> {
    let text = match cell {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Coerce a money / percent / plain number cell to `f64`.
///
/// Currency and percent symbols are stripped. A comma is the decimal
/// separator unless a dot follows it (`1,234.56`); with a decimal comma,
/// dots are thousands separators. Anything unparseable is 0.
pub fn parse_amount(raw: &str) -> f64 {
    let negative = raw
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-')
        .starts_with('-');

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let normalized = match (commas, dots) {
        (0, d) if d > 1 => cleaned.replace('.', ""),
        (0, _) => cleaned,
        (1, _) => {
            let comma = cleaned.find(',').unwrap_or(0);
            let dot_after_comma = cleaned.rfind('.').map(|d| d > comma).unwrap_or(false);
            if dot_after_comma {
                cleaned.replace(',', "")
            } else {
                cleaned.replace('.', "").replace(',', ".")
            }
        }
        _ => cleaned.replace(',', ""),
    };

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => {
            if negative {
                -v
            } else {
                v
            }
        }
        _ => 0.0,
    }
}

/// Leading integer of a cell (`"12 pessoas"` → 12, `"12.7"` → 12).
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

/// Comma-separated list, trimmed, empty fragments dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Field accessor for one row, applying the fallback policy.
pub(crate) struct RowReader<'a> {
    row: &'a [Value],
    index: usize,
    options: &'a ParseOptions,
}

impl<'a> RowReader<'a> {
    pub(crate) fn new(row: &'a [Value], index: usize, options: &'a ParseOptions) -> Self {
        Self { row, index, options }
    }

    /// Cell text, `None` when missing or empty.
    pub(crate) fn opt(&self, col: usize) -> Option<String> {
        self.row.get(col).and_then(cell_text)
    }

    /// Cell text, or `placeholder` under the placeholder policy, or "".
    pub(crate) fn text_or(&self, col: usize, placeholder: &str) -> String {
        self.opt(col).unwrap_or_else(|| match self.options.fallback {
            FallbackPolicy::Placeholder => placeholder.to_string(),
            FallbackPolicy::PassThrough => String::new(),
        })
    }

    /// Identifier cell verbatim, or `{prefix}_{row index}` under the
    /// placeholder policy.
    pub(crate) fn id_or(&self, col: usize, prefix: &str) -> String {
        self.text_or(col, &format!("{}_{}", prefix, self.index))
    }

    /// Date cell, or today (`YYYY-MM-DD`) under the placeholder policy.
    pub(crate) fn date_or_today(&self, col: usize) -> String {
        self.text_or(col, &self.options.today.format("%Y-%m-%d").to_string())
    }

    pub(crate) fn amount(&self, col: usize) -> f64 {
        self.opt(col).map(|raw| parse_amount(&raw)).unwrap_or(0.0)
    }

    pub(crate) fn count(&self, col: usize) -> Option<u32> {
        self.opt(col)
            .and_then(|raw| parse_leading_int(&raw))
            .and_then(|v| u32::try_from(v).ok())
    }

    pub(crate) fn score(&self, col: usize) -> Option<f64> {
        self.opt(col).and_then(|raw| {
            let v = parse_amount(&raw);
            // A non-numeric score is absent, not zero.
            if v == 0.0 && !raw.chars().any(|c| c.is_ascii_digit()) {
                None
            } else {
                Some(v)
            }
        })
    }

    pub(crate) fn list(&self, col: usize) -> Vec<String> {
        self.opt(col).map(|raw| split_list(&raw)).unwrap_or_default()
    }
}

/// Shared driver: column-count gating plus per-row mapping.
pub(crate) fn parse_rows<T>(
    rows: &[RawRow],
    sheet: &str,
    min_columns: usize,
    options: &ParseOptions,
    map: impl Fn(&RowReader<'_>) -> T,
) -> Vec<T> {
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if row.len() < min_columns {
            // +2: 1-based, and the header row was stripped
            log::warn!(
                "Row {} of sheet '{}' has too few columns: expected {}, got {}; skipping",
                index + 2,
                sheet,
                min_columns,
                row.len()
            );
            continue;
        }
        records.push(map(&RowReader::new(row, index, options)));
    }
    records
}

#[cfg(test)]
pub(crate) fn rows(data: &[&[&str]]) -> Vec<RawRow> {
    data.iter()
        .map(|row| row.iter().map(|c| Value::String(c.to_string())).collect())
        .collect()
}

#[cfg(test)]
pub(crate) fn options(schema: SheetSchema, fallback: FallbackPolicy) -> ParseOptions {
    ParseOptions {
        schema,
        fallback,
        today: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
    }
}
