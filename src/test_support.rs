//! Test doubles shared across modules.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::HrError;
use crate::google_api::{RangeReader, SheetRange};
use crate::parse::{rows, RawRow};

/// In-memory `RangeReader` keyed by rendered range (`Sheet!A:G`). The header
/// row is assumed already stripped. Unknown ranges answer like an empty
/// sheet; ranges registered with `fail` answer with a `Fetch` error.
#[derive(Default)]
pub(crate) struct MemoryReader {
    ranges: HashMap<String, Vec<RawRow>>,
    failures: HashMap<String, (u16, String)>,
}

impl MemoryReader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, range: &str, data: &[&[&str]]) -> Self {
        self.ranges.insert(range.to_string(), rows(data));
        self
    }

    pub(crate) fn fail(mut self, range: &str, status: u16, message: &str) -> Self {
        self.failures
            .insert(range.to_string(), (status, message.to_string()));
        self
    }
}

#[async_trait]
impl RangeReader for MemoryReader {
    async fn read_range(&self, range: &SheetRange) -> Result<Vec<RawRow>, HrError> {
        let key = range.to_string();
        if let Some((status, message)) = self.failures.get(&key) {
            return Err(HrError::Fetch {
                range: key,
                status: *status,
                message: message.clone(),
            });
        }
        Ok(self.ranges.get(&key).cloned().unwrap_or_default())
    }
}
