// Data service: one retrieval call per sheet.
// Fetches the entity's range for the configured schema and hands the rows to
// its parser. No joins, no caching; every call goes to the reader.

use crate::config::DashboardConfig;
use crate::error::HrError;
use crate::google_api::{RangeReader, SheetRange, SheetsClient};
use crate::parse::{self, ParseOptions, SheetSchema};
use crate::types::{Employee, Enrollment, PerformanceMetric, Training};

/// The four sheets the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Employees,
    Trainings,
    Performance,
    Enrollments,
}

/// Range read for `entity` under `schema`.
pub fn range_for(entity: Entity, schema: SheetSchema) -> SheetRange {
    let (sheet, end) = match (entity, schema) {
        (Entity::Employees, SheetSchema::Current) => (parse::employee::SHEET, "G"),
        (Entity::Employees, SheetSchema::Legacy) => (parse::employee::SHEET, "E"),
        (Entity::Trainings, SheetSchema::Current) => (parse::training::SHEET, "M"),
        (Entity::Trainings, SheetSchema::Legacy) => (parse::training::SHEET, "N"),
        (Entity::Performance, SheetSchema::Current) => (parse::performance::SHEET, "F"),
        (Entity::Performance, SheetSchema::Legacy) => (parse::performance::SHEET, "G"),
        (Entity::Enrollments, _) => (parse::enrollment::SHEET, "G"),
    };
    SheetRange::new(sheet, "A", end)
}

pub struct HrDataService<R> {
    reader: R,
    options: ParseOptions,
}

impl HrDataService<SheetsClient> {
    /// Service over the live Sheets API.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            SheetsClient::new(config),
            ParseOptions::new(config.schema, config.fallback),
        )
    }
}

impl<R: RangeReader> HrDataService<R> {
    pub fn new(reader: R, options: ParseOptions) -> Self {
        Self { reader, options }
    }

    async fn rows(&self, entity: Entity) -> Result<Vec<parse::RawRow>, HrError> {
        let range = range_for(entity, self.options.schema);
        self.reader.read_range(&range).await
    }

    pub async fn employees(&self) -> Result<Vec<Employee>, HrError> {
        let rows = self.rows(Entity::Employees).await?;
        Ok(parse::parse_employees(&rows, &self.options))
    }

    pub async fn trainings(&self) -> Result<Vec<Training>, HrError> {
        let rows = self.rows(Entity::Trainings).await?;
        Ok(parse::parse_trainings(&rows, &self.options))
    }

    pub async fn performance_metrics(&self) -> Result<Vec<PerformanceMetric>, HrError> {
        let rows = self.rows(Entity::Performance).await?;
        Ok(parse::parse_performance_metrics(&rows, &self.options))
    }

    pub async fn enrollments(&self) -> Result<Vec<Enrollment>, HrError> {
        let rows = self.rows(Entity::Enrollments).await?;
        Ok(parse::parse_enrollments(&rows, &self.options))
    }
}
