use crate::types::PerformanceMetric;

use super::{parse_rows, ParseOptions, RawRow, SheetSchema};

/// Sheet name as it exists upstream (sic).
pub const SHEET: &str = "Perfomance";

pub fn min_columns(schema: SheetSchema) -> usize {
    match schema {
        SheetSchema::Current => 6,
        SheetSchema::Legacy => 7,
    }
}

/// Id used when the sheet has no id column; matches the key the dashboard
/// table uses for its rows.
pub fn synthesize_id(employee_id: &str, metric_type: &str, metric_date: &str) -> String {
    format!("{}-{}-{}", employee_id, metric_type, metric_date)
}

pub fn parse_performance_metrics(rows: &[RawRow], options: &ParseOptions) -> Vec<PerformanceMetric> {
    // Legacy rows carry their own id in column A; everything else shifts by one.
    let offset = match options.schema {
        SheetSchema::Current => 0,
        SheetSchema::Legacy => 1,
    };

    parse_rows(rows, SHEET, min_columns(options.schema), options, |r| {
        let employee_id = r.text_or(offset, "Func. Desconhecido");
        let metric_type = r.text_or(offset + 1, "Métrica Indisponível");
        let metric_date = r.date_or_today(offset + 3);

        let performance_id = match options.schema {
            SheetSchema::Legacy => r.id_or(0, "TEMP_PERF_ID"),
            SheetSchema::Current => synthesize_id(&employee_id, &metric_type, &metric_date),
        };

        PerformanceMetric {
            performance_id,
            metric_value: r.amount(offset + 2),
            period_type: r.text_or(offset + 4, "N/A"),
            feedback: r.opt(offset + 5).unwrap_or_default(),
            employee_id,
            metric_type,
            metric_date,
        }
    })
}
