use crate::types::Employee;

use super::{parse_rows, ParseOptions, RawRow, SheetSchema};

pub const SHEET: &str = "Funcionários";
pub const MIN_COLUMNS: usize = 5;

/// Columns: id, name, department, position, hire date, and in the live
/// layout last training date (F) and total training hours (G).
pub fn parse_employees(rows: &[RawRow], options: &ParseOptions) -> Vec<Employee> {
    parse_rows(rows, SHEET, MIN_COLUMNS, options, |r| {
        let (last_training_date, total_training_hours) = match options.schema {
            SheetSchema::Current => (
                r.opt(5),
                // Column present in the layout: unparseable hours read as 0.
                Some(r.count(6).unwrap_or(0)),
            ),
            SheetSchema::Legacy => (None, None),
        };

        Employee {
            employee_id: r.id_or(0, "TEMP_ID"),
            name: r.text_or(1, "Nome Indisponível"),
            department: r.text_or(2, "Departamento Indisponível"),
            position: r.text_or(3, "Cargo Indisponível"),
            hire_date: r.date_or_today(4),
            last_training_date,
            total_training_hours,
        }
    })
}
