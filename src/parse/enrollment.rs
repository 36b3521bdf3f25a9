use crate::types::Enrollment;

use super::{parse_rows, ParseOptions, RawRow};

pub const SHEET: &str = "Participacao_Treinamentos";
pub const MIN_COLUMNS: usize = 7;

/// Same layout in both sheet generations.
pub fn parse_enrollments(rows: &[RawRow], options: &ParseOptions) -> Vec<Enrollment> {
    parse_rows(rows, SHEET, MIN_COLUMNS, options, |r| Enrollment {
        enrollment_id: r.id_or(0, "TEMP_ENROLLMENT_ID"),
        employee_id: r.text_or(1, "Func. Desconhecido"),
        training_id: r.text_or(2, "Treinamento Indisponível"),
        enrollment_date: r.date_or_today(3),
        completion_status: r.text_or(4, "N/A"),
        date_obtained: r.opt(5).unwrap_or_default(),
        score: r.opt(6).unwrap_or_default(),
    })
}
