use crate::types::{Training, TrainingStatus};

use super::{parse_rows, ParseOptions, RawRow, SheetSchema};

pub const SHEET: &str = "Treinamentos";

/// Column positions that differ between sheet generations.
struct Layout {
    min_columns: usize,
    satisfaction: Option<usize>,
    notes: usize,
    prerequisites: usize,
    default_status: TrainingStatus,
}

fn layout(schema: SheetSchema) -> Layout {
    match schema {
        SheetSchema::Current => Layout {
            min_columns: 13,
            satisfaction: None,
            notes: 11,
            prerequisites: 12,
            default_status: TrainingStatus::Scheduled,
        },
        SheetSchema::Legacy => Layout {
            min_columns: 14,
            satisfaction: Some(11),
            notes: 12,
            prerequisites: 13,
            default_status: TrainingStatus::Planned,
        },
    }
}

pub fn parse_trainings(rows: &[RawRow], options: &ParseOptions) -> Vec<Training> {
    let layout = layout(options.schema);

    parse_rows(rows, SHEET, layout.min_columns, options, |r| {
        let status = match r.opt(7) {
            Some(label) => TrainingStatus::from_label(&label).unwrap_or_else(|| {
                log::debug!(
                    "Unknown training status '{}', using '{}'",
                    label,
                    layout.default_status
                );
                layout.default_status
            }),
            None => layout.default_status,
        };

        Training {
            training_id: r.id_or(0, "TEMP_TRAINING_ID"),
            training_name: r.text_or(1, "Treinamento Indisponível"),
            category: r.text_or(2, "Categoria Indisponível"),
            duration_hours: r.amount(3),
            cost: r.amount(4),
            provider: r.text_or(5, "Provedor Indisponível"),
            training_date: r.date_or_today(6),
            status,
            target_audience: r.text_or(8, "N/A"),
            number_of_participants: r.count(9),
            max_participants: r.count(10),
            satisfaction_score: layout.satisfaction.and_then(|col| r.score(col)),
            effectiveness_notes: r.opt(layout.notes).unwrap_or_default(),
            prerequisites: r.list(layout.prerequisites),
        }
    })
}
