use serde::{Deserialize, Serialize};

/// One row of the `Funcionários` sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub position: String,
    /// Calendar date as written in the sheet (normally `YYYY-MM-DD`).
    pub hire_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_training_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_training_hours: Option<u32>,
}

/// Training lifecycle state. The sheet label is the wire form.
///
/// The live sheet schedules trainings as "Agendado"; the legacy sheet used
/// "Planejado". Both are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingStatus {
    #[serde(rename = "Agendado")]
    Scheduled,
    #[serde(rename = "Planejado")]
    Planned,
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[serde(rename = "Concluído")]
    Completed,
    #[serde(rename = "Cancelado")]
    Cancelled,
    #[serde(rename = "Reprovado")]
    Failed,
}

impl TrainingStatus {
    pub const ALL: [TrainingStatus; 6] = [
        TrainingStatus::Scheduled,
        TrainingStatus::Planned,
        TrainingStatus::InProgress,
        TrainingStatus::Completed,
        TrainingStatus::Cancelled,
        TrainingStatus::Failed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TrainingStatus::Scheduled => "Agendado",
            TrainingStatus::Planned => "Planejado",
            TrainingStatus::InProgress => "Em Andamento",
            TrainingStatus::Completed => "Concluído",
            TrainingStatus::Cancelled => "Cancelado",
            TrainingStatus::Failed => "Reprovado",
        }
    }

    /// Exact label match; surrounding whitespace is ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the `Treinamentos` sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Training {
    pub training_id: String,
    pub training_name: String,
    pub category: String,
    pub duration_hours: f64,
    pub cost: f64,
    pub provider: String,
    /// Start date.
    pub training_date: String,
    pub status: TrainingStatus,
    /// e.g. "Engenharia", "Marketing", "Todos", "Liderança"
    pub target_audience: String,
    /// Actual head count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_participants: Option<u32>,
    /// Planned head count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    /// 0-5 scale. Only present in the legacy sheet layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction_score: Option<f64>,
    pub effectiveness_notes: String,
    /// Prerequisite training ids or free-text descriptions, in sheet order.
    pub prerequisites: Vec<String>,
}

/// One row of the `Perfomance` sheet (the sheet name is misspelled upstream).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetric {
    /// Synthesized as `{employee_id}-{metric_type}-{metric_date}` when the
    /// sheet has no id column.
    pub performance_id: String,
    pub employee_id: String,
    pub metric_type: String,
    pub metric_value: f64,
    pub metric_date: String,
    pub period_type: String,
    pub feedback: String,
}

impl PerformanceMetric {
    pub fn has_feedback(&self) -> bool {
        !self.feedback.trim().is_empty()
    }
}

/// One row of the `Participacao_Treinamentos` sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrollment {
    pub enrollment_id: String,
    pub employee_id: String,
    pub training_id: String,
    pub enrollment_date: String,
    /// Free text; the dashboard counts "Concluído" and "Reprovado".
    pub completion_status: String,
    pub date_obtained: String,
    /// Free text, not necessarily numeric.
    pub score: String,
}
