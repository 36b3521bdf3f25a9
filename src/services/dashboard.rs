// Dashboard service: composite view loads and the figures each view shows.
// Views that join sheets load them concurrently and resolve foreign ids
// through a `Directory` built once per load.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::data::HrDataService;
use crate::error::{HrError, ViewError};
use crate::google_api::RangeReader;
use crate::types::{Employee, Enrollment, PerformanceMetric, Training, TrainingStatus};

/// Completion labels counted by the participation view.
const COMPLETED_LABEL: &str = "Concluído";
const FAILED_LABEL: &str = "Reprovado";

/// Result envelope handed to the front end.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ViewResult<T> {
    Success { data: T },
    Error { error: ViewError },
}

impl<T> From<Result<T, HrError>> for ViewResult<T> {
    fn from(result: Result<T, HrError>) -> Self {
        match result {
            Ok(data) => ViewResult::Success { data },
            Err(e) => ViewResult::Error {
                error: ViewError::from(&e),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountBucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountBucket {
    pub label: String,
    pub amount: f64,
}

/// Count per label, labels in first-seen order.
fn count_by<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<CountBucket> {
    let mut buckets: Vec<CountBucket> = Vec::new();
    for label in labels {
        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(CountBucket {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    buckets
}

// ============================================================================
// Directory
// ============================================================================

/// Id-keyed lookup over one load's employees and trainings. When an id
/// occurs twice the first record wins.
#[derive(Debug, Default)]
pub struct Directory<'a> {
    employees: HashMap<&'a str, &'a Employee>,
    trainings: HashMap<&'a str, &'a Training>,
}

impl<'a> Directory<'a> {
    pub fn new(employees: &'a [Employee], trainings: &'a [Training]) -> Self {
        let mut dir = Directory::default();
        for e in employees {
            dir.employees.entry(e.employee_id.as_str()).or_insert(e);
        }
        for t in trainings {
            dir.trainings.entry(t.training_id.as_str()).or_insert(t);
        }
        dir
    }

    pub fn employee(&self, id: &str) -> Option<&'a Employee> {
        self.employees.get(id).copied()
    }

    pub fn training(&self, id: &str) -> Option<&'a Training> {
        self.trainings.get(id).copied()
    }

    /// Display name, or the raw id when unknown.
    pub fn employee_name<'b>(&self, id: &'b str) -> &'b str
    where
        'a: 'b,
    {
        self.employee(id).map(|e| e.name.as_str()).unwrap_or(id)
    }

    pub fn training_name<'b>(&self, id: &'b str) -> &'b str
    where
        'a: 'b,
    {
        self.training(id).map(|t| t.training_name.as_str()).unwrap_or(id)
    }
}

// ============================================================================
// Employees
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub total_employees: usize,
    pub department_count: usize,
    pub departments: Vec<CountBucket>,
}

pub fn summarize_employees(employees: &[Employee]) -> EmployeeSummary {
    let departments = count_by(employees.iter().map(|e| e.department.as_str()));
    EmployeeSummary {
        total_employees: employees.len(),
        department_count: departments.len(),
        departments,
    }
}

// ============================================================================
// Trainings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSummary {
    pub total_investment: f64,
    pub completed: usize,
    /// Mean 0-5 score over completed trainings that carry one.
    pub average_satisfaction: Option<f64>,
    /// Mean participants / max participants as a fraction (0.9 = 90%).
    pub average_occupancy: Option<f64>,
    /// Every status, zero counts included, in `TrainingStatus::ALL` order.
    pub status_distribution: Vec<CountBucket>,
    pub cost_by_category: Vec<AmountBucket>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

pub fn summarize_trainings(trainings: &[Training]) -> TrainingSummary {
    let completed: Vec<&Training> = trainings
        .iter()
        .filter(|t| t.status == TrainingStatus::Completed)
        .collect();

    let average_occupancy = mean(trainings.iter().filter_map(|t| {
        match (t.number_of_participants, t.max_participants) {
            (Some(n), Some(max)) if max > 0 => Some(f64::from(n) / f64::from(max)),
            _ => None,
        }
    }));

    let status_distribution = TrainingStatus::ALL
        .iter()
        .map(|status| CountBucket {
            label: status.label().to_string(),
            count: trainings.iter().filter(|t| t.status == *status).count(),
        })
        .collect();

    let mut cost_by_category: Vec<AmountBucket> = Vec::new();
    for t in trainings {
        match cost_by_category.iter_mut().find(|b| b.label == t.category) {
            Some(bucket) => bucket.amount += t.cost,
            None => cost_by_category.push(AmountBucket {
                label: t.category.clone(),
                amount: t.cost,
            }),
        }
    }

    TrainingSummary {
        total_investment: trainings.iter().map(|t| t.cost).sum(),
        completed: completed.len(),
        average_satisfaction: mean(completed.iter().filter_map(|t| t.satisfaction_score)),
        average_occupancy,
        status_distribution,
        cost_by_category,
    }
}

// ============================================================================
// Participation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationSummary {
    pub total_enrollments: usize,
    pub completions: usize,
    pub failures: usize,
}

pub fn summarize_participation(enrollments: &[Enrollment]) -> ParticipationSummary {
    let with_status = |label: &str| {
        enrollments
            .iter()
            .filter(|e| e.completion_status == label)
            .count()
    };
    ParticipationSummary {
        total_enrollments: enrollments.len(),
        completions: with_status(COMPLETED_LABEL),
        failures: with_status(FAILED_LABEL),
    }
}

/// One enrollment with its foreign ids resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationRow {
    pub enrollment_id: String,
    pub employee: String,
    pub training: String,
    pub enrollment_date: String,
    pub completion_status: String,
    pub score: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationView {
    pub enrollments: Vec<Enrollment>,
    pub employees: Vec<Employee>,
    pub trainings: Vec<Training>,
}

impl ParticipationView {
    pub fn directory(&self) -> Directory<'_> {
        Directory::new(&self.employees, &self.trainings)
    }

    pub fn summary(&self) -> ParticipationSummary {
        summarize_participation(&self.enrollments)
    }

    pub fn rows(&self) -> Vec<ParticipationRow> {
        let dir = self.directory();
        self.enrollments
            .iter()
            .map(|e| ParticipationRow {
                enrollment_id: e.enrollment_id.clone(),
                employee: dir.employee_name(&e.employee_id).to_string(),
                training: dir.training_name(&e.training_id).to_string(),
                enrollment_date: e.enrollment_date.clone(),
                completion_status: e.completion_status.clone(),
                score: e.score.clone(),
            })
            .collect()
    }
}

/// Enrollments, employees and trainings fetched concurrently. Any failure
/// fails the whole load.
pub async fn load_participation_view<R: RangeReader>(
    service: &HrDataService<R>,
) -> Result<ParticipationView, HrError> {
    let (enrollments, employees, trainings) = tokio::try_join!(
        service.enrollments(),
        service.employees(),
        service.trainings()
    )?;
    log::info!(
        "Participation view loaded: {} enrollments, {} employees, {} trainings",
        enrollments.len(),
        employees.len(),
        trainings.len()
    );
    Ok(ParticipationView {
        enrollments,
        employees,
        trainings,
    })
}

// ============================================================================
// Performance
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_metrics: usize,
    pub employees_with_feedback: usize,
    /// First employee, in sheet order, with at least one metric.
    pub default_employee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String,
    pub value: f64,
    pub metric_type: String,
}

/// Metrics of one employee ordered by date. Dates that do not parse as
/// `YYYY-MM-DD` keep their relative order after the dated ones.
pub fn performance_trend(metrics: &[PerformanceMetric], employee_id: &str) -> Vec<TrendPoint> {
    let mut selected: Vec<&PerformanceMetric> = metrics
        .iter()
        .filter(|m| m.employee_id == employee_id)
        .collect();
    selected.sort_by_key(|m| {
        let date = NaiveDate::parse_from_str(m.metric_date.trim(), "%Y-%m-%d").ok();
        (date.is_none(), date)
    });
    selected
        .into_iter()
        .map(|m| TrendPoint {
            date: m.metric_date.clone(),
            value: m.metric_value,
            metric_type: m.metric_type.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceView {
    pub metrics: Vec<PerformanceMetric>,
    pub employees: Vec<Employee>,
}

impl PerformanceView {
    pub fn directory(&self) -> Directory<'_> {
        Directory::new(&self.employees, &[])
    }

    /// Employees with non-blank feedback, in employee sheet order.
    pub fn employees_with_feedback(&self) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|e| {
                self.metrics
                    .iter()
                    .any(|m| m.employee_id == e.employee_id && m.has_feedback())
            })
            .collect()
    }

    pub fn summary(&self) -> PerformanceSummary {
        let default_employee = self
            .employees
            .iter()
            .find(|e| self.metrics.iter().any(|m| m.employee_id == e.employee_id))
            .map(|e| e.employee_id.clone());
        PerformanceSummary {
            total_metrics: self.metrics.len(),
            employees_with_feedback: self.employees_with_feedback().len(),
            default_employee,
        }
    }

    pub fn trend(&self, employee_id: &str) -> Vec<TrendPoint> {
        performance_trend(&self.metrics, employee_id)
    }
}

/// Metrics and employees fetched concurrently. Any failure fails the whole
/// load.
pub async fn load_performance_view<R: RangeReader>(
    service: &HrDataService<R>,
) -> Result<PerformanceView, HrError> {
    let (metrics, employees) =
        tokio::try_join!(service.performance_metrics(), service.employees())?;
    log::info!(
        "Performance view loaded: {} metrics, {} employees",
        metrics.len(),
        employees.len()
    );
    Ok(PerformanceView { metrics, employees })
}

// ============================================================================
// Formatting
// ============================================================================

/// Brazilian currency display: `R$ 1.234,56`.
pub fn format_brl(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("R$ {}{},{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{options, FallbackPolicy, SheetSchema};
    use crate::test_support::MemoryReader;

    fn employee(id: &str, name: &str, department: &str) -> Employee {
        Employee {
            employee_id: id.to_string(),
            name: name.to_string(),
            department: department.to_string(),
            position: "Analista".to_string(),
            hire_date: "2021-06-01".to_string(),
            last_training_date: None,
            total_training_hours: Some(0),
        }
    }

    fn training(id: &str, category: &str, cost: f64, status: TrainingStatus) -> Training {
        Training {
            training_id: id.to_string(),
            training_name: format!("Curso {}", id),
            category: category.to_string(),
            duration_hours: 8.0,
            cost,
            provider: "Interno".to_string(),
            training_date: "2024-01-10".to_string(),
            status,
            target_audience: "Todos".to_string(),
            number_of_participants: None,
            max_participants: None,
            satisfaction_score: None,
            effectiveness_notes: String::new(),
            prerequisites: Vec::new(),
        }
    }

    fn metric(employee_id: &str, date: &str, value: f64, feedback: &str) -> PerformanceMetric {
        PerformanceMetric {
            performance_id: format!("{}-{}", employee_id, date),
            employee_id: employee_id.to_string(),
            metric_type: "Qualidade".to_string(),
            metric_value: value,
            metric_date: date.to_string(),
            period_type: "Mensal".to_string(),
            feedback: feedback.to_string(),
        }
    }

    fn enrollment(id: &str, employee_id: &str, training_id: &str, status: &str) -> Enrollment {
        Enrollment {
            enrollment_id: id.to_string(),
            employee_id: employee_id.to_string(),
            training_id: training_id.to_string(),
            enrollment_date: "2024-02-01".to_string(),
            completion_status: status.to_string(),
            date_obtained: String::new(),
            score: String::new(),
        }
    }

    #[test]
    fn test_directory_falls_back_to_raw_id() {
        let employees = vec![employee("E1", "Ana", "Eng"), employee("E1", "Duplicada", "Eng")];
        let trainings = vec![training("T1", "Técnico", 0.0, TrainingStatus::Completed)];
        let dir = Directory::new(&employees, &trainings);

        assert_eq!(dir.employee_name("E1"), "Ana");
        assert_eq!(dir.employee_name("E404"), "E404");
        assert_eq!(dir.training_name("T1"), "Curso T1");
        assert_eq!(dir.training_name("T9"), "T9");
    }

    #[test]
    fn test_employee_summary_first_seen_order() {
        let employees = vec![
            employee("E1", "Ana", "Engenharia"),
            employee("E2", "Bruno", "Marketing"),
            employee("E3", "Carla", "Engenharia"),
        ];
        let summary = summarize_employees(&employees);
        assert_eq!(summary.total_employees, 3);
        assert_eq!(summary.department_count, 2);
        assert_eq!(
            summary.departments,
            vec![
                CountBucket { label: "Engenharia".to_string(), count: 2 },
                CountBucket { label: "Marketing".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_training_summary() {
        let mut a = training("T1", "Técnico", 1000.0, TrainingStatus::Completed);
        a.satisfaction_score = Some(4.0);
        a.number_of_participants = Some(3);
        a.max_participants = Some(4);
        let mut b = training("T2", "Gestão", 500.5, TrainingStatus::Completed);
        b.satisfaction_score = Some(5.0);
        b.number_of_participants = Some(5);
        b.max_participants = Some(0);
        let mut c = training("T3", "Técnico", 250.0, TrainingStatus::Scheduled);
        c.satisfaction_score = Some(1.0);
        c.number_of_participants = Some(1);
        c.max_participants = Some(4);

        let summary = summarize_trainings(&[a, b, c]);
        assert_eq!(summary.total_investment, 1750.5);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.average_satisfaction, Some(4.5));
        assert_eq!(summary.average_occupancy, Some(0.5));
        assert_eq!(summary.status_distribution.len(), TrainingStatus::ALL.len());
        assert_eq!(summary.status_distribution[0].label, "Agendado");
        assert_eq!(summary.status_distribution[0].count, 1);
        assert_eq!(summary.status_distribution[1].count, 0);
        assert_eq!(
            summary.cost_by_category,
            vec![
                AmountBucket { label: "Técnico".to_string(), amount: 1250.0 },
                AmountBucket { label: "Gestão".to_string(), amount: 500.5 },
            ]
        );
    }

    #[test]
    fn test_training_summary_empty_means_are_none() {
        let summary = summarize_trainings(&[training("T1", "X", 10.0, TrainingStatus::Planned)]);
        assert_eq!(summary.average_satisfaction, None);
        assert_eq!(summary.average_occupancy, None);
    }

    #[test]
    fn test_participation_summary_and_rows() {
        let view = ParticipationView {
            enrollments: vec![
                enrollment("IN1", "E1", "T1", "Concluído"),
                enrollment("IN2", "E2", "T1", "Reprovado"),
                enrollment("IN3", "E9", "T9", "Inscrito"),
            ],
            employees: vec![employee("E1", "Ana", "Eng"), employee("E2", "Bruno", "Eng")],
            trainings: vec![training("T1", "Técnico", 0.0, TrainingStatus::Completed)],
        };

        assert_eq!(
            view.summary(),
            ParticipationSummary { total_enrollments: 3, completions: 1, failures: 1 }
        );
        let rows = view.rows();
        assert_eq!(rows[0].employee, "Ana");
        assert_eq!(rows[0].training, "Curso T1");
        assert_eq!(rows[2].employee, "E9");
        assert_eq!(rows[2].training, "T9");
    }

    #[test]
    fn test_performance_summary_and_trend() {
        let view = PerformanceView {
            metrics: vec![
                metric("E2", "2024-03-01", 70.0, ""),
                metric("E2", "2024-01-01", 60.0, "Precisa melhorar prazos"),
                metric("E3", "2024-02-01", 90.0, "  "),
                metric("E2", "sem data", 65.0, ""),
                metric("E2", "2024-02-01", 80.0, ""),
            ],
            employees: vec![
                employee("E1", "Ana", "Eng"),
                employee("E2", "Bruno", "Eng"),
                employee("E3", "Carla", "Eng"),
            ],
        };

        let summary = view.summary();
        assert_eq!(summary.total_metrics, 5);
        assert_eq!(summary.employees_with_feedback, 1);
        assert_eq!(summary.default_employee.as_deref(), Some("E2"));

        let values: Vec<f64> = view.trend("E2").iter().map(|p| p.value).collect();
        assert_eq!(values, vec![60.0, 80.0, 70.0, 65.0]);
        assert!(view.trend("E1").is_empty());
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
        assert_eq!(format_brl(1_500_000.0), "R$ 1.500.000,00");
        assert_eq!(format_brl(-12.5), "R$ -12,50");
    }

    #[tokio::test]
    async fn test_load_performance_view() {
        let reader = MemoryReader::new()
            .with("Perfomance!A:F", &[&["E1", "Produtividade", "85%", "2024-03-01", "Mensal", "Ótimo"]])
            .with(
                "Funcionários!A:G",
                &[&["E1", "Ana", "Eng", "Dev", "2020-01-01", "2024-02-01", "12"]],
            );
        let service = HrDataService::new(reader, options(SheetSchema::Current, FallbackPolicy::PassThrough));

        let view = load_performance_view(&service).await.unwrap();
        assert_eq!(view.metrics.len(), 1);
        assert_eq!(view.directory().employee_name("E1"), "Ana");
        assert_eq!(view.employees[0].total_training_hours, Some(12));
    }

    #[tokio::test]
    async fn test_composite_load_fails_whole_on_one_error() {
        let reader = MemoryReader::new()
            .with("Participacao_Treinamentos!A:G", &[&["IN1", "E1", "T1", "2024-01-01", "Concluído", "", ""]])
            .with("Funcionários!A:G", &[&["E1", "Ana", "Eng", "Dev", "2020-01-01"]])
            .fail("Treinamentos!A:M", 403, "The caller does not have permission");
        let service = HrDataService::new(reader, options(SheetSchema::Current, FallbackPolicy::PassThrough));

        let err = load_participation_view(&service).await.unwrap_err();
        match err {
            HrError::Fetch { range, status, .. } => {
                assert_eq!(range, "Treinamentos!A:M");
                assert_eq!(status, 403);
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[test]
    fn test_view_result_envelope() {
        let ok = ViewResult::from(Ok::<usize, HrError>(3));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"], 3);

        let failed = ViewResult::<usize>::from(Err(HrError::Network("connection refused".to_string())));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["canRetry"], true);
    }
}
