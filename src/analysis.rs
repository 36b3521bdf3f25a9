//! AI-assisted summaries for the performance and training views.
//!
//! Builds the HR-analyst prompts from loaded records and runs them through a
//! `TextGenerator`. Empty input is rejected before any request is made.

use chrono::NaiveDate;

use crate::error::HrError;
use crate::google_api::{Generation, TextGenerator};
use crate::types::{PerformanceMetric, Training};

/// Render an ISO date as `DD/MM/YYYY`; anything else is returned as written.
fn display_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// One line per non-blank feedback entry of `employee_id`, in sheet order.
/// Returns `None` when the employee has no feedback.
pub fn collect_employee_feedback(metrics: &[PerformanceMetric], employee_id: &str) -> Option<String> {
    let lines: Vec<String> = metrics
        .iter()
        .filter(|m| m.employee_id == employee_id && m.has_feedback())
        .map(|m| format!("Feedback em {}: \"{}\"", display_date(&m.metric_date), m.feedback))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

pub fn feedback_prompt(feedback_block: &str) -> String {
    format!(
        "Como um analista de RH, analise os seguintes feedbacks de performance para um funcionário. \
         Resuma os pontos chave, identifique temas recorrentes (positivos e negativos) e sugira pontos \
         para discussão em uma reunião de 1-on-1. Formate a resposta com clareza usando Markdown \
         (use ** para negrito e * para listas). Feedbacks:\n\n{}",
        feedback_block
    )
}

pub fn effectiveness_prompt(notes: &str) -> String {
    format!(
        "Você é um especialista em RH analisando a eficácia de um treinamento corporativo. \
         Com base nas notas a seguir, forneça uma análise estruturada. Use Markdown para formatação \
         (negrito com ** e listas com *).\n\n\
         Estruture sua resposta com os seguintes tópicos:\n\
         - **Resumo Executivo:** Um parágrafo conciso sobre a eficácia geral.\n\
         - **Pontos Fortes:** Principais sucessos ou resultados positivos observados.\n\
         - **Áreas de Melhoria:** Pontos onde o treinamento pode ser otimizado.\n\
         - **Ações Sugeridas:** Recomendações práticas para futuras sessões.\n\n\
         **Notas de Eficácia:**\n---\n{}\n---\n",
        notes.trim()
    )
}

/// Summarize every feedback entry recorded for one employee.
pub async fn analyze_employee_feedback(
    generator: &dyn TextGenerator,
    metrics: &[PerformanceMetric],
    employee_id: &str,
) -> Result<Generation, HrError> {
    let block = collect_employee_feedback(metrics, employee_id).ok_or_else(|| {
        HrError::NothingToAnalyze(format!("Nenhum feedback encontrado para o funcionário {}.", employee_id))
    })?;
    log::info!("Analyzing feedback for employee {}", employee_id);
    generator.generate(&feedback_prompt(&block)).await
}

/// Analyze the effectiveness notes of one training.
pub async fn analyze_training_effectiveness(
    generator: &dyn TextGenerator,
    trainings: &[Training],
    training_id: &str,
) -> Result<Generation, HrError> {
    let training = trainings
        .iter()
        .find(|t| t.training_id == training_id)
        .ok_or_else(|| HrError::NothingToAnalyze(format!("Treinamento {} não encontrado.", training_id)))?;

    if training.effectiveness_notes.trim().is_empty() {
        return Err(HrError::NothingToAnalyze(
            "Nenhuma nota de eficácia para analisar.".to_string(),
        ));
    }
    log::info!("Analyzing effectiveness notes for training {}", training_id);
    generator
        .generate(&effectiveness_prompt(&training.effectiveness_notes))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrainingStatus;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and answers with fixed text.
    struct FakeGenerator {
        prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<Generation, HrError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(Generation::Text("**Resumo**".to_string()))
        }
    }

    fn metric(employee_id: &str, date: &str, feedback: &str) -> PerformanceMetric {
        PerformanceMetric {
            performance_id: format!("{}-Produtividade-{}", employee_id, date),
            employee_id: employee_id.to_string(),
            metric_type: "Produtividade".to_string(),
            metric_value: 90.0,
            metric_date: date.to_string(),
            period_type: "Mensal".to_string(),
            feedback: feedback.to_string(),
        }
    }

    fn training(id: &str, notes: &str) -> Training {
        Training {
            training_id: id.to_string(),
            training_name: "Rust Avançado".to_string(),
            category: "Técnico".to_string(),
            duration_hours: 16.0,
            cost: 1200.0,
            provider: "Interno".to_string(),
            training_date: "2024-02-10".to_string(),
            status: TrainingStatus::Completed,
            target_audience: "Engenharia".to_string(),
            number_of_participants: Some(10),
            max_participants: Some(12),
            satisfaction_score: None,
            effectiveness_notes: notes.to_string(),
            prerequisites: Vec::new(),
        }
    }

    #[test]
    fn test_collect_feedback_formats_dates() {
        let metrics = vec![
            metric("E1", "2024-03-01", "Entregou antes do prazo"),
            metric("E2", "2024-03-01", "Outro funcionário"),
            metric("E1", "2024-04-01", "   "),
            metric("E1", "março/24", "Boa comunicação"),
        ];
        let block = collect_employee_feedback(&metrics, "E1").unwrap();
        assert_eq!(
            block,
            "Feedback em 01/03/2024: \"Entregou antes do prazo\"\nFeedback em março/24: \"Boa comunicação\""
        );
        assert!(collect_employee_feedback(&metrics, "E9").is_none());
    }

    #[test]
    fn test_prompts_embed_input() {
        assert!(feedback_prompt("X").ends_with("Feedbacks:\n\nX"));
        let p = effectiveness_prompt("  notas  ");
        assert!(p.contains("**Resumo Executivo:**"));
        assert!(p.contains("---\nnotas\n---"));
    }

    #[tokio::test]
    async fn test_analyze_feedback_sends_prompt() {
        let generator = FakeGenerator::new();
        let metrics = vec![metric("E1", "2024-03-01", "Ótimo trabalho")];
        let out = analyze_employee_feedback(&generator, &metrics, "E1").await.unwrap();
        assert_eq!(out.message(), "**Resumo**");

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Feedback em 01/03/2024: \"Ótimo trabalho\""));
    }

    #[tokio::test]
    async fn test_analyze_feedback_without_feedback_skips_request() {
        let generator = FakeGenerator::new();
        let metrics = vec![metric("E1", "2024-03-01", "")];
        let err = analyze_employee_feedback(&generator, &metrics, "E1").await.unwrap_err();
        assert!(matches!(err, HrError::NothingToAnalyze(_)));
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_training_effectiveness() {
        let generator = FakeGenerator::new();
        let trainings = vec![training("T1", "Equipe aplicou o conteúdo"), training("T2", " ")];

        analyze_training_effectiveness(&generator, &trainings, "T1").await.unwrap();
        assert!(generator.prompts()[0].contains("Equipe aplicou o conteúdo"));

        let blank = analyze_training_effectiveness(&generator, &trainings, "T2").await;
        assert!(matches!(blank, Err(HrError::NothingToAnalyze(_))));
        let unknown = analyze_training_effectiveness(&generator, &trainings, "T9").await;
        assert!(matches!(unknown, Err(HrError::NothingToAnalyze(_))));
        assert_eq!(generator.prompts().len(), 1);
    }
}
