//! hrdash: command-line front end for the HR dashboard data layer.
//!
//! Loads `.env` when present, reads configuration from `~/.hrdash/config.json`
//! and the environment, then renders one dashboard view as text or JSON.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use hrdash_lib::analysis;
use hrdash_lib::services::dashboard::{summarize_participation, ViewResult};
use hrdash_lib::services::{
    format_brl, load_participation_view, load_performance_view, summarize_employees,
    summarize_trainings,
};
use hrdash_lib::{
    DashboardConfig, FallbackPolicy, GeminiClient, HrDataService, HrError, SheetSchema, ViewError,
};

#[derive(Parser)]
#[command(name = "hrdash")]
#[command(about = "HR dashboard figures from Google Sheets, with Gemini summaries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print a JSON envelope instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Sheet layout generation: current or legacy
    #[arg(long, global = true)]
    schema: Option<SheetSchema>,

    /// Empty-cell handling: placeholder or pass-through
    #[arg(long, global = true)]
    fallback: Option<FallbackPolicy>,
}

#[derive(Subcommand)]
enum Commands {
    /// Headcount and department distribution
    Employees,

    /// Investment, completion, satisfaction and occupancy figures
    Trainings,

    /// Enrollments with employee and training names resolved
    Participation,

    /// Performance metrics and one employee's trend
    Performance {
        /// Employee whose trend to show (defaults to the first with metrics)
        #[arg(long)]
        employee: Option<String>,
    },

    /// Summarize an employee's performance feedback with Gemini
    AnalyzeFeedback {
        employee_id: String,
    },

    /// Analyze a training's effectiveness notes with Gemini
    AnalyzeTraining {
        training_id: String,
    },

    /// Show the resolved configuration (credentials redacted)
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal outside development.
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&cli, &e);
            ExitCode::FAILURE
        }
    }
}

fn report(cli: &Cli, err: &anyhow::Error) {
    match err.downcast_ref::<HrError>() {
        Some(hr) if cli.json => {
            let envelope: ViewResult<()> = ViewResult::Error {
                error: ViewError::from(hr),
            };
            match serde_json::to_string_pretty(&envelope) {
                Ok(text) => println!("{}", text),
                Err(_) => eprintln!("{}", hr),
            }
        }
        Some(hr) => {
            eprintln!("{}", ViewError::from(hr).message);
            eprintln!("{}", hr.recovery_suggestion());
        }
        None => eprintln!("Error: {:#}", err),
    }
}

fn build_config(cli: &Cli) -> Result<DashboardConfig, HrError> {
    let mut config = DashboardConfig::from_env()?;
    if let Some(schema) = cli.schema {
        config.schema = schema;
    }
    if let Some(fallback) = cli.fallback {
        config.fallback = fallback;
    }
    Ok(config)
}

fn emit(cli: &Cli, data: serde_json::Value, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if cli.json {
        let envelope = ViewResult::Success { data };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = build_config(cli)?;
    let service = HrDataService::from_config(&config);

    match &cli.command {
        Commands::Config => {
            let data = json!({
                "spreadsheetConfigured": config.spreadsheet_id.is_some(),
                "sheetsApiKeyConfigured": config.sheets_api_key.is_some(),
                "geminiApiKeyConfigured": config.gemini_api_key.is_some(),
                "geminiModel": config.gemini_model,
                "schema": config.schema,
                "fallback": config.fallback,
            });
            emit(cli, data, || format!("{:#?}\n", config))
        }

        Commands::Employees => {
            let employees = service.employees().await?;
            let summary = summarize_employees(&employees);
            let data = json!({ "summary": summary, "employees": employees });
            emit(cli, data, || {
                let mut out = format!(
                    "Total de Funcionários: {}\nDepartamentos: {}\n\n",
                    summary.total_employees, summary.department_count
                );
                for bucket in &summary.departments {
                    out.push_str(&format!("  {:<30} {}\n", bucket.label, bucket.count));
                }
                out.push('\n');
                for e in &employees {
                    out.push_str(&format!(
                        "{}\t{}\t{}\t{}\t{}\n",
                        e.employee_id, e.name, e.department, e.position, e.hire_date
                    ));
                }
                out
            })
        }

        Commands::Trainings => {
            let trainings = service.trainings().await?;
            let summary = summarize_trainings(&trainings);
            let data = json!({ "summary": summary, "trainings": trainings });
            emit(cli, data, || {
                let mut out = format!(
                    "Investimento Total: {}\nTreinamentos Concluídos: {}\nSatisfação Média: {}\nTaxa de Ocupação Média: {}\n\nStatus:\n",
                    format_brl(summary.total_investment),
                    summary.completed,
                    or_na(summary.average_satisfaction.map(|s| format!("{:.1}/5", s))),
                    or_na(summary.average_occupancy.map(|o| format!("{:.0}%", o * 100.0))),
                );
                for bucket in summary.status_distribution.iter().filter(|b| b.count > 0) {
                    out.push_str(&format!("  {:<30} {}\n", bucket.label, bucket.count));
                }
                out.push_str("\nCusto por Categoria:\n");
                for bucket in &summary.cost_by_category {
                    out.push_str(&format!("  {:<30} {}\n", bucket.label, format_brl(bucket.amount)));
                }
                out.push('\n');
                for t in &trainings {
                    let participants = match (t.number_of_participants, t.max_participants) {
                        (Some(n), Some(max)) => format!("{}/{}", n, max),
                        _ => "N/A".to_string(),
                    };
                    out.push_str(&format!(
                        "{}\t{}\t{}\t{}\t{}\t{}\n",
                        t.training_id, t.training_name, t.status, t.category, participants, format_brl(t.cost)
                    ));
                }
                out
            })
        }

        Commands::Participation => {
            let view = load_participation_view(&service).await?;
            let summary = summarize_participation(&view.enrollments);
            let rows = view.rows();
            let data = json!({ "summary": summary, "enrollments": rows });
            emit(cli, data, || {
                let mut out = format!(
                    "Total de Inscrições: {}\nConclusões: {}\nReprovações: {}\n\n",
                    summary.total_enrollments, summary.completions, summary.failures
                );
                for r in &rows {
                    out.push_str(&format!(
                        "{}\t{}\t{}\t{}\t{}\t{}\n",
                        r.enrollment_id, r.employee, r.training, r.enrollment_date, r.completion_status, r.score
                    ));
                }
                out
            })
        }

        Commands::Performance { employee } => {
            let view = load_performance_view(&service).await?;
            let summary = view.summary();
            let selected = employee.clone().or_else(|| summary.default_employee.clone());
            let trend = selected
                .as_deref()
                .map(|id| view.trend(id))
                .unwrap_or_default();
            let dir = view.directory();
            let data = json!({
                "summary": summary,
                "selectedEmployee": selected,
                "trend": trend,
                "metrics": view.metrics,
            });
            emit(cli, data, || {
                let mut out = format!(
                    "Total de Métricas: {}\nFeedbacks para Análise: {}\n",
                    summary.total_metrics, summary.employees_with_feedback
                );
                if let Some(id) = selected.as_deref() {
                    out.push_str(&format!("\nTendência de {}:\n", dir.employee_name(id)));
                    for point in &trend {
                        out.push_str(&format!("  {}\t{}\t{}\n", point.date, point.metric_type, point.value));
                    }
                }
                out
            })
        }

        Commands::AnalyzeFeedback { employee_id } => {
            let metrics = service.performance_metrics().await?;
            let gemini = GeminiClient::new(&config);
            let generation = analysis::analyze_employee_feedback(&gemini, &metrics, employee_id).await?;
            let data = json!({ "employeeId": employee_id, "analysis": generation.message() });
            emit(cli, data, || format!("{}\n", generation))
        }

        Commands::AnalyzeTraining { training_id } => {
            let trainings = service.trainings().await?;
            let gemini = GeminiClient::new(&config);
            let generation =
                analysis::analyze_training_effectiveness(&gemini, &trainings, training_id).await?;
            let data = json!({ "trainingId": training_id, "analysis": generation.message() });
            emit(cli, data, || format!("{}\n", generation))
        }
    }
}
