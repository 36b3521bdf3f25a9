//! Service layer between the front end and the Google clients.
//!
//! - data: one retrieval call per sheet, fetch then parse
//! - dashboard: composite view loads and the figures each view shows

pub mod dashboard;
pub mod data;

pub use dashboard::{
    format_brl, load_participation_view, load_performance_view, summarize_employees,
    summarize_trainings, Directory, ParticipationView, PerformanceView, ViewResult,
};
pub use data::{range_for, Entity, HrDataService};
