#![forbid(unsafe_code)]

//! Core domain model and scheduling engine for the study planner.
//!
//! This crate provides:
//! - Domain types (subjects, topics, revisions, weeks, days, sessions)
//! - Plan generation (weighting, hour allocation, topic scheduling, day packing)
//! - Queries and progress updates over a generated plan
//! - Collaborators for storing plans per user and exporting sessions to CSV

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod weight;
pub mod allocation;
pub mod topics;
pub mod packer;
pub mod weeks;
pub mod planner;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use error::{Error, InvalidInputKind, Result};
pub use types::*;
pub use config::{Config, DifficultyWeights, PlannerConfig};
pub use packer::{subject_color, SUBJECT_COLORS};
pub use planner::{
    calculate_progress, dashboard_stats, find_day, milestones, parse_date, study_plan_summary,
    subject_progress, todays_plan, update_topic_progress, DashboardStats, Milestone, Planner,
    StudyPlanSummary, SubjectProgress, SubjectSummary,
};
pub use store::PlanStore;
pub use export::export_sessions_csv;
