//! Plan generation and the queries/updates run against a finished plan.
//!
//! Generation pipeline:
//! 1. Validate subjects, hours and dates
//! 2. Weigh subjects by difficulty and topic count
//! 3. Share out hours and schedule each subject's topics and revisions
//! 4. Pack every day into timed sessions, grouped into weeks
//!
//! Nothing here reads the clock; "today" is always passed in.

use crate::allocation::{allocate_time, round2};
use crate::packer::subject_color;
use crate::weeks::build_weeks;
use crate::weight::total_weight;
use crate::{
    Day, Difficulty, Error, InvalidInputKind, PlannerConfig, Result, Session, StudyPlan,
    SubjectInput,
};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Generates study plans with a fixed set of packing and weighting rules
#[derive(Clone, Debug, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Generate a complete plan from `today` up to (not including) the exam
    ///
    /// Either the whole plan is produced or an `InvalidInput` error is
    /// returned; there are no partial results.
    pub fn generate_study_plan(
        &self,
        subjects: &[SubjectInput],
        exam_date: NaiveDate,
        hours_per_day: f64,
        today: NaiveDate,
    ) -> Result<StudyPlan> {
        validate_subjects(subjects)?;

        if !(hours_per_day > 0.0 && hours_per_day <= 24.0) {
            return Err(Error::InvalidInput(InvalidInputKind::BadHours));
        }

        let days_available = match u32::try_from((exam_date - today).num_days()) {
            Ok(days) if days > 0 => days,
            _ => return Err(Error::InvalidInput(InvalidInputKind::PastExamDate)),
        };

        let total_weight = total_weight(subjects, &self.config.difficulty);
        let allocated = allocate_time(
            subjects,
            total_weight,
            days_available,
            hours_per_day,
            &self.config.difficulty,
        )?;
        let weeks = build_weeks(&allocated, days_available, hours_per_day, today, &self.config);

        tracing::info!(
            "Generated study plan: {} subjects over {} days ({} weeks), {}h per day",
            allocated.len(),
            days_available,
            weeks.len(),
            hours_per_day
        );

        Ok(StudyPlan {
            subjects: allocated,
            weeks,
            days_available,
            hours_per_day,
            start_date: today,
            exam_date,
            total_hours_available: f64::from(days_available) * hours_per_day,
            created_at: today.and_time(NaiveTime::MIN),
        })
    }

    /// Generate a plan starting from the local calendar date
    pub fn generate_study_plan_from_now(
        &self,
        subjects: &[SubjectInput],
        exam_date: NaiveDate,
        hours_per_day: f64,
    ) -> Result<StudyPlan> {
        let today = Local::now().date_naive();
        self.generate_study_plan(subjects, exam_date, hours_per_day, today)
    }
}

fn validate_subjects(subjects: &[SubjectInput]) -> Result<()> {
    if subjects.is_empty() {
        return Err(Error::InvalidInput(InvalidInputKind::EmptySubjects));
    }
    if subjects.iter().any(|s| s.name.trim().is_empty()) {
        return Err(Error::InvalidInput(InvalidInputKind::BlankSubjectName));
    }
    Ok(())
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(InvalidInputKind::BadDate))
}

// ============================================================================
// Summaries
// ============================================================================

/// Headline figures for a plan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanSummary {
    pub total_subjects: usize,
    pub total_days: u32,
    pub total_hours: f64,
    pub average_hours_per_day: f64,
    pub subject_breakdown: Vec<SubjectSummary>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub name: String,
    pub total_hours: f64,
    pub topics: u32,
    pub difficulty: Difficulty,
}

pub fn study_plan_summary(plan: &StudyPlan) -> StudyPlanSummary {
    StudyPlanSummary {
        total_subjects: plan.subjects.len(),
        total_days: plan.days_available,
        total_hours: plan.total_hours_available,
        average_hours_per_day: round2(plan.hours_per_day),
        subject_breakdown: plan
            .subjects
            .iter()
            .map(|s| SubjectSummary {
                name: s.name.clone(),
                total_hours: s.total_hours,
                topics: s.topic_count,
                difficulty: s.difficulty.clone(),
            })
            .collect(),
        start_date: plan.start_date,
        end_date: plan.exam_date,
    }
}

/// Percentage of topics completed, rounded; 0 for a plan without topics
pub fn calculate_progress(plan: &StudyPlan) -> u32 {
    let total = plan.total_topics();
    if total == 0 {
        return 0;
    }
    (100.0 * plan.completed_topics() as f64 / total as f64).round() as u32
}

/// The plan's day falling on `date`, if any
pub fn find_day(plan: &StudyPlan, date: NaiveDate) -> Option<&Day> {
    plan.days().find(|d| d.date == date)
}

/// Sessions scheduled for `today`; empty when the date is outside the plan
pub fn todays_plan(plan: &StudyPlan, today: NaiveDate) -> &[Session] {
    find_day(plan, today)
        .map(|d| d.sessions.as_slice())
        .unwrap_or(&[])
}

/// Mark one topic as done or not done
///
/// Only the addressed topic's `completed` and `progress` change. Already
/// packed days are left as generated.
pub fn update_topic_progress(
    plan: &mut StudyPlan,
    subject_index: usize,
    topic_index: usize,
    completed: bool,
) -> Result<()> {
    let topic = plan
        .subjects
        .get_mut(subject_index)
        .and_then(|s| s.topics.get_mut(topic_index))
        .ok_or(Error::IndexOutOfRange {
            subject_index,
            topic_index,
        })?;

    topic.set_completed(completed);
    tracing::info!(
        "Marked '{}' as {}",
        topic.topic_name,
        if completed { "completed" } else { "pending" }
    );
    Ok(())
}

// ============================================================================
// Progress reporting
// ============================================================================

/// Dashboard counters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_subjects: usize,
    pub total_topics: usize,
    pub completed_topics: usize,
    pub pending_topics: usize,
    pub days_left: u32,
    pub progress: u32,
}

pub fn dashboard_stats(plan: &StudyPlan, today: NaiveDate) -> DashboardStats {
    let total_topics = plan.total_topics();
    let completed_topics = plan.completed_topics();
    let days_left = u32::try_from((plan.exam_date - today).num_days()).unwrap_or(0);

    DashboardStats {
        total_subjects: plan.subjects.len(),
        total_topics,
        completed_topics,
        pending_topics: total_topics - completed_topics,
        days_left,
        progress: calculate_progress(plan),
    }
}

/// Hours done and left for one subject, in proportion to topics completed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProgress {
    pub name: String,
    pub completed_topics: usize,
    pub total_topics: usize,
    pub completed_hours: f64,
    pub remaining_hours: f64,
    pub color: String,
}

pub fn subject_progress(plan: &StudyPlan) -> Vec<SubjectProgress> {
    plan.subjects
        .iter()
        .map(|subject| {
            let total = subject.topics.len();
            let completed = subject.completed_topics();
            let completed_hours = if total > 0 {
                completed as f64 / total as f64 * subject.total_hours
            } else {
                0.0
            };

            SubjectProgress {
                name: subject.name.clone(),
                completed_topics: completed,
                total_topics: total,
                completed_hours,
                remaining_hours: subject.total_hours - completed_hours,
                color: subject_color(&subject.name).to_string(),
            }
        })
        .collect()
}

/// A step on the progress ladder
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub threshold: u32,
    pub title: String,
    pub subtitle: String,
    pub color: String,
    pub achieved: bool,
    /// Highest milestone reached so far
    pub current: bool,
}

const MILESTONES: [(u32, &str, &str, &str); 5] = [
    (0, "Start", "Begin Journey", "#00D4FF"),
    (25, "25%", "Getting Started", "#00D4FF"),
    (50, "50%", "Halfway There", "#5C5DFF"),
    (75, "75%", "Home Stretch", "#FFB800"),
    (100, "100%", "Complete!", "#00F5A0"),
];

pub fn milestones(progress: u32) -> Vec<Milestone> {
    MILESTONES
        .iter()
        .enumerate()
        .map(|(i, &(threshold, title, subtitle, color))| {
            let achieved = progress >= threshold;
            let next_reached = MILESTONES
                .get(i + 1)
                .is_some_and(|&(next, ..)| progress >= next);
            Milestone {
                threshold,
                title: title.into(),
                subtitle: subtitle.into(),
                color: color.into(),
                achieved,
                current: achieved && !next_reached,
            }
        })
        .collect()
}
