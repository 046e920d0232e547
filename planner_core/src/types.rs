//! Core domain types for the study planner.
//!
//! This module defines the plan aggregate and everything it owns:
//! - Subject input as supplied by the user
//! - Subjects with allocated hours and dated topics/revisions
//! - Weeks, days and timed sessions
//!
//! Plan types serialize with camelCase keys so rendering and storage
//! consumers see `topicsSchedule`, `weeklySchedule` and friends.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Input Types
// ============================================================================

/// How hard a subject is; drives its share of study hours
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Anything else; weighted with a multiplier of 1
    Unrecognized(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Unrecognized(s) => s,
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        match s.as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Unrecognized(s),
        }
    }
}

impl From<&str> for Difficulty {
    fn from(s: &str) -> Self {
        Difficulty::from(s.to_string())
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Unrecognized(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subject as entered by the user, before any scheduling
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInput {
    pub name: String,
    pub difficulty: Difficulty,
    pub topic_count: u32,
}

impl SubjectInput {
    pub fn new(name: impl Into<String>, difficulty: impl Into<Difficulty>, topic_count: u32) -> Self {
        Self {
            name: name.into(),
            difficulty: difficulty.into(),
            topic_count,
        }
    }
}

// ============================================================================
// Subject, Topic and Revision
// ============================================================================

/// Position of a revision in the spaced-repetition ladder
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevisionKind {
    #[serde(rename = "Initial")]
    Initial,
    #[serde(rename = "1st Revision")]
    First,
    #[serde(rename = "2nd Revision")]
    Second,
    #[serde(rename = "Final Revision")]
    Final,
}

impl RevisionKind {
    /// Labels in ladder order, matching the offsets 1, 3, 7 and 14 days
    pub const LADDER: [RevisionKind; 4] = [
        RevisionKind::Initial,
        RevisionKind::First,
        RevisionKind::Second,
        RevisionKind::Final,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RevisionKind::Initial => "Initial",
            RevisionKind::First => "1st Revision",
            RevisionKind::Second => "2nd Revision",
            RevisionKind::Final => "Final Revision",
        }
    }
}

impl fmt::Display for RevisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scheduled revision of a topic
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    /// Day offset from plan start
    pub day: u32,
    #[serde(rename = "type")]
    pub kind: RevisionKind,
    /// Hours
    pub duration: f64,
}

/// One topic of a subject, with its first study day and revisions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// 1-based within the subject
    pub topic_id: u32,
    pub topic_name: String,
    pub initial_study_day: u32,
    pub initial_study_hours: f64,
    pub revisions: Vec<Revision>,
    pub completed: bool,
    /// 0 or 100
    pub progress: u8,
}

impl Topic {
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        self.progress = if completed { 100 } else { 0 };
    }
}

/// A subject with its allocated hours and topic schedule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    pub difficulty: Difficulty,
    pub topic_count: u32,
    pub weight: f64,
    /// Unrounded share of the plan's hours
    pub allocated_hours: f64,
    /// `allocated_hours` rounded to the nearest hour
    pub total_hours: f64,
    /// `allocated_hours / topic_count` rounded to two decimals
    pub hours_per_topic: f64,
    #[serde(rename = "topicsSchedule")]
    pub topics: Vec<Topic>,
}

impl Subject {
    pub fn completed_topics(&self) -> usize {
        self.topics.iter().filter(|t| t.completed).count()
    }
}

// ============================================================================
// Weeks, Days and Sessions
// ============================================================================

/// Whether a session is first-time study or a revision
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Initial,
    Revision,
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::Initial => f.write_str("initial"),
            SessionType::Revision => f.write_str("revision"),
        }
    }
}

/// One timed block on a day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// HH:MM, 24h clock
    pub start_time: String,
    pub end_time: String,
    pub subject: String,
    pub topic: String,
    /// Hours actually placed (capped at the session length)
    pub duration: f64,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_type: Option<RevisionKind>,
    pub color: String,
}

/// Everything scheduled on one calendar day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// 0-based offset from plan start
    pub day_number: u32,
    pub date: NaiveDate,
    pub sessions: Vec<Session>,
    /// Sum of the uncapped durations of the day's study items
    pub total_hours: f64,
    pub subjects_today: Vec<String>,
}

/// A run of up to seven days
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    /// 1-based
    pub week_number: u32,
    pub start_day: u32,
    /// Exclusive
    pub end_day: u32,
    pub days: Vec<Day>,
    pub total_hours: f64,
}

// ============================================================================
// Plan Aggregate
// ============================================================================

/// A complete generated study plan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub subjects: Vec<Subject>,
    #[serde(rename = "weeklySchedule")]
    pub weeks: Vec<Week>,
    pub days_available: u32,
    pub hours_per_day: f64,
    pub start_date: NaiveDate,
    pub exam_date: NaiveDate,
    pub total_hours_available: f64,
    pub created_at: NaiveDateTime,
}

impl StudyPlan {
    /// All days of the plan in order
    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    pub fn total_topics(&self) -> usize {
        self.subjects.iter().map(|s| s.topics.len()).sum()
    }

    pub fn completed_topics(&self) -> usize {
        self.subjects.iter().map(Subject::completed_topics).sum()
    }
}
