//! Day packing: turns the study items landing on one day into timed sessions.
//!
//! Items are collected subject by subject (initial study first, then that
//! topic's revisions), grouped by subject name with a stable sort, and laid
//! out from the configured start hour. Every session is capped at the
//! session length and followed by a fixed break.
//!
//! The day's remaining hours are tracked as sessions are placed. Unless
//! `enforce_daily_budget` is set they do not stop placement, so a busy day
//! can run past `hours_per_day`.

use crate::{Day, PlannerConfig, RevisionKind, Session, SessionType, Subject};
use chrono::{Duration, NaiveDate};

/// Fixed palette for subject colours
pub const SUBJECT_COLORS: [&str; 8] = [
    "#5C5DFF", "#00D4FF", "#FF006E", "#00F5A0", "#5A7FDB", "#FFB800", "#FF4081", "#00BCD4",
];

/// Deterministic colour for a subject name
///
/// Runs `hash = unit + ((hash << 5) - hash)` over the UTF-16 code units of
/// the name. The shift operates on the low 32 bits of the running hash; the
/// subtraction and addition do not wrap.
pub fn subject_color(subject: &str) -> &'static str {
    let mut hash: i64 = 0;
    for unit in subject.encode_utf16() {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        hash = i64::from(unit).wrapping_add(shifted.wrapping_sub(hash));
    }
    SUBJECT_COLORS[(hash.unsigned_abs() % SUBJECT_COLORS.len() as u64) as usize]
}

/// Something to study on a given day, before it gets a time slot
#[derive(Debug)]
struct StudyItem<'a> {
    session_type: SessionType,
    subject: &'a str,
    topic: &'a str,
    duration: f64,
    revision_type: Option<RevisionKind>,
}

/// Collect every initial study and revision falling on `day_number`
///
/// Completed topics drop their initial study but keep their revisions.
fn collect_items(subjects: &[Subject], day_number: u32) -> Vec<StudyItem<'_>> {
    let mut items = Vec::new();

    for subject in subjects {
        for topic in &subject.topics {
            if topic.initial_study_day == day_number && !topic.completed {
                items.push(StudyItem {
                    session_type: SessionType::Initial,
                    subject: &subject.name,
                    topic: &topic.topic_name,
                    duration: topic.initial_study_hours,
                    revision_type: None,
                });
            }

            for revision in topic.revisions.iter().filter(|r| r.day == day_number) {
                items.push(StudyItem {
                    session_type: SessionType::Revision,
                    subject: &subject.name,
                    topic: &topic.topic_name,
                    duration: revision.duration,
                    revision_type: Some(revision.kind),
                });
            }
        }
    }

    // Stable: keeps topic/revision order within a subject
    items.sort_by(|a, b| a.subject.cmp(b.subject));
    items
}

/// Format minutes since midnight as HH:MM
///
/// Hours past 23 are not wrapped.
fn clock_time(minutes: f64) -> String {
    let total = minutes.round().max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Build the timed schedule for one day of the plan
pub fn pack_day(
    subjects: &[Subject],
    day_number: u32,
    hours_per_day: f64,
    start_date: NaiveDate,
    config: &PlannerConfig,
) -> Day {
    let items = collect_items(subjects, day_number);
    let session_cap = config.session_cap_hours();
    let break_hours = config.break_hours();

    let mut cursor = f64::from(config.day_start_hour);
    let mut remaining_hours = hours_per_day;
    let mut sessions = Vec::with_capacity(items.len());

    for item in &items {
        if config.enforce_daily_budget && remaining_hours <= 0.0 {
            tracing::debug!(
                "Day {}: budget spent, not placing '{}'",
                day_number,
                item.topic
            );
            continue;
        }

        let session_hours = item.duration.min(session_cap);
        let start_minutes = cursor * 60.0;

        sessions.push(Session {
            start_time: clock_time(start_minutes),
            end_time: clock_time(start_minutes + session_hours * 60.0),
            subject: item.subject.to_string(),
            topic: item.topic.to_string(),
            duration: session_hours,
            session_type: item.session_type,
            revision_type: item.revision_type,
            color: subject_color(item.subject).to_string(),
        });

        cursor += session_hours + break_hours;
        remaining_hours -= session_hours;
    }

    if remaining_hours < 0.0 {
        tracing::debug!(
            "Day {} is over budget by {:.2}h",
            day_number,
            -remaining_hours
        );
    }

    let mut subjects_today: Vec<String> = Vec::new();
    for item in &items {
        if !subjects_today.iter().any(|s| s == item.subject) {
            subjects_today.push(item.subject.to_string());
        }
    }

    Day {
        day_number,
        date: start_date + Duration::days(i64::from(day_number)),
        sessions,
        total_hours: items.iter().map(|i| i.duration).sum(),
        subjects_today,
    }
}
