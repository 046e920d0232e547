//! CSV export of a plan's daily sessions for calendars and spreadsheets.

use crate::{Day, Result, Session, StudyPlan, Week};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    week: u32,
    day_number: u32,
    date: String,
    start_time: &'a str,
    end_time: &'a str,
    subject: &'a str,
    topic: &'a str,
    #[serde(rename = "type")]
    session_type: String,
    revision_type: Option<&'static str>,
    duration: f64,
    color: &'a str,
}

impl<'a> CsvRow<'a> {
    fn new(week: &Week, day: &Day, session: &'a Session) -> Self {
        CsvRow {
            week: week.week_number,
            day_number: day.day_number,
            date: day.date.format("%Y-%m-%d").to_string(),
            start_time: &session.start_time,
            end_time: &session.end_time,
            subject: &session.subject,
            topic: &session.topic,
            session_type: session.session_type.to_string(),
            revision_type: session.revision_type.map(|r| r.label()),
            duration: session.duration,
            color: &session.color,
        }
    }
}

/// Write every session of the plan to `csv_path`, one row each
///
/// Overwrites any existing file. Returns the number of sessions written.
pub fn export_sessions_csv(plan: &StudyPlan, csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::Writer::from_writer(file);
    let mut count = 0;

    for week in &plan.weeks {
        for day in &week.days {
            for session in &day.sessions {
                writer.serialize(CsvRow::new(week, day, session))?;
                count += 1;
            }
        }
    }

    // An empty plan still gets a header line
    if count == 0 {
        writer.write_record([
            "week",
            "day_number",
            "date",
            "start_time",
            "end_time",
            "subject",
            "topic",
            "type",
            "revision_type",
            "duration",
            "color",
        ])?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sessions to {:?}", count, csv_path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Planner, SubjectInput};
    use chrono::NaiveDate;

    fn plan() -> StudyPlan {
        let today = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let exam = NaiveDate::from_ymd_opt(2025, 2, 13).unwrap();
        Planner::default()
            .generate_study_plan(
                &[SubjectInput::new("A", "easy", 2), SubjectInput::new("B", "hard", 2)],
                exam,
                2.0,
                today,
            )
            .unwrap()
    }

    #[test]
    fn test_export_writes_every_session() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out/sessions.csv");
        let plan = plan();
        let expected: usize = plan.days().map(|d| d.sessions.len()).sum();

        let count = export_sessions_csv(&plan, &csv_path).unwrap();
        assert_eq!(count, expected);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "week");
        assert_eq!(&headers[7], "type");

        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), expected);
        assert_eq!(&records[0][2], "2025-02-03");
        assert_eq!(&records[0][3], "09:00");
        assert_eq!(&records[0][5], "A");
        assert_eq!(&records[0][7], "initial");
        assert_eq!(&records[0][8], "");
    }

    #[test]
    fn test_export_labels_revisions() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("sessions.csv");

        export_sessions_csv(&plan(), &csv_path).unwrap();

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.contains("1st Revision"));
        assert!(contents.contains(",revision,"));
    }

    #[test]
    fn test_export_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("sessions.csv");

        let first = export_sessions_csv(&plan(), &csv_path).unwrap();
        let second = export_sessions_csv(&plan(), &csv_path).unwrap();
        assert_eq!(first, second);

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), second);
    }
}
