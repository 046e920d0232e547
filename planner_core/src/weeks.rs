//! Buckets the plan's days into weeks of seven (the last may be shorter).

use crate::packer::pack_day;
use crate::{PlannerConfig, Subject, Week};
use chrono::NaiveDate;

pub const DAYS_PER_WEEK: u32 = 7;

/// Pack every day of the plan and group the days into weeks
pub fn build_weeks(
    subjects: &[Subject],
    days_available: u32,
    hours_per_day: f64,
    start_date: NaiveDate,
    config: &PlannerConfig,
) -> Vec<Week> {
    let total_weeks = days_available.div_ceil(DAYS_PER_WEEK);

    (0..total_weeks)
        .map(|week| {
            let start_day = week * DAYS_PER_WEEK;
            let end_day = (start_day + DAYS_PER_WEEK).min(days_available);
            let days: Vec<_> = (start_day..end_day)
                .map(|day| pack_day(subjects, day, hours_per_day, start_date, config))
                .collect();
            let total_hours = days.iter().map(|d| d.total_hours).sum();

            Week {
                week_number: week + 1,
                start_day,
                end_day,
                days,
                total_hours,
            }
        })
        .collect()
}
