//! Proportional distribution of the plan's hours across subjects.
//!
//! Each subject receives `weight / total_weight` of
//! `days_available * hours_per_day`. The displayed totals are rounded from
//! the unrounded share, never from each other, so per-topic hours and the
//! topic schedule both derive from the exact allocation.

use crate::topics::schedule_topics;
use crate::weight::subject_weight;
use crate::{DifficultyWeights, Error, InvalidInputKind, Result, Subject, SubjectInput};

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Allocate hours to every subject and schedule its topics
///
/// Fails with `DivisionByZero` when `total_weight` is zero, e.g. when every
/// subject has zero topics.
pub fn allocate_time(
    subjects: &[SubjectInput],
    total_weight: f64,
    days_available: u32,
    hours_per_day: f64,
    weights: &DifficultyWeights,
) -> Result<Vec<Subject>> {
    if total_weight <= 0.0 || !total_weight.is_finite() {
        return Err(Error::InvalidInput(InvalidInputKind::DivisionByZero));
    }

    let total_hours = f64::from(days_available) * hours_per_day;

    let allocated = subjects
        .iter()
        .map(|input| {
            let weight = subject_weight(input, weights);
            let allocated_hours = (weight / total_weight) * total_hours;
            let hours_per_topic = if input.topic_count == 0 {
                0.0
            } else {
                allocated_hours / f64::from(input.topic_count)
            };

            tracing::debug!(
                "Allocated {:.2}h to '{}' (weight {})",
                allocated_hours,
                input.name,
                weight
            );

            Subject {
                name: input.name.clone(),
                difficulty: input.difficulty.clone(),
                topic_count: input.topic_count,
                weight,
                allocated_hours,
                total_hours: allocated_hours.round(),
                hours_per_topic: round2(hours_per_topic),
                topics: schedule_topics(
                    &input.name,
                    input.topic_count,
                    allocated_hours,
                    days_available,
                ),
            }
        })
        .collect();

    Ok(allocated)
}
