//! Difficulty-weighted subject sizing.
//!
//! A subject's weight is its difficulty multiplier times its topic count.

use crate::{DifficultyWeights, SubjectInput};

/// Weight of one subject
pub fn subject_weight(subject: &SubjectInput, weights: &DifficultyWeights) -> f64 {
    weights.multiplier(&subject.difficulty) * f64::from(subject.topic_count)
}

/// Sum of all subject weights
pub fn total_weight(subjects: &[SubjectInput], weights: &DifficultyWeights) -> f64 {
    subjects.iter().map(|s| subject_weight(s, weights)).sum()
}
