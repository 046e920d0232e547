//! Topic start days and spaced-repetition revisions.
//!
//! Topics of a subject are spread evenly over the plan: topic `i` of `T`
//! starts on day `floor(i / T * days_available)`. Each topic is then
//! revised 1, 3, 7 and 14 days after it starts, dropping any revision
//! that would land on or after the exam.

use crate::{Revision, RevisionKind, Topic};

/// Days after the initial study day on which a topic is revised
pub const REVISION_OFFSETS: [u32; 4] = [1, 3, 7, 14];

/// Build the dated topic list for one subject
///
/// `allocated_hours` is the subject's unrounded share; each topic gets an
/// equal slice of it and each revision half a slice, rounded up to a whole
/// hour.
pub fn schedule_topics(
    subject_name: &str,
    topic_count: u32,
    allocated_hours: f64,
    days_available: u32,
) -> Vec<Topic> {
    if topic_count == 0 {
        return Vec::new();
    }

    let hours_per_topic = allocated_hours / f64::from(topic_count);

    (0..topic_count)
        .map(|i| {
            let start_day = start_day(i, topic_count, days_available);
            Topic {
                topic_id: i + 1,
                topic_name: format!("{} - Topic {}", subject_name, i + 1),
                initial_study_day: start_day,
                initial_study_hours: hours_per_topic,
                revisions: schedule_revisions(start_day, hours_per_topic, days_available),
                completed: false,
                progress: 0,
            }
        })
        .collect()
}

fn start_day(index: u32, topic_count: u32, days_available: u32) -> u32 {
    let fraction = f64::from(index) / f64::from(topic_count);
    (fraction * f64::from(days_available)).floor() as u32
}

fn schedule_revisions(start_day: u32, hours_per_topic: f64, days_available: u32) -> Vec<Revision> {
    let duration = (hours_per_topic / 2.0).ceil();

    REVISION_OFFSETS
        .iter()
        .zip(RevisionKind::LADDER)
        .filter_map(|(&offset, kind)| {
            let day = start_day + offset;
            (day < days_available).then_some(Revision {
                day,
                kind,
                duration,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_spread_over_plan() {
        let topics = schedule_topics("A", 2, 40.0 / 7.0, 10);

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].initial_study_day, 0);
        assert_eq!(topics[1].initial_study_day, 5);
        assert_eq!(topics[0].topic_id, 1);
        assert_eq!(topics[1].topic_name, "A - Topic 2");
        assert!((topics[0].initial_study_hours - 20.0 / 7.0).abs() < 1e-12);
        assert!(!topics[0].completed);
        assert_eq!(topics[0].progress, 0);
    }

    #[test]
    fn test_revisions_drop_past_exam() {
        let topics = schedule_topics("A", 2, 40.0 / 7.0, 10);

        let days: Vec<u32> = topics[0].revisions.iter().map(|r| r.day).collect();
        assert_eq!(days, vec![1, 3, 7]);
        let kinds: Vec<RevisionKind> = topics[0].revisions.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RevisionKind::Initial, RevisionKind::First, RevisionKind::Second]
        );

        let days: Vec<u32> = topics[1].revisions.iter().map(|r| r.day).collect();
        assert_eq!(days, vec![6, 8]);
    }

    #[test]
    fn test_revision_duration_is_half_rounded_up() {
        // 2.857h per topic -> ceil(1.43) = 2
        let topics = schedule_topics("A", 2, 40.0 / 7.0, 10);
        assert!(topics[0].revisions.iter().all(|r| r.duration == 2.0));

        // 7.14h per topic -> ceil(3.57) = 4
        let topics = schedule_topics("B", 2, 100.0 / 7.0, 10);
        assert!(topics[0].revisions.iter().all(|r| r.duration == 4.0));
    }

    #[test]
    fn test_full_ladder_on_long_plan() {
        let topics = schedule_topics("Long", 1, 30.0, 30);
        let revisions = &topics[0].revisions;

        assert_eq!(revisions.len(), 4);
        assert_eq!(revisions[3].day, 14);
        assert_eq!(revisions[3].kind, RevisionKind::Final);
    }

    #[test]
    fn test_revision_days_strictly_increase_within_plan() {
        for days_available in 1..40 {
            for topic_count in 1..12 {
                let topics = schedule_topics("S", topic_count, 17.0, days_available);
                for topic in &topics {
                    assert!(topic.initial_study_day < days_available);
                    let mut previous = topic.initial_study_day;
                    for revision in &topic.revisions {
                        assert!(revision.day > previous);
                        assert!(revision.day < days_available);
                        assert!(REVISION_OFFSETS.contains(&(revision.day - topic.initial_study_day)));
                        previous = revision.day;
                    }
                }
            }
        }
    }

    #[test]
    fn test_no_topics_for_zero_count() {
        assert!(schedule_topics("Empty", 0, 0.0, 10).is_empty());
    }
}
