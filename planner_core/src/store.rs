//! Plan persistence keyed by user id, with file locking.
//!
//! Each user's plan lives in `<dir>/plans/<user>.json`. Writes go through a
//! locked temp file that is renamed over the old plan, so readers never see
//! a half-written file. `update` additionally holds an exclusive lock on
//! `<dir>/plans/<user>.lock` from load to save, so concurrent updates to the
//! same plan run one after another.

use crate::{Error, Result, StudyPlan};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Directory-backed store holding one plan per user
#[derive(Clone, Debug)]
pub struct PlanStore {
    dir: PathBuf,
}

impl PlanStore {
    /// Create a store rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: data_dir.into().join("plans"),
        }
    }

    /// Path of the plan file for `user_id`
    pub fn plan_path(&self, user_id: &str) -> Result<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.dir.join(format!("{}.json", user_id)))
    }

    /// Load a user's plan with shared locking
    ///
    /// Returns `None` if the user has no plan yet. A corrupted file is
    /// logged and treated as missing.
    pub fn load(&self, user_id: &str) -> Result<Option<StudyPlan>> {
        let path = self.plan_path(user_id)?;
        if !path.exists() {
            tracing::debug!("No plan stored for user '{}'", user_id);
            return Ok(None);
        }

        let contents = match read_locked(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Unable to read plan file {:?}: {}. Ignoring it.", path, e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<StudyPlan>(&contents) {
            Ok(plan) => {
                tracing::debug!("Loaded plan for '{}' from {:?}", user_id, path);
                Ok(Some(plan))
            }
            Err(e) => {
                tracing::warn!("Failed to parse plan file {:?}: {}. Ignoring it.", path, e);
                Ok(None)
            }
        }
    }

    /// Save a user's plan, replacing any previous one atomically
    pub fn save(&self, user_id: &str, plan: &StudyPlan) -> Result<()> {
        let path = self.plan_path(user_id)?;
        std::fs::create_dir_all(&self.dir)?;

        // Temp file in the same directory so the rename stays on one filesystem
        let temp = NamedTempFile::new_in(&self.dir)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, plan)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved plan for '{}' to {:?}", user_id, path);
        Ok(())
    }

    /// Load a user's plan, modify it, and save it back
    ///
    /// Fails if the user has no plan. The per-user lock file is held for
    /// the whole read-modify-write, so an update never overwrites another
    /// process's concurrent update. If `f` fails nothing is saved.
    pub fn update<F>(&self, user_id: &str, f: F) -> Result<StudyPlan>
    where
        F: FnOnce(&mut StudyPlan) -> Result<()>,
    {
        validate_user_id(user_id)?;
        std::fs::create_dir_all(&self.dir)?;

        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.dir.join(format!("{}.lock", user_id)))?;
        lock.lock_exclusive()?;

        let outcome = self.update_locked(user_id, f);
        lock.unlock()?;
        outcome
    }

    fn update_locked<F>(&self, user_id: &str, f: F) -> Result<StudyPlan>
    where
        F: FnOnce(&mut StudyPlan) -> Result<()>,
    {
        let mut plan = self
            .load(user_id)?
            .ok_or_else(|| Error::Store(format!("no plan stored for user '{}'", user_id)))?;
        f(&mut plan)?;
        self.save(user_id, &plan)?;
        Ok(plan)
    }
}

fn read_locked(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    Ok(contents)
}

fn validate_user_id(user_id: &str) -> Result<()> {
    let valid = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::Store(format!("invalid user id '{}'", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{update_topic_progress, Planner, SubjectInput};
    use chrono::NaiveDate;

    fn sample_plan() -> StudyPlan {
        let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let exam = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        Planner::default()
            .generate_study_plan(
                &[
                    SubjectInput::new("Networks", "hard", 3),
                    SubjectInput::new("Statistics", "medium", 2),
                ],
                exam,
                3.0,
                today,
            )
            .unwrap()
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());
        let plan = sample_plan();

        store.save("alice", &plan).unwrap();
        let loaded = store.load("alice").unwrap().unwrap();

        assert_eq!(loaded, plan);
        assert!(temp_dir.path().join("plans/alice.json").exists());
    }

    #[test]
    fn test_load_missing_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());

        assert!(store.load("nobody").unwrap().is_none());
    }

    #[test]
    fn test_plans_are_kept_per_user() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());
        let plan = sample_plan();

        store.save("alice", &plan).unwrap();

        assert!(store.load("bob").unwrap().is_none());
        assert!(store.load("alice").unwrap().is_some());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());
        store.save("alice", &sample_plan()).unwrap();

        store
            .update("alice", |plan| update_topic_progress(plan, 1, 0, true))
            .unwrap();

        let loaded = store.load("alice").unwrap().unwrap();
        assert!(loaded.subjects[1].topics[0].completed);
        assert!(!loaded.subjects[0].topics[0].completed);
    }

    #[test]
    fn test_stored_plans_are_unchanged_by_save_and_update() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());
        let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let subjects = [
            SubjectInput::new("Algebra", "easy", 3),
            SubjectInput::new("Biology", "hard", 7),
            SubjectInput::new("Chemistry", "medium", 1),
        ];

        for days in [1, 2, 3, 6, 11, 17, 30] {
            for hours in [0.3, 0.7, 1.1, 2.5, 3.3, 7.0, 13.9] {
                let exam = today + chrono::Duration::days(days);
                let plan = Planner::default()
                    .generate_study_plan(&subjects, exam, hours, today)
                    .unwrap();

                store.save("grid", &plan).unwrap();
                assert_eq!(store.load("grid").unwrap().unwrap(), plan);

                let mut expected = plan.clone();
                update_topic_progress(&mut expected, 0, 0, true).unwrap();
                let updated = store
                    .update("grid", |p| update_topic_progress(p, 0, 0, true))
                    .unwrap();
                assert_eq!(updated, expected);
                assert_eq!(store.load("grid").unwrap().unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());
        let plan = sample_plan();
        let topic_count = plan.subjects[0].topics.len();
        store.save("alice", &plan).unwrap();

        let handles: Vec<_> = (0..topic_count)
            .map(|topic| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .update("alice", |p| update_topic_progress(p, 0, topic, true))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let loaded = store.load("alice").unwrap().unwrap();
        assert!(loaded.subjects[0].topics.iter().all(|t| t.completed));
        assert!(loaded.subjects[1].topics.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_failed_update_does_not_save() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());
        let plan = sample_plan();
        store.save("alice", &plan).unwrap();

        let result = store.update("alice", |plan| update_topic_progress(plan, 9, 0, true));

        assert!(matches!(result, Err(Error::IndexOutOfRange { .. })));
        assert_eq!(store.load("alice").unwrap().unwrap(), plan);
    }

    #[test]
    fn test_update_without_plan_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());

        let result = store.update("ghost", |_| Ok(()));
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[test]
    fn test_corrupted_plan_is_ignored() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());
        std::fs::create_dir_all(temp_dir.path().join("plans")).unwrap();
        std::fs::write(temp_dir.path().join("plans/alice.json"), "{ invalid json }").unwrap();

        assert!(store.load("alice").unwrap().is_none());
    }

    #[test]
    fn test_invalid_user_ids_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());

        for id in ["", "../etc", "a b", "x/y"] {
            assert!(matches!(store.load(id), Err(Error::Store(_))));
        }
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(temp_dir.path());
        store.save("alice", &sample_plan()).unwrap();
        store.save("alice", &sample_plan()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path().join("plans"))
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("alice.json")]);
    }
}
