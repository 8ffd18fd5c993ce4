//! JSON experiment-result store
//!
//! One document per experiment, overwritten in full at every checkpoint so
//! a mid-run failure loses at most the current iteration.

use clinicsim_application::{ExperimentResult, ResultStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};

/// Result store writing one JSON document per experiment
pub struct JsonResultStore {
    directory: PathBuf,
}

impl JsonResultStore {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Load a previously stored result document.
    pub fn load(path: impl AsRef<Path>) -> Result<ExperimentResult, StoreError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl ResultStore for JsonResultStore {
    fn checkpoint(&self, result: &ExperimentResult) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(result.file_name());
        fs::write(&path, serde_json::to_string(result)?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use clinicsim_domain::{Message, Transcript, VignetteSource};
    use std::collections::BTreeMap;

    fn result() -> ExperimentResult {
        let mut doctor = Transcript::new(5);
        doctor.push(Message::system(5, "doctor prompt"));
        doctor.push(Message::assistant(5, "DIAGNOSIS READY: [Gout]"));

        ExperimentResult {
            vignette_file: VignetteSource::Avey,
            vignettes: vec![],
            vignette_indices: vec![3, 7],
            num_experiments: 1,
            doctor_llm: "gpt-4o-mini".to_string(),
            patient_llm: "gpt-4o-mini".to_string(),
            chats: vec![vec![doctor]],
            started_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            comment: Some("smoke".to_string()),
            result_name_suffix: String::new(),
            evaluation: BTreeMap::new(),
        }
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonResultStore::new(dir.path());

        let path = store.checkpoint(&result()).unwrap();
        assert!(path.exists());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "2025-03-14T09:26:53Z_gpt-4o-mini_1.json"
        );

        let loaded = JsonResultStore::load(&path).unwrap();
        assert_eq!(loaded.vignette_indices, vec![3, 7]);
        assert_eq!(loaded.chats[0][0].messages.len(), 2);
        assert_eq!(loaded.comment.as_deref(), Some("smoke"));
    }

    #[test]
    fn test_checkpoint_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonResultStore::new(dir.path());

        let mut result = result();
        store.checkpoint(&result).unwrap();
        result.comment = Some("updated".to_string());
        let path = store.checkpoint(&result).unwrap();

        let loaded = JsonResultStore::load(&path).unwrap();
        assert_eq!(loaded.comment.as_deref(), Some("updated"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
