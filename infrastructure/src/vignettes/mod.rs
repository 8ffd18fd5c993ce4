//! Vignette file loading
//!
//! Vignettes live in line-delimited JSON files, one per source suite, named
//! `<source>_vignettes.jsonl`. Experiments run over a random subsample whose
//! sorted indices are recorded for reproducibility.

use clinicsim_domain::{DomainError, Vignette, VignetteSource};
use rand::seq::index::sample;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors loading vignette files
#[derive(Error, Debug)]
pub enum VignetteError {
    #[error("Could not read vignette file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed JSONL record on line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Record on line {line} is not a JSON object")]
    NotAnObject { line: usize },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Loader for `<source>_vignettes.jsonl` files in one directory
pub struct VignetteLoader {
    directory: PathBuf,
}

impl VignetteLoader {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Load every vignette of a source suite.
    pub fn load(&self, source: VignetteSource) -> Result<Vec<Vignette>, VignetteError> {
        let path = self
            .directory
            .join(format!("{}_vignettes.jsonl", source.as_str()));
        let raw = fs::read_to_string(&path).map_err(|e| VignetteError::Io {
            path: path.clone(),
            source: e,
        })?;

        let mut vignettes = Vec::new();
        for (index, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let value: serde_json::Value =
                serde_json::from_str(line).map_err(|e| VignetteError::Parse {
                    line: index + 1,
                    source: e,
                })?;
            let serde_json::Value::Object(data) = value else {
                return Err(VignetteError::NotAnObject { line: index + 1 });
            };
            vignettes.push(Vignette::new(source, data)?);
        }

        info!(
            "Loaded {} vignettes from {}",
            vignettes.len(),
            path.display()
        );
        Ok(vignettes)
    }

    /// Draw a sorted random subsample of `count` indices out of `total`.
    pub fn sample_indices(total: usize, count: usize) -> Vec<usize> {
        let count = count.min(total);
        let mut indices: Vec<usize> = sample(&mut rand::thread_rng(), total, count).into_vec();
        indices.sort_unstable();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_jsonl(dir: &Path, name: &str, lines: &[&str]) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
    }

    #[test]
    fn test_load_avey_suite() {
        let dir = tempfile::tempdir().unwrap();
        write_jsonl(
            dir.path(),
            "avey_vignettes.jsonl",
            &[
                r#"{"correct_diagnosis": "Gout", "demographics": "60M", "presentation": "Toe pain", "chief_complaints": "Painful toe"}"#,
                r#"{"correct_diagnosis": "Lupus", "demographics": "30F", "presentation": "Rash", "chief_complaints": "Facial rash"}"#,
            ],
        );

        let vignettes = VignetteLoader::new(dir.path())
            .load(VignetteSource::Avey)
            .unwrap();
        assert_eq!(vignettes.len(), 2);
        assert_eq!(vignettes[1].correct_diagnosis(), "Lupus");
    }

    #[test]
    fn test_malformed_line_is_reported_with_its_number() {
        let dir = tempfile::tempdir().unwrap();
        write_jsonl(
            dir.path(),
            "avey_vignettes.jsonl",
            &[
                r#"{"correct_diagnosis": "Gout", "demographics": "60M", "presentation": "Toe pain", "chief_complaints": "Painful toe"}"#,
                "{not json",
            ],
        );

        let error = VignetteLoader::new(dir.path())
            .load(VignetteSource::Avey)
            .unwrap_err();
        assert!(matches!(error, VignetteError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = VignetteLoader::new(dir.path())
            .load(VignetteSource::AgentClinic)
            .unwrap_err();
        assert!(matches!(error, VignetteError::Io { .. }));
    }

    #[test]
    fn test_sample_indices_sorted_and_capped() {
        let indices = VignetteLoader::sample_indices(10, 4);
        assert_eq!(indices.len(), 4);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        assert!(indices.iter().all(|&i| i < 10));

        // Requesting more than available returns everything.
        let all = VignetteLoader::sample_indices(3, 10);
        assert_eq!(all, vec![0, 1, 2]);
    }
}
