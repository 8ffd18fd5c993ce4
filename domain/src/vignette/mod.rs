//! Clinical vignette case records
//!
//! A vignette is an immutable case record: patient demographics, history,
//! complaints and the gold diagnosis. Vignette files come from different
//! benchmark suites with different key layouts; the source tag picks the
//! layout once at load time and the accessors hide it afterwards.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provenance of a vignette file, deciding its key layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VignetteSource {
    Avey,
    AgentClinic,
}

impl VignetteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VignetteSource::Avey => "avey",
            VignetteSource::AgentClinic => "agentclinic",
        }
    }
}

impl std::fmt::Display for VignetteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VignetteSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avey" => Ok(VignetteSource::Avey),
            "agentclinic" => Ok(VignetteSource::AgentClinic),
            other => Err(DomainError::UnknownVignetteSource(other.to_string())),
        }
    }
}

/// An immutable case record (Value Object)
///
/// Loaded once from a JSONL record and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vignette {
    source: VignetteSource,
    data: Map<String, Value>,
}

impl Vignette {
    /// Wrap a raw JSONL record, validating the fields every accessor
    /// dereferences unconditionally.
    pub fn new(source: VignetteSource, data: Map<String, Value>) -> Result<Self, DomainError> {
        let required: &[&str] = match source {
            VignetteSource::Avey => &[
                "correct_diagnosis",
                "demographics",
                "presentation",
                "chief_complaints",
            ],
            VignetteSource::AgentClinic => &["correct_diagnosis", "demographics"],
        };
        for key in required {
            if !data.get(*key).map(Value::is_string).unwrap_or(false) {
                return Err(DomainError::MissingVignetteField(key.to_string()));
            }
        }
        Ok(Self { source, data })
    }

    pub fn source(&self) -> VignetteSource {
        self.source
    }

    /// The gold diagnosis this case is scored against.
    pub fn correct_diagnosis(&self) -> &str {
        self.required_str("correct_diagnosis")
    }

    pub fn demographics(&self) -> &str {
        self.required_str("demographics")
    }

    /// Description or current history of the patient's affliction.
    pub fn history(&self) -> &str {
        match self.source {
            VignetteSource::Avey => self.required_str("presentation"),
            VignetteSource::AgentClinic => self.str_or("history", "No history"),
        }
    }

    /// Primary complaints that brought the patient to the doctor.
    pub fn primary_complaints(&self) -> &str {
        match self.source {
            VignetteSource::Avey => self.required_str("chief_complaints"),
            VignetteSource::AgentClinic => self.str_or("primary_symptom", "No primary symptoms"),
        }
    }

    /// Everything else the patient knows, rendered as a labelled block.
    pub fn additional_information(&self) -> String {
        match self.source {
            VignetteSource::Avey => format!(
                "ABSENT FINDINGS: {}\nPHYSICAL HISTORY: {}\nFAMILY HISTORY: {}\nSOCIAL HISTORY: {}",
                self.rendered("absent_findings"),
                self.rendered("physical_history"),
                self.rendered("family_history"),
                self.rendered("social_history"),
            ),
            VignetteSource::AgentClinic => format!(
                "SECONDARY SYMPTOMS: {}\nTEMPERATURE: {}\nPAST MEDICAL HISTORY: {}\nSOCIAL HISTORY: {}\nREVIEW OF SYSTEMS: {}",
                self.rendered("secondary_symptoms"),
                self.rendered("temperature"),
                self.rendered("past_medical_history"),
                self.rendered("social_history"),
                self.rendered("review_of_systems"),
            ),
        }
    }

    /// Field validated to exist as a string at construction.
    fn required_str(&self, key: &str) -> &str {
        self.data
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.data.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Render an optional field; non-string values keep their JSON form.
    fn rendered(&self, key: &str) -> String {
        match self.data.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}
