//! Domain layer for clinicsim
//!
//! Core entities and business logic for simulated diagnostic dialogues:
//! messages and transcripts, vignettes, the session state machine, model
//! identities and diagnosis scoring. This crate has no I/O; the network and
//! filesystem live behind ports in the application layer.

pub mod core;
pub mod dialogue;
pub mod prompt;
pub mod score;
pub mod simulation;
pub mod vignette;

// Re-export commonly used types at the crate root
pub use crate::core::error::DomainError;
pub use crate::core::model::{Model, Provider};
pub use dialogue::marshal::marshal_transcript;
pub use dialogue::message::{Lang, Message, Role};
pub use dialogue::transcript::Transcript;
pub use prompt::roles::{DIAGNOSIS_SENTINEL, PromptTemplate};
pub use score::{JudgeVerdict, SCORE_UNFINISHED, aggregate_verdicts, parse_verdict};
pub use simulation::session::{Session, SessionOutcome};
pub use vignette::{Vignette, VignetteSource};
