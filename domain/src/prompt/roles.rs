//! Prompt templates for the doctor, patient and judge roles

use crate::vignette::Vignette;

/// Literal marker the doctor emits to signal the diagnosis list is ready.
pub const DIAGNOSIS_SENTINEL: &str = "DIAGNOSIS READY";

/// Templates for the prompts driving a simulated consultation
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt conditioning a model to act as the patient of `vignette`.
    pub fn patient_system(vignette: &Vignette) -> String {
        format!(
            r#"You are a patient with the following background:
DEMOGRAPHICS: {}
HISTORY: {}
PRIMARY COMPLAINTS: {}
ADDITIONAL DETAILS: {}

You are visiting a doctor because of your PRIMARY COMPLAINTS.
A doctor will ask you questions to diagnose your condition. Provide concise
answers of 1-3 sentences, sharing only the relevant information based on your
disease and the above additional details. If the doctor asks about something
not mentioned above, say something in accordance with the other information
above."#,
            vignette.demographics(),
            vignette.history(),
            vignette.primary_complaints(),
            vignette.additional_information(),
        )
    }

    /// System prompt conditioning a model to act as the examining doctor.
    pub fn doctor_system(vignette: &Vignette) -> String {
        format!(
            r#"You are a doctor diagnosing through an online chat platform a patient
with the following characteristics
DEMOGRAPHICS: {}

You will ask the patient concise questions (1-3 sentences at a time) in order
to understand their disease. After gathering sufficient information, finish
the conversation by writing chosen diagnoses in this format:
{}: [diagnosis1, diagnosis2, diagnosis3]"#,
            vignette.demographics(),
            DIAGNOSIS_SENTINEL,
        )
    }

    /// The doctor's canned opening line, seeding the patient transcript.
    pub fn doctor_opening() -> &'static str {
        "Hello, I'm a doctor, here to diagnose your ailment. Please tell me what's troubling you."
    }

    /// Injected system instruction forcing the dialogue towards termination.
    pub fn finish_instruction() -> &'static str {
        "Immediately finish the conversation by listing the most likely diagnoses."
    }

    /// One-shot judge query comparing a diagnosis list to the gold label.
    pub fn judge_query(obtained_diagnoses: &str, correct_diagnosis: &str) -> String {
        format!(
            r#"Given a list of differential diagnoses and the correct diagnosis, determine if
any of the diagnoses in the list is very similar to the correct diagnosis. If it is,
specify its position, starting from 1, else write -1. Respond in the following format:
Correct diagnosis present: YES/NO
Position: [number]

OBTAINED DIAGNOSES: {obtained_diagnoses}
CORRECT DIAGNOSIS: {correct_diagnosis}"#,
        )
    }
}
