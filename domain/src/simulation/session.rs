//! Session entity: one simulated doctor/patient consultation
//!
//! A session owns the two mirrored transcripts of a dialogue. The doctor
//! transcript sees the patient's words as user input and vice versa; every
//! half-turn appends the assistant-authored original to its own side and a
//! role-inverted copy to the counterpart side. The turn loop itself lives in
//! the application layer; this entity records turns, decides termination and
//! extracts the proposed diagnosis list.

use crate::dialogue::message::{Message, Role};
use crate::dialogue::transcript::Transcript;
use crate::prompt::roles::{DIAGNOSIS_SENTINEL, PromptTemplate};
use crate::vignette::Vignette;

/// Dialogue length cap: the patient transcript may not outgrow this.
pub const DEFAULT_MAX_LEN: usize = 24;

/// Synthetic participant id recorded on benchmark transcripts.
const BENCH_USER_ID: u64 = 5;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The doctor produced the diagnosis sentinel
    Diagnosis,
    /// The dialogue hit the length cap without a diagnosis
    MaxLen,
    /// A fault aborted the turn loop; partial transcripts were kept
    Error,
}

/// One simulated consultation (Entity)
///
/// Owned exclusively by the worker running it; nothing is shared across
/// concurrent sessions.
#[derive(Debug, Clone)]
pub struct Session {
    doctor: Transcript,
    patient: Transcript,
    max_len: usize,
    outcome: Option<SessionOutcome>,
}

impl Session {
    /// Seed a session for one vignette.
    ///
    /// The doctor transcript opens with its system prompt; the patient
    /// transcript opens with its system prompt plus the doctor's canned
    /// opening line as user input.
    pub fn new(vignette: &Vignette) -> Self {
        let mut doctor = Transcript::new(BENCH_USER_ID);
        doctor.push(Message::system(
            BENCH_USER_ID,
            PromptTemplate::doctor_system(vignette),
        ));

        let mut patient = Transcript::new(BENCH_USER_ID);
        patient.push(Message::system(
            BENCH_USER_ID,
            PromptTemplate::patient_system(vignette),
        ));
        patient.push(Message::user(
            BENCH_USER_ID,
            PromptTemplate::doctor_opening(),
        ));

        Self {
            doctor,
            patient,
            max_len: DEFAULT_MAX_LEN,
            outcome: None,
        }
    }

    /// Override the dialogue length cap.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn doctor(&self) -> &Transcript {
        &self.doctor
    }

    pub fn patient(&self) -> &Transcript {
        &self.patient
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Terminal state, once one was recorded.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn finish(&mut self, outcome: SessionOutcome) {
        self.outcome = Some(outcome);
    }

    /// Record a patient half-turn: the assistant-authored reply goes into
    /// the patient transcript; a user-role copy with identical body goes
    /// into the doctor transcript, derived from the doctor side's last
    /// message so it keeps that transcript's chat metadata.
    pub fn record_patient_reply(&mut self, reply: Message) {
        let template = self
            .doctor
            .last()
            .expect("doctor transcript is seeded with a system prompt");
        let inverted = Message::derived(template, Role::User, reply.body.clone());
        self.doctor.push(inverted);
        self.patient.push(reply);
    }

    /// Record a doctor half-turn, mirroring [`record_patient_reply`].
    ///
    /// [`record_patient_reply`]: Session::record_patient_reply
    pub fn record_doctor_reply(&mut self, reply: Message) {
        let template = self
            .patient
            .last()
            .expect("patient transcript is seeded with the doctor opening");
        let inverted = Message::derived(template, Role::User, reply.body.clone());
        self.doctor.push(reply);
        self.patient.push(inverted);
    }

    /// True when the dialogue is close enough to the cap that the doctor
    /// should be pushed to wrap up.
    pub fn needs_finish_hint(&self) -> bool {
        self.doctor.len() + 4 >= self.max_len
    }

    /// Append the forced-termination instruction to the doctor transcript.
    pub fn inject_finish_hint(&mut self) {
        let template = self
            .doctor
            .last()
            .expect("doctor transcript is seeded with a system prompt");
        let hint = Message::derived(template, Role::System, PromptTemplate::finish_instruction());
        self.doctor.push(hint);
    }

    /// Dedicated termination check, run after each completed turn pair.
    ///
    /// Returns `None` while the dialogue should continue. Faults are not
    /// decided here; the turn loop records [`SessionOutcome::Error`] itself.
    pub fn check_termination(&self) -> Option<SessionOutcome> {
        if diagnosis_finished(&self.doctor) {
            Some(SessionOutcome::Diagnosis)
        } else if self.patient.len() > self.max_len {
            Some(SessionOutcome::MaxLen)
        } else {
            None
        }
    }

    /// Extract the proposed diagnosis list from the doctor's final message.
    pub fn extract_diagnoses(&self) -> String {
        extract_diagnoses(&self.doctor)
    }

    /// Back-fill service-assigned chat ids across both transcripts.
    pub fn finalize_chat_ids(&mut self) {
        self.doctor.adopt_chat_id();
        self.patient.adopt_chat_id();
    }

    /// Tear the session apart into its transcripts for persistence.
    pub fn into_transcripts(self) -> (Transcript, Transcript) {
        (self.doctor, self.patient)
    }
}

/// True when a doctor transcript ends in a ready diagnosis.
///
/// The length guard skips the seed turn: a sentinel echoed straight out of
/// the system prompt must not terminate the dialogue.
pub fn diagnosis_finished(doctor: &Transcript) -> bool {
    doctor.len() > 3
        && doctor
            .last()
            .map(|m| m.body.contains(DIAGNOSIS_SENTINEL))
            .unwrap_or(false)
}

/// The bracketed diagnosis list following the sentinel, `[..]` inclusive.
///
/// Empty string when the transcript did not finish with a diagnosis or the
/// list is unclosed.
pub fn extract_diagnoses(doctor: &Transcript) -> String {
    if !diagnosis_finished(doctor) {
        return String::new();
    }
    let body = match doctor.last() {
        Some(message) => &message.body,
        None => return String::new(),
    };
    let Some((_, after)) = body.split_once(DIAGNOSIS_SENTINEL) else {
        return String::new();
    };
    let Some(end) = after.find(']') else {
        return String::new();
    };
    let start = after[..end].find('[').unwrap_or(0);
    after[start..=end].to_string()
}
