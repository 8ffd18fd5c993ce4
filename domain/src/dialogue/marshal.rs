//! Transcript marshalling for single-prompt local servers
//!
//! Local servers take one flat prompt instead of a structured history, so
//! the dialogue is rendered as a `PATIENT:`/`DOCTOR:` script.

use crate::dialogue::message::{Message, Role};

/// Render a message history as a flat dialogue script.
///
/// System messages are dropped. Assistant messages appearing before the
/// first user message are dropped too; the script always opens with the
/// patient side.
pub fn marshal_transcript(messages: &[Message]) -> String {
    let mut marshalled = String::new();
    for message in messages {
        match message.role {
            Role::User => {
                marshalled.push_str(&format!("PATIENT: {}\n\n", message.body));
            }
            Role::Assistant if !marshalled.is_empty() => {
                marshalled.push_str(&format!("DOCTOR: {}\n\n", message.body));
            }
            _ => {}
        }
    }
    marshalled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::message::Message;

    #[test]
    fn test_marshal_skips_system_and_leading_assistant() {
        let messages = vec![
            Message::system(1, "you are a patient"),
            Message::assistant(1, "stray"),
            Message::user(1, "My knee hurts."),
            Message::assistant(1, "How long has it hurt?"),
        ];

        let script = marshal_transcript(&messages);
        assert_eq!(
            script,
            "PATIENT: My knee hurts.\n\nDOCTOR: How long has it hurt?\n\n"
        );
    }

    #[test]
    fn test_marshal_empty_history() {
        assert_eq!(marshal_transcript(&[]), "");
    }
}
