//! Message entity exchanged with generation services

use serde::{Deserialize, Serialize};

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
}

impl Role {
    /// Lowercase role name as expected by the chat-completion wire formats.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Function => "function",
        }
    }
}

/// Language of a message body
///
/// `Unknown` doubles as "untagged"; replies inherit the tag of the message
/// they answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lang {
    #[default]
    Unknown,
    English,
    Slovene,
    French,
    Dutch,
    Italian,
    Spanish,
    German,
}

/// A single message in a dialogue (Entity)
///
/// `id` and `chat_id` are unset until the backing service resolves them from
/// its first response; the session back-fills `chat_id` across the whole
/// transcript afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub user_id: u64,
    pub role: Role,
    pub body: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub chat_id: Option<i64>,
    #[serde(default)]
    pub lang: Lang,
    /// Reasoning the model attached to a question, when the service reports it
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Message {
    pub fn new(user_id: u64, role: Role, body: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            body: body.into(),
            id: None,
            chat_id: None,
            lang: Lang::default(),
            explanation: None,
        }
    }

    pub fn system(user_id: u64, body: impl Into<String>) -> Self {
        Self::new(user_id, Role::System, body)
    }

    pub fn user(user_id: u64, body: impl Into<String>) -> Self {
        Self::new(user_id, Role::User, body)
    }

    pub fn assistant(user_id: u64, body: impl Into<String>) -> Self {
        Self::new(user_id, Role::Assistant, body)
    }

    /// Copy of `template` with `id` cleared and role/body replaced.
    ///
    /// Used for role inversion: an assistant-authored reply from one side is
    /// re-emitted into the counterpart transcript as user input, keeping the
    /// counterpart's `user_id`, `chat_id` and language tag.
    pub fn derived(template: &Message, role: Role, body: impl Into<String>) -> Self {
        Self {
            user_id: template.user_id,
            role,
            body: body.into(),
            id: None,
            chat_id: template.chat_id,
            lang: template.lang,
            explanation: template.explanation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_clears_id_and_keeps_chat_metadata() {
        let mut template = Message::assistant(5, "I have a headache.");
        template.id = Some(41);
        template.chat_id = Some(7);

        let inverted = Message::derived(&template, Role::User, "I have a headache.");
        assert_eq!(inverted.role, Role::User);
        assert_eq!(inverted.body, "I have a headache.");
        assert_eq!(inverted.id, None);
        assert_eq!(inverted.chat_id, Some(7));
        assert_eq!(inverted.user_id, 5);
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(Role::System.as_wire_str(), "system");
        assert_eq!(Role::Assistant.as_wire_str(), "assistant");
    }

    #[test]
    fn test_role_serializes_uppercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"ASSISTANT\"");
    }
}
