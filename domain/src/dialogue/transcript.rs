//! Transcript entity: the ordered message history of one participant

use crate::dialogue::message::Message;
use serde::{Deserialize, Serialize};

/// Ordered sequence of messages for one conversational participant (Entity)
///
/// Invariant: once a chat id is assigned, every message carries that id and
/// it becomes the transcript's own `id`. All messages share the transcript's
/// `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub user_id: u64,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Transcript {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            id: None,
            messages: Vec::new(),
        }
    }

    /// Append a message. The message must belong to this participant.
    pub fn push(&mut self, message: Message) {
        debug_assert_eq!(
            message.user_id, self.user_id,
            "message user_id must match transcript"
        );
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Back-fill the chat id assigned by the backing service.
    ///
    /// If the final message carries a resolved `chat_id`, record it as the
    /// transcript's id and propagate it onto every message. No-op while the
    /// id is still unresolved.
    pub fn adopt_chat_id(&mut self) {
        let Some(chat_id) = self.messages.last().and_then(|m| m.chat_id) else {
            return;
        };
        self.id = Some(chat_id);
        for message in &mut self.messages {
            message.chat_id = Some(chat_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::message::{Message, Role};

    #[test]
    fn test_adopt_chat_id_backfills_every_message() {
        let mut transcript = Transcript::new(5);
        transcript.push(Message::system(5, "sys"));
        transcript.push(Message::user(5, "hello"));
        let mut reply = Message::assistant(5, "hi");
        reply.chat_id = Some(99);
        transcript.push(reply);

        transcript.adopt_chat_id();

        assert_eq!(transcript.id, Some(99));
        assert!(transcript.messages.iter().all(|m| m.chat_id == Some(99)));
    }

    #[test]
    fn test_adopt_chat_id_noop_without_resolved_id() {
        let mut transcript = Transcript::new(5);
        transcript.push(Message::new(5, Role::System, "sys"));

        transcript.adopt_chat_id();

        assert_eq!(transcript.id, None);
        assert_eq!(transcript.messages[0].chat_id, None);
    }
}
