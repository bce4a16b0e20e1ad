//! Saved conversations
//!
//! Holds snapshots of past transcripts for the lifetime of the process.
//! Nothing here is persisted.

use crate::chat::constants::{DEFAULT_HISTORY_TITLE, HISTORY_TITLE_MAX_CHARS};
use crate::chat::models::{ChatMessage, ConversationId, Sender};
use crate::error::ChatError;
use chrono::{DateTime, Utc};

/// A saved snapshot of a conversation
///
/// Items are never mutated. A later reply in the same conversation replaces
/// the item with a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    /// Conversation this snapshot belongs to
    pub id: ConversationId,
    /// Title derived from the opening user message
    pub title: String,
    /// Messages at the time of the snapshot
    pub messages: Vec<ChatMessage>,
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,
}

impl HistoryItem {
    /// Snapshot a transcript
    pub fn snapshot(id: ConversationId, messages: &[ChatMessage]) -> Self {
        Self {
            id,
            title: derive_title(messages),
            messages: messages.to_vec(),
            saved_at: Utc::now(),
        }
    }
}

/// Title of a conversation: its first user message, cut to
/// `HISTORY_TITLE_MAX_CHARS` characters
pub fn derive_title(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .find(|m| m.sender == Sender::User)
        .and_then(|m| m.text())
        .filter(|text| !text.is_empty())
        .map(|text| text.chars().take(HISTORY_TITLE_MAX_CHARS).collect())
        .unwrap_or_else(|| DEFAULT_HISTORY_TITLE.to_string())
}

/// Ordered list of saved conversations, oldest first
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    items: Vec<HistoryItem>,
}

impl ChatHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a snapshot, replacing the existing item of the same conversation
    ///
    /// Returns the index of the saved item.
    pub fn upsert(&mut self, item: HistoryItem) -> usize {
        match self.items.iter().position(|existing| existing.id == item.id) {
            Some(index) => {
                self.items[index] = item;
                index
            }
            None => {
                self.items.push(item);
                self.items.len() - 1
            }
        }
    }

    /// Remove the item at `index`
    ///
    /// # Errors
    /// * Returns `ChatError::HistoryIndexOutOfRange` if `index` is not valid.
    pub fn remove(&mut self, index: usize) -> Result<HistoryItem, ChatError> {
        if index >= self.items.len() {
            return Err(ChatError::HistoryIndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Item at `index`, if any
    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.items.get(index)
    }

    /// All saved items
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Number of saved conversations
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been saved
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(question: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::user(question),
            ChatMessage::bot_text("Sorry, I Don't Know", None),
        ]
    }

    #[test]
    fn test_title_truncated_to_thirty_chars() {
        let messages = conversation("Which bowler took the most wickets in IPL 2021?");
        assert_eq!(derive_title(&messages), "Which bowler took the most wic");
        assert_eq!(derive_title(&messages).chars().count(), 30);
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        let messages = conversation("Qui a marqué le plus de points à l'IPL?");
        let title = derive_title(&messages);
        assert_eq!(title.chars().count(), 30);
        assert!(title.starts_with("Qui a marqué"));
    }

    #[test]
    fn test_title_without_user_message() {
        let messages = vec![ChatMessage::bot_text("hello", None)];
        assert_eq!(derive_title(&messages), "New Chat");
    }

    #[test]
    fn test_upsert_replaces_same_conversation() {
        let mut history = ChatHistory::new();
        let first = conversation("Who won IPL 2020?");
        assert_eq!(history.upsert(HistoryItem::snapshot("a".to_string(), &first)), 0);
        assert_eq!(
            history.upsert(HistoryItem::snapshot("b".to_string(), &conversation("Other"))),
            1
        );

        let mut longer = first.clone();
        longer.push(ChatMessage::user("And in 2021?"));
        longer.push(ChatMessage::bot_text("Chennai Super Kings", None));
        assert_eq!(history.upsert(HistoryItem::snapshot("a".to_string(), &longer)), 0);

        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).unwrap().messages.len(), 4);
        assert_eq!(history.get(0).unwrap().title, "Who won IPL 2020?");
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut history = ChatHistory::new();
        history.upsert(HistoryItem::snapshot("a".to_string(), &conversation("q")));

        assert_eq!(
            history.remove(3),
            Err(ChatError::HistoryIndexOutOfRange { index: 3, len: 1 })
        );
        assert!(history.remove(0).is_ok());
        assert!(history.is_empty());
    }
}
