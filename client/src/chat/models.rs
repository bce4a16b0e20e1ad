//! Chat data models
//!
//! Defines structures for messages and the bodies they carry.

use crate::chat::table::ResultTable;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a conversation, shared by its transcript and history entry
pub type ConversationId = String;

/// Sender of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user
    User,
    /// Message produced from a backend response (or its absence)
    Bot,
}

impl Sender {
    /// Convert the sender to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    /// Label shown on a message bubble
    pub fn display_name(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "AI",
        }
    }
}

/// What a message shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageBody {
    /// Plain text
    Text {
        /// Message text
        text: String,
    },
    /// Tabular query results
    Table {
        /// Result rows
        table: ResultTable,
    },
}

/// A single turn in the conversation
///
/// Messages are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent the message
    pub sender: Sender,
    /// Message content
    pub body: MessageBody,
    /// Generated SQL behind this answer, if the backend reported any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            body: MessageBody::Text { text: text.into() },
            sql_query: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a plain-text bot message
    pub fn bot_text(text: impl Into<String>, sql_query: Option<String>) -> Self {
        Self {
            sender: Sender::Bot,
            body: MessageBody::Text { text: text.into() },
            sql_query,
            timestamp: Utc::now(),
        }
    }

    /// Create a bot message carrying result rows
    pub fn bot_table(table: ResultTable, sql_query: Option<String>) -> Self {
        Self {
            sender: Sender::Bot,
            body: MessageBody::Table { table },
            sql_query,
            timestamp: Utc::now(),
        }
    }

    /// Text of a plain-text message
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text { text } => Some(text),
            MessageBody::Table { .. } => None,
        }
    }

    /// Table of a result message
    pub fn table(&self) -> Option<&ResultTable> {
        match &self.body {
            MessageBody::Table { table } => Some(table),
            MessageBody::Text { .. } => None,
        }
    }

    /// Local wall-clock time of the message, as `HH:MM:SS`
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}
