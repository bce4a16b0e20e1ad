//! Chat session state
//!
//! `ChatSession` is the whole client-side conversation state: the active
//! transcript, the saved history, the last reported quota and the request
//! phase that enforces a single outstanding query.
//!
//! Submitting is split in two halves so the network call can run elsewhere:
//! `begin_submit` checks and sets the phase on the caller's thread, and
//! `complete` applies whatever the request settled with.

use crate::api::types::{QueryOutcome, QueryResponse, RemainingRequests};
use crate::chat::constants::{EMPTY_RESULT_MESSAGE, TRANSPORT_FAILURE_MESSAGE};
use crate::chat::history::{ChatHistory, HistoryItem};
use crate::chat::models::{ChatMessage, ConversationId};
use crate::error::{ChatError, TransportError};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle of the (single) backend request of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    /// No request outstanding; input accepted
    #[default]
    Idle,
    /// A query was sent and has not settled yet
    AwaitingResponse,
}

/// Conversation state of one chat window
#[derive(Debug, Clone)]
pub struct ChatSession {
    conversation_id: ConversationId,
    transcript: Vec<ChatMessage>,
    history: ChatHistory,
    phase: RequestPhase,
    remaining_requests: Option<RemainingRequests>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            conversation_id: new_conversation_id(),
            transcript: Vec::new(),
            history: ChatHistory::new(),
            phase: RequestPhase::Idle,
            remaining_requests: None,
        }
    }
}

fn new_conversation_id() -> ConversationId {
    Uuid::new_v4().to_string()
}

impl ChatSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of the active conversation, oldest first
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Saved conversations
    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Current request phase
    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    /// Whether a request is outstanding
    pub fn is_pending(&self) -> bool {
        self.phase == RequestPhase::AwaitingResponse
    }

    /// Identifier of the active conversation
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Quota from the most recent response that reported one
    pub fn remaining_requests(&self) -> Option<RemainingRequests> {
        self.remaining_requests
    }

    /// Start a submission
    ///
    /// Trims `query` and, if it is non-empty and no request is outstanding,
    /// appends the user message and moves to `AwaitingResponse`. Returns the
    /// trimmed query the caller must send, or `None` when the submission was
    /// ignored.
    pub fn begin_submit(&mut self, query: &str) -> Option<String> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            debug!("Ignoring empty query");
            return None;
        }
        if self.is_pending() {
            debug!("Ignoring query while a request is outstanding");
            return None;
        }

        self.transcript.push(ChatMessage::user(trimmed));
        self.phase = RequestPhase::AwaitingResponse;

        info!(
            conversation_id = %self.conversation_id,
            query_len = trimmed.len(),
            "Query submitted"
        );
        Some(trimmed.to_string())
    }

    /// Finish the outstanding submission with the settled request result
    ///
    /// Appends exactly one bot message and returns to `Idle`. A usable
    /// response also records the quota and saves the conversation to
    /// history. Calling this with no request outstanding does nothing.
    pub fn complete(&mut self, result: Result<QueryResponse, TransportError>) {
        if !self.is_pending() {
            warn!("Received a response with no request outstanding; dropping it");
            return;
        }
        self.phase = RequestPhase::Idle;

        let outcome = result.and_then(|response| {
            if let Some(remaining) = response.remaining_requests {
                self.remaining_requests = Some(remaining);
            }
            response.into_outcome()
        });

        match outcome {
            Ok(outcome) => {
                self.transcript.push(bot_message(outcome));
                let item = HistoryItem::snapshot(self.conversation_id.clone(), &self.transcript);
                let index = self.history.upsert(item);
                debug!(
                    conversation_id = %self.conversation_id,
                    history_index = index,
                    "Conversation saved to history"
                );
            }
            Err(e) => {
                warn!(
                    conversation_id = %self.conversation_id,
                    error = %e,
                    "Query failed at transport level"
                );
                self.transcript
                    .push(ChatMessage::bot_text(TRANSPORT_FAILURE_MESSAGE, None));
            }
        }
    }

    /// Start a new, empty conversation; history is kept
    ///
    /// Ignored while a request is outstanding, since its reply belongs to
    /// the current transcript. Returns whether a new conversation started.
    pub fn new_chat(&mut self) -> bool {
        if self.is_pending() {
            debug!("Ignoring new chat while a request is outstanding");
            return false;
        }
        self.transcript.clear();
        self.conversation_id = new_conversation_id();
        true
    }

    /// Replace the transcript with the messages of a saved conversation
    ///
    /// Further replies update that saved conversation. Ignored while a
    /// request is outstanding. Returns whether the item was loaded.
    pub fn load_from_history(&mut self, item: &HistoryItem) -> bool {
        if self.is_pending() {
            debug!("Ignoring history load while a request is outstanding");
            return false;
        }
        self.transcript = item.messages.clone();
        self.conversation_id = item.id.clone();
        true
    }

    /// Load the saved conversation at `index`
    ///
    /// # Errors
    /// * Returns `ChatError::HistoryIndexOutOfRange` if `index` is not valid.
    pub fn load_history_index(&mut self, index: usize) -> Result<bool, ChatError> {
        let item = self
            .history
            .get(index)
            .cloned()
            .ok_or(ChatError::HistoryIndexOutOfRange {
                index,
                len: self.history.len(),
            })?;
        Ok(self.load_from_history(&item))
    }

    /// Delete the saved conversation at `index`
    ///
    /// The active transcript is not affected, even if it was loaded from the
    /// deleted item.
    ///
    /// # Errors
    /// * Returns `ChatError::HistoryIndexOutOfRange` if `index` is not valid.
    pub fn delete_chat(&mut self, index: usize) -> Result<HistoryItem, ChatError> {
        self.history.remove(index)
    }
}

/// Bot message for a classified response
fn bot_message(outcome: QueryOutcome) -> ChatMessage {
    match outcome {
        QueryOutcome::Failure { message, sql_query } => ChatMessage::bot_text(message, sql_query),
        QueryOutcome::NoRows { sql_query } => {
            ChatMessage::bot_text(EMPTY_RESULT_MESSAGE, sql_query)
        }
        QueryOutcome::Rows { table, sql_query } => ChatMessage::bot_table(table, sql_query),
    }
}
