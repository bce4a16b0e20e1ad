//! Chat module
//!
//! Conversation state, history and the controller that drives it against
//! the query backend.

pub mod constants;
pub mod controller;
pub mod history;
pub mod models;
pub mod session;
pub mod table;

pub use controller::{ChatController, SubmitStatus};
pub use history::{ChatHistory, HistoryItem};
pub use models::{ChatMessage, ConversationId, MessageBody, Sender};
pub use session::{ChatSession, RequestPhase};
pub use table::ResultTable;
