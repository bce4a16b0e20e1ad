// Application state management
// Contains the chat session, the input buffer, and UI state

use cricket_chat_client::chat::constants::{DEFAULT_PREVIEW_ROWS, SUGGESTED_QUESTIONS};
use cricket_chat_client::chat::{ChatSession, ResultTable};

/// Overlay currently shown on top of the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Generated SQL of an answer
    Sql(String),
    /// Untruncated result table of an answer
    FullTable(ResultTable),
}

/// UI-specific state
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether the history sidebar is expanded
    pub sidebar_visible: bool,
    /// Open overlay, if any
    pub modal: Option<Modal>,
    /// Rows shown inline before a result table is truncated
    pub preview_rows: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_visible: false,
            modal: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Main application state
/// Owns the conversation and everything the chat window shows
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Transcript, history and request phase
    pub session: ChatSession,
    /// Text currently typed in the query input
    pub input: String,
    /// UI state preferences
    pub ui_state: UiState,
    /// Query accepted by the session and waiting to be sent
    outgoing: Option<String>,
}

impl AppState {
    /// Create a new application state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state with a custom table preview size
    pub fn with_preview_rows(preview_rows: usize) -> Self {
        let mut state = Self::default();
        state.ui_state.preview_rows = preview_rows;
        state
    }

    /// Submit the input buffer
    /// Clears the input when the session accepts it
    /// Returns true if a query is now waiting to be sent
    pub fn submit_input(&mut self) -> bool {
        match self.session.begin_submit(&self.input) {
            Some(query) => {
                self.input.clear();
                self.outgoing = Some(query);
                true
            }
            None => false,
        }
    }

    /// Submit a suggested question by index
    /// Leaves the input buffer untouched
    pub fn submit_suggestion(&mut self, index: usize) -> bool {
        let Some(question) = SUGGESTED_QUESTIONS.get(index) else {
            return false;
        };
        match self.session.begin_submit(question) {
            Some(query) => {
                self.outgoing = Some(query);
                true
            }
            None => false,
        }
    }

    /// Take the query waiting to be sent, if any
    pub fn take_outgoing(&mut self) -> Option<String> {
        self.outgoing.take()
    }

    /// Whether the input controls accept new queries
    pub fn input_enabled(&self) -> bool {
        !self.session.is_pending()
    }

    /// Start a new chat and close any overlay
    /// Returns false while a request is outstanding
    pub fn new_chat(&mut self) -> bool {
        if !self.session.new_chat() {
            return false;
        }
        self.ui_state.modal = None;
        true
    }

    /// Open saved chat `index`
    /// Returns true if the transcript was replaced
    pub fn load_history(&mut self, index: usize) -> bool {
        match self.session.load_history_index(index) {
            Ok(loaded) => {
                if loaded {
                    self.ui_state.modal = None;
                }
                loaded
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load chat from history");
                false
            }
        }
    }

    /// Delete saved chat `index`
    /// Returns true if an item was removed
    pub fn delete_history(&mut self, index: usize) -> bool {
        match self.session.delete_chat(index) {
            Ok(item) => {
                tracing::debug!(title = %item.title, "Deleted chat from history");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to delete chat from history");
                false
            }
        }
    }

    /// Toggle the history sidebar
    pub fn toggle_sidebar(&mut self) {
        self.ui_state.sidebar_visible = !self.ui_state.sidebar_visible;
    }

    /// Show the generated SQL overlay
    pub fn open_sql(&mut self, sql: String) {
        self.ui_state.modal = Some(Modal::Sql(sql));
    }

    /// Show the full table overlay
    pub fn open_full_table(&mut self, table: ResultTable) {
        self.ui_state.modal = Some(Modal::FullTable(table));
    }

    /// Close the open overlay
    pub fn close_modal(&mut self) {
        self.ui_state.modal = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_chat_client::api::QueryResponse;
    use cricket_chat_client::TransportError;

    fn answer(state: &mut AppState, body: &str) {
        let response: QueryResponse = serde_json::from_str(body).unwrap();
        state.session.complete(Ok(response));
    }

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.session.transcript().is_empty());
        assert!(state.input_enabled());
        assert!(!state.ui_state.sidebar_visible);
        assert!(state.ui_state.modal.is_none());
    }

    #[test]
    fn test_submit_input_clears_buffer() {
        let mut state = AppState::new();
        state.input = "  Who has hit the most sixes in IPL?  ".to_string();

        assert!(state.submit_input());
        assert!(state.input.is_empty());
        assert!(!state.input_enabled());
        assert_eq!(
            state.take_outgoing().as_deref(),
            Some("Who has hit the most sixes in IPL?")
        );
        assert!(state.take_outgoing().is_none());
    }

    #[test]
    fn test_submit_input_blank_or_pending() {
        let mut state = AppState::new();
        state.input = "   ".to_string();
        assert!(!state.submit_input());
        assert_eq!(state.input, "   ");

        state.input = "first".to_string();
        assert!(state.submit_input());
        state.input = "second".to_string();
        assert!(!state.submit_input());
        assert_eq!(state.input, "second");
        assert_eq!(state.session.transcript().len(), 1);
    }

    #[test]
    fn test_submit_suggestion() {
        let mut state = AppState::new();
        assert!(state.submit_suggestion(1));
        assert_eq!(state.take_outgoing().as_deref(), Some(SUGGESTED_QUESTIONS[1]));
        assert!(!state.submit_suggestion(0));

        let mut state = AppState::new();
        assert!(!state.submit_suggestion(42));
    }

    #[test]
    fn test_input_reenabled_after_failure() {
        let mut state = AppState::new();
        state.input = "Show me top IPL batsmen".to_string();
        state.submit_input();
        state
            .session
            .complete(Err(TransportError::Network("refused".to_string())));

        assert!(state.input_enabled());
        assert_eq!(
            state.session.transcript()[1].text(),
            Some("Something went wrong")
        );
    }

    #[test]
    fn test_history_actions() {
        let mut state = AppState::new();
        state.input = "Who won IPL 2020?".to_string();
        state.submit_input();
        answer(&mut state, r#"{"result": [{"winner": "Mumbai Indians"}]}"#);

        state.open_sql("SELECT 1".to_string());
        assert!(state.new_chat());
        assert!(state.ui_state.modal.is_none());
        assert!(state.session.transcript().is_empty());

        assert!(state.load_history(0));
        assert_eq!(state.session.transcript().len(), 2);
        assert!(!state.load_history(3));

        assert!(state.delete_history(0));
        assert!(!state.delete_history(0));
    }

    #[test]
    fn test_new_chat_blocked_while_pending() {
        let mut state = AppState::new();
        state.input = "Who won IPL 2020?".to_string();
        state.submit_input();
        state.open_sql("SELECT 1".to_string());

        assert!(!state.new_chat());
        assert!(state.ui_state.modal.is_some());
        assert_eq!(state.session.transcript().len(), 1);

        answer(&mut state, r#"{"result": [{"winner": "Mumbai Indians"}]}"#);
        assert_eq!(state.session.transcript().len(), 2);
        assert!(state.new_chat());
    }

    #[test]
    fn test_modals_and_sidebar() {
        let mut state = AppState::with_preview_rows(3);
        assert_eq!(state.ui_state.preview_rows, 3);

        state.toggle_sidebar();
        assert!(state.ui_state.sidebar_visible);

        state.open_full_table(ResultTable::default());
        assert_eq!(
            state.ui_state.modal,
            Some(Modal::FullTable(ResultTable::default()))
        );
        state.close_modal();
        assert!(state.ui_state.modal.is_none());
    }
}
