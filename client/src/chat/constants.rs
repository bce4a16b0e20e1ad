//! Chat constants
//!
//! Fixed user-facing strings and display limits shared by the session and the
//! front ends.

/// Bot message shown when the backend could not be reached or answered unusably
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Something went wrong";

/// Bot message shown when a query succeeded but matched no rows
pub const EMPTY_RESULT_MESSAGE: &str = "I don't know the answer of this query";

/// Placeholder text of the query input
pub const INPUT_PLACEHOLDER: &str = "Ask Cricket...";

/// Label of the submit control
pub const SEND_LABEL: &str = "Send";

/// Text of the loading indicator shown while a request is pending
pub const LOADING_INDICATOR: &str = "AI is typing...";

/// Title used for a saved conversation with no user message
pub const DEFAULT_HISTORY_TITLE: &str = "New Chat";

/// Maximum number of characters of the opening question kept in a history title
pub const HISTORY_TITLE_MAX_CHARS: usize = 30;

/// Default number of rows shown inline before a table is truncated
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Prefix the backend puts on `sql_query` when no SQL was generated
pub const SQL_ERROR_SENTINEL: &str = "ERROR:";

/// Questions offered while the transcript is empty
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "Who scored the most runs in IPL 2023?",
    "Which team won the most matches in IPL 2022?",
    "Who has hit the most sixes in IPL history?",
    "Which bowler took the most wickets in IPL 2021?",
];
