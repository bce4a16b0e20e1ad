//! Query backend wire types
//!
//! The backend answers every query with HTTP 200 and a JSON object whose
//! optional fields say what happened. `QueryResponse` mirrors that body;
//! `QueryOutcome` is the parsed, tagged form the session works with.

use crate::chat::constants::SQL_ERROR_SENTINEL;
use crate::chat::table::ResultTable;
use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Quota the backend reports alongside a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingRequests {
    /// Requests left today for this client
    pub user_remaining: i64,
    /// Requests left today across all clients
    pub global_remaining: i64,
}

/// Raw response body of `POST /process_query/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated SQL, or an `ERROR: <message>` sentinel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    /// Result rows; all records share the same keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<Map<String, Value>>>,
    /// Human-readable failure classification, displayed verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Reported quota
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_requests: Option<RemainingRequests>,
}

/// Parsed outcome of a successful response
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The backend classified the query as unanswerable
    Failure {
        /// Backend-authored message
        message: String,
        /// Offending SQL, when the backend generated some
        sql_query: Option<String>,
    },
    /// The query ran and matched nothing
    NoRows {
        /// SQL that produced the empty result
        sql_query: Option<String>,
    },
    /// The query ran and returned rows
    Rows {
        /// Result rows
        table: ResultTable,
        /// SQL that produced the rows
        sql_query: Option<String>,
    },
}

impl QueryResponse {
    /// Classify the body into a `QueryOutcome`
    ///
    /// A non-empty `error` wins over everything else. Without one, `result`
    /// decides between `NoRows` and `Rows`.
    ///
    /// # Errors
    /// * Returns `TransportError::MalformedBody` if the body carries neither
    ///   `error` nor `result`.
    pub fn into_outcome(self) -> Result<QueryOutcome, TransportError> {
        let sql_query = self
            .sql_query
            .filter(|sql| !sql.trim().is_empty() && !sql.starts_with(SQL_ERROR_SENTINEL));

        if let Some(message) = self.error.filter(|e| !e.trim().is_empty()) {
            return Ok(QueryOutcome::Failure { message, sql_query });
        }

        match self.result {
            Some(rows) if rows.is_empty() => Ok(QueryOutcome::NoRows { sql_query }),
            Some(rows) => Ok(QueryOutcome::Rows {
                table: ResultTable::from_records(&rows),
                sql_query,
            }),
            None => Err(TransportError::MalformedBody(
                "response has neither `error` nor `result`".to_string(),
            )),
        }
    }
}
