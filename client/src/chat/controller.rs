//! Chat session controller
//!
//! Drives a `ChatSession` against a `QueryTransport`. The session is passed
//! in by the caller, so the same controller can serve any number of
//! sessions and tests can inspect state directly.

use crate::api::client::QueryTransport;
use crate::api::types::QueryResponse;
use crate::chat::constants::SUGGESTED_QUESTIONS;
use crate::chat::session::ChatSession;
use crate::config::Config;
use crate::error::TransportError;
use std::sync::Arc;
use std::time::Instant;

/// Result of a `submit` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// The query was sent and the transcript gained a user and a bot message
    Completed,
    /// The query was blank or a request was already outstanding
    Ignored,
}

/// Runs submissions for chat sessions
pub struct ChatController<T: QueryTransport + ?Sized> {
    transport: Arc<T>,
    preview_rows: usize,
}

impl<T: QueryTransport + ?Sized> Clone for ChatController<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            preview_rows: self.preview_rows,
        }
    }
}

impl<T: QueryTransport + ?Sized> ChatController<T> {
    /// Create a controller over a transport
    pub fn new(transport: Arc<T>, config: &Config) -> Self {
        Self {
            transport,
            preview_rows: config.display.preview_rows,
        }
    }


    /// Rows shown inline before a result table is truncated
    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    /// Submit a query and wait for it to settle
    ///
    /// Sends at most one request. Blank input, or input while the session
    /// already has a request outstanding, is ignored.
    pub async fn submit(&self, session: &mut ChatSession, query: &str) -> SubmitStatus {
        let Some(query) = session.begin_submit(query) else {
            return SubmitStatus::Ignored;
        };

        let result = self.fetch(&query).await;
        session.complete(result);
        SubmitStatus::Completed
    }

    /// Send an already accepted query and return the settled result
    ///
    /// This is the network half of `submit`, for front ends that call
    /// `ChatSession::begin_submit` and `ChatSession::complete` themselves.
    pub async fn fetch(&self, query: &str) -> Result<QueryResponse, TransportError> {
        let started = Instant::now();
        let result = self.transport.process_query(query).await;
        tracing::debug!(
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Query settled"
        );
        result
    }

    /// Submit one of the suggested questions by index
    pub async fn submit_suggestion(&self, session: &mut ChatSession, index: usize) -> SubmitStatus {
        match SUGGESTED_QUESTIONS.get(index) {
            Some(question) => self.submit(session, question).await,
            None => SubmitStatus::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QueryTransport for CountingTransport {
        async fn process_query(&self, _query: &str) -> Result<QueryResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(QueryResponse {
                result: Some(Vec::new()),
                ..Default::default()
            })
        }
    }

    fn controller() -> (ChatController<CountingTransport>, Arc<CountingTransport>) {
        let transport = Arc::new(CountingTransport {
            calls: AtomicUsize::new(0),
        });
        (
            ChatController::new(Arc::clone(&transport), &Config::default()),
            transport,
        )
    }

    #[tokio::test]
    async fn test_submit_sends_one_request() {
        let (controller, transport) = controller();
        let mut session = ChatSession::new();

        let status = controller.submit(&mut session, "Who won IPL 2018?").await;

        assert_eq!(status, SubmitStatus::Completed);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.transcript().len(), 2);
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_submit_blank_is_ignored() {
        let (controller, transport) = controller();
        let mut session = ChatSession::new();

        assert_eq!(controller.submit(&mut session, "   ").await, SubmitStatus::Ignored);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_submit_while_pending_is_ignored() {
        let (controller, transport) = controller();
        let mut session = ChatSession::new();
        session.begin_submit("outstanding").unwrap();

        assert_eq!(
            controller.submit(&mut session, "second").await,
            SubmitStatus::Ignored
        );
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_suggestion() {
        let (controller, _transport) = controller();
        let mut session = ChatSession::new();

        assert_eq!(
            controller.submit_suggestion(&mut session, 0).await,
            SubmitStatus::Completed
        );
        assert_eq!(session.transcript()[0].text(), Some(SUGGESTED_QUESTIONS[0]));
        assert_eq!(
            controller.submit_suggestion(&mut session, 99).await,
            SubmitStatus::Ignored
        );
    }

    #[tokio::test]
    async fn test_fetch_leaves_session_to_caller() {
        let (controller, transport) = controller();
        let mut session = ChatSession::new();
        let query = session.begin_submit("Who won IPL 2021?").unwrap();

        let result = controller.fetch(&query).await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(session.is_pending());

        session.complete(result);
        assert!(!session.is_pending());
        assert_eq!(session.transcript().len(), 2);
    }
}
