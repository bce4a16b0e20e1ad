// Cricket Chat GUI - Main Entry Point
// Native Rust chat window for the IPL statistics assistant

mod state;
mod ui;

use cricket_chat_client::api::{HttpTransport, QueryResponse, QueryTransport};
use cricket_chat_client::chat::ChatController;
use cricket_chat_client::{Config, TransportError};
use eframe::egui;
use state::AppState;
use std::sync::Arc;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info};
use ui::render_app_layout;

type QueryResult = Result<QueryResponse, TransportError>;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);

    let transport: Arc<dyn QueryTransport> = Arc::new(HttpTransport::from_config(&config)?);
    let runtime = tokio::runtime::Runtime::new()?;
    let app = CricketChatApp::new(ChatController::new(transport, &config), runtime);

    // Configure window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Cricket Chat")
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([375.0, 500.0]),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Cricket Chat",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}

/// Main application struct
/// Owns the chat state and runs backend requests off the UI thread
struct CricketChatApp {
    /// Application state (session, input, UI preferences)
    state: AppState,
    /// Controller holding the transport
    controller: ChatController<dyn QueryTransport>,
    /// Runtime the network calls execute on
    runtime: tokio::runtime::Runtime,
    /// Result channel of the outstanding request, if any
    inflight: Option<oneshot::Receiver<QueryResult>>,
}

impl CricketChatApp {
    /// Create a new application instance
    fn new(controller: ChatController<dyn QueryTransport>, runtime: tokio::runtime::Runtime) -> Self {
        Self {
            state: AppState::with_preview_rows(controller.preview_rows()),
            controller,
            runtime,
            inflight: None,
        }
    }

    /// Send the query accepted by the session, if any, on the runtime
    /// The result comes back through `inflight` and wakes the UI
    fn dispatch_outgoing(&mut self, ctx: &egui::Context) {
        let Some(query) = self.state.take_outgoing() else {
            return;
        };

        let (tx, rx) = oneshot::channel();
        let controller = self.controller.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = controller.fetch(&query).await;
            if tx.send(result).is_err() {
                debug!("UI dropped the request before it settled; discarding result");
            }
            ctx.request_repaint();
        });
        self.inflight = Some(rx);
    }

    /// Apply the outstanding request's result once it has settled
    fn poll_inflight(&mut self) {
        let settled = self.inflight.as_mut().and_then(|rx| match rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(TransportError::Network(
                "request task ended without a result".to_string(),
            ))),
        });

        if let Some(result) = settled {
            self.inflight = None;
            self.state.session.complete(result);
        }
    }
}

impl eframe::App for CricketChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_inflight();

        // Render the main application layout
        render_app_layout(ctx, &mut self.state);

        self.dispatch_outgoing(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct ScriptedTransport {
        body: &'static str,
    }

    #[async_trait]
    impl QueryTransport for ScriptedTransport {
        async fn process_query(&self, _query: &str) -> QueryResult {
            serde_json::from_str(self.body).map_err(|e| TransportError::MalformedBody(e.to_string()))
        }
    }

    fn app(body: &'static str) -> CricketChatApp {
        let transport: Arc<dyn QueryTransport> = Arc::new(ScriptedTransport { body });
        let controller = ChatController::new(transport, &Config::default());
        CricketChatApp::new(controller, tokio::runtime::Runtime::new().unwrap())
    }

    fn wait_for_reply(app: &mut CricketChatApp) {
        for _ in 0..200 {
            app.poll_inflight();
            if app.inflight.is_none() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("request did not settle");
    }

    #[test]
    fn test_app_creation() {
        let app = app(r#"{"result": []}"#);
        assert!(app.state.session.transcript().is_empty());
        assert!(app.inflight.is_none());
    }

    #[test]
    fn test_submit_round_trip() {
        let mut app = app(r#"{"result": [{"player_name": "Virat Kohli", "total_runs": 825}]}"#);
        let ctx = egui::Context::default();

        app.state.input = "Who scored the most runs in IPL 2023?".to_string();
        assert!(app.state.submit_input());
        app.dispatch_outgoing(&ctx);
        assert!(app.inflight.is_some());
        assert!(!app.state.input_enabled());

        wait_for_reply(&mut app);

        let transcript = app.state.session.transcript();
        assert_eq!(transcript.len(), 2);
        let table = transcript[1].table().unwrap();
        assert_eq!(table.rows()[0], vec!["Virat Kohli", "825"]);
        assert!(app.state.input_enabled());
    }

    #[test]
    fn test_malformed_body_shows_generic_message() {
        let mut app = app("not json");
        let ctx = egui::Context::default();

        app.state.input = "List all IPL teams".to_string();
        app.state.submit_input();
        app.dispatch_outgoing(&ctx);
        wait_for_reply(&mut app);

        assert_eq!(
            app.state.session.transcript()[1].text(),
            Some("Something went wrong")
        );
    }

    #[test]
    fn test_abandoned_request_settles_as_failure() {
        let mut app = app(r#"{"result": []}"#);
        app.state.input = "Who won IPL 2016?".to_string();
        app.state.submit_input();

        let (tx, rx) = oneshot::channel::<QueryResult>();
        drop(tx);
        app.state.take_outgoing();
        app.inflight = Some(rx);
        app.poll_inflight();

        assert!(app.inflight.is_none());
        assert!(app.state.input_enabled());
        assert_eq!(
            app.state.session.transcript()[1].text(),
            Some("Something went wrong")
        );
    }

    #[test]
    fn test_nothing_dispatched_without_submission() {
        let mut app = app(r#"{"result": []}"#);
        app.dispatch_outgoing(&egui::Context::default());
        assert!(app.inflight.is_none());
    }
}
