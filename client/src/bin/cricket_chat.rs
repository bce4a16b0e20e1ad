//! Cricket Chat terminal client
//!
//! A line-oriented front end for the chat session controller. Plain lines
//! are sent as queries; lines starting with `/` are commands.

use cricket_chat_client::api::HttpTransport;
use cricket_chat_client::chat::constants::{LOADING_INDICATOR, SUGGESTED_QUESTIONS};
use cricket_chat_client::chat::{ChatController, ChatMessage, ChatSession, MessageBody};
use cricket_chat_client::Config;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

const HELP: &str = "\
Commands:
  /new            start a new chat
  /history        list saved chats
  /load <n>       open saved chat n
  /delete <n>     delete saved chat n
  /sql            show the SQL behind the last answer
  /table          show the full table of the last answer
  /suggest        list suggested questions
  /ask <n>        send suggested question n
  /quota          show remaining requests
  /help           show this help
  /quit           exit
Anything else is sent as a question.";

/// A parsed input line
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Query(String),
    NewChat,
    History,
    Load(usize),
    Delete(usize),
    ShowSql,
    ShowTable,
    Suggest,
    Ask(usize),
    Quota,
    Help,
    Quit,
    Invalid(String),
}

/// Parse one input line; list positions are 1-based on screen and 0-based here
fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Query(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let index = parts
        .next()
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1));

    match (name, index) {
        ("new", _) => Command::NewChat,
        ("history", _) => Command::History,
        ("load", Some(i)) => Command::Load(i),
        ("delete", Some(i)) => Command::Delete(i),
        ("sql", _) => Command::ShowSql,
        ("table", _) => Command::ShowTable,
        ("suggest", _) => Command::Suggest,
        ("ask", Some(i)) => Command::Ask(i),
        ("quota", _) => Command::Quota,
        ("help", _) => Command::Help,
        ("quit", _) | ("exit", _) => Command::Quit,
        ("load", None) | ("delete", None) | ("ask", None) => {
            Command::Invalid(format!("/{} needs a number, e.g. /{} 1", name, name))
        }
        _ => Command::Invalid(format!("Unknown command /{}; try /help", name)),
    }
}

/// Render a message for the terminal
fn render_message(message: &ChatMessage, preview_rows: usize) -> String {
    let body = match &message.body {
        MessageBody::Text { text } => text.clone(),
        MessageBody::Table { table } => {
            let mut text = table.render_text(preview_rows);
            if table.is_truncated(preview_rows) {
                text.push_str("\n(use /table to view the full table)");
            }
            text
        }
    };
    let mut out = format!(
        "[{}] {}:\n{}",
        message.display_time(),
        message.sender.display_name(),
        body
    );
    if message.sql_query.is_some() {
        out.push_str("\n(use /sql to view the generated SQL)");
    }
    out
}

fn last_bot_message(session: &ChatSession) -> Option<&ChatMessage> {
    session
        .transcript()
        .iter()
        .rev()
        .find(|m| m.sender == cricket_chat_client::chat::Sender::Bot)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);

    let transport = Arc::new(HttpTransport::from_config(&config)?);
    let controller = ChatController::new(transport, &config);
    let mut session = ChatSession::new();
    let preview_rows = controller.preview_rows();

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("Cricket Chat ({})\n{}\n\n", config.endpoint_url(), HELP).as_bytes())
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match parse_command(&line) {
            Command::Query(query) => {
                if query.is_empty() {
                    continue;
                }
                stdout
                    .write_all(format!("{}\n", LOADING_INDICATOR).as_bytes())
                    .await?;
                controller.submit(&mut session, &query).await;
                last_bot_message(&session)
                    .map(|m| render_message(m, preview_rows))
                    .unwrap_or_default()
            }
            Command::Ask(index) => match SUGGESTED_QUESTIONS.get(index) {
                Some(question) => {
                    stdout
                        .write_all(format!("You: {}\n{}\n", question, LOADING_INDICATOR).as_bytes())
                        .await?;
                    controller.submit_suggestion(&mut session, index).await;
                    last_bot_message(&session)
                        .map(|m| render_message(m, preview_rows))
                        .unwrap_or_default()
                }
                None => format!("There are {} suggestions", SUGGESTED_QUESTIONS.len()),
            },
            Command::NewChat => {
                if session.new_chat() {
                    "Started a new chat".to_string()
                } else {
                    "Wait for the current answer first".to_string()
                }
            }
            Command::History => {
                if session.history().is_empty() {
                    "No saved chats".to_string()
                } else {
                    session
                        .history()
                        .items()
                        .iter()
                        .enumerate()
                        .map(|(i, item)| format!("{:>3}. {}", i + 1, item.title))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::Load(index) => match session.load_history_index(index) {
                Ok(_) => session
                    .transcript()
                    .iter()
                    .map(|m| render_message(m, preview_rows))
                    .collect::<Vec<_>>()
                    .join("\n\n"),
                Err(e) => e.to_string(),
            },
            Command::Delete(index) => match session.delete_chat(index) {
                Ok(item) => format!("Deleted \"{}\"", item.title),
                Err(e) => e.to_string(),
            },
            Command::ShowSql => last_bot_message(&session)
                .and_then(|m| m.sql_query.clone())
                .map(|sql| format!("Generated SQL:\n{}", sql))
                .unwrap_or_else(|| "No SQL for the last answer".to_string()),
            Command::ShowTable => last_bot_message(&session)
                .and_then(|m| m.table())
                .map(|table| format!("Full Table:\n{}", table.render_text(table.row_count())))
                .unwrap_or_else(|| "The last answer has no table".to_string()),
            Command::Suggest => SUGGESTED_QUESTIONS
                .iter()
                .enumerate()
                .map(|(i, q)| format!("{:>3}. {}", i + 1, q))
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Quota => match session.remaining_requests() {
                Some(r) => format!(
                    "Remaining requests: {} for you, {} overall",
                    r.user_remaining, r.global_remaining
                ),
                None => "No quota reported yet".to_string(),
            },
            Command::Help => HELP.to_string(),
            Command::Quit => break,
            Command::Invalid(message) => message,
        };

        stdout.write_all(format!("{}\n\n", output).as_bytes()).await?;
    }

    info!("Session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_chat_client::chat::ResultTable;

    #[test]
    fn test_parse_query() {
        assert_eq!(
            parse_command("  Who won IPL 2016? "),
            Command::Query("Who won IPL 2016?".to_string())
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("/new"), Command::NewChat);
        assert_eq!(parse_command("/load 2"), Command::Load(1));
        assert_eq!(parse_command("/delete 1"), Command::Delete(0));
        assert_eq!(parse_command("/ask 3"), Command::Ask(2));
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert!(matches!(parse_command("/load"), Command::Invalid(_)));
        assert!(matches!(parse_command("/load 0"), Command::Invalid(_)));
        assert!(matches!(parse_command("/frobnicate"), Command::Invalid(_)));
    }

    #[test]
    fn test_render_truncated_table() {
        let records: Vec<serde_json::Map<String, serde_json::Value>> = (0..8)
            .map(|i| {
                let mut row = serde_json::Map::new();
                row.insert("player_id".to_string(), i.into());
                row
            })
            .collect();
        let message = ChatMessage::bot_table(
            ResultTable::from_records(&records),
            Some("SELECT player_id FROM players".to_string()),
        );

        let text = render_message(&message, 5);
        assert!(text.contains("AI:"));
        assert!(text.contains("(5 of 8 rows shown)"));
        assert!(text.contains("/table"));
        assert!(text.contains("/sql"));
    }
}
