// Terminal front end: prints a generation result and runs the follow-up chat
// over stdin/stdout using the same state transitions as the web UI.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use crate::app_state::{on_send_message, AppState};
use crate::generator::Generator;
use crate::request::{ChatMessage, GeneratorResponse, Role};

/// Typed on its own line to leave the chat.
pub const EXIT_COMMAND: &str = "/exit";

pub fn render_response(response: &GeneratorResponse) -> String {
    let mut out = format!("== {} ==\n{}\n", response.title, response.content);
    if let Some(disclaimer) = &response.disclaimer {
        out.push_str(&format!("\n{disclaimer}\n"));
    }
    if let Some(sources) = response.sources.as_ref().filter(|s| !s.is_empty()) {
        out.push_str("\nNguồn tham khảo từ Web:\n");
        for source in sources {
            out.push_str(&format!("  - {} <{}>\n", source.title, source.uri));
        }
    }
    if let Some(starters) = response.starters.as_ref().filter(|s| !s.is_empty()) {
        out.push_str("\nGợi ý trò chuyện:\n");
        for (i, starter) in starters.iter().enumerate() {
            out.push_str(&format!("  {}. {starter}\n", i + 1));
        }
    }
    out
}

pub fn render_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "Bạn",
        Role::Model => "AI",
    };
    let mut out = format!("{speaker}: {}\n", message.content);
    if let Some(sources) = message.sources.as_ref().filter(|s| !s.is_empty()) {
        for source in sources {
            out.push_str(&format!("    [{}] {}\n", source.title, source.uri));
        }
    }
    out
}

/// Reads one message per line from `input` until EOF or [`EXIT_COMMAND`],
/// printing each new transcript entry to `out`. Returns the final state.
pub async fn run_chat_loop<R, W>(
    mut state: AppState,
    generator: &Generator,
    input: R,
    out: &mut W,
) -> Result<AppState>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if !state.chat_enabled() {
        return Ok(state);
    }
    info!("Starting terminal chat...");
    writeln!(out, "(Nhập tin nhắn, {EXIT_COMMAND} để thoát)")?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read chat input")? {
        // Trimmed only to recognize commands and blank lines; the message goes out as typed.
        let command = line.trim();
        if command == EXIT_COMMAND {
            break;
        }
        if command.is_empty() {
            continue;
        }
        let seen = state.transcript().len();
        state = on_send_message(&state, generator, &line).await;
        // The user's own line is already on screen; print only what came back.
        for message in state.transcript().iter().skip(seen) {
            if message.role == Role::Model {
                write!(out, "{}", render_message(message))?;
            }
        }
        out.flush()?;
    }
    info!("Chat session finished.");
    Ok(state)
}

/// [`run_chat_loop`] wired to the process's stdin and stdout.
pub async fn run_terminal_chat(state: AppState, generator: &Generator) -> Result<AppState> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_chat_loop(state, generator, stdin, &mut stdout).await
}
