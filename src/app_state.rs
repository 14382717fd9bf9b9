//! Presentation state for one user: the current category, the generation
//! cycle's result and the chat transcript.
//!
//! Every transition borrows the current snapshot and returns a new one; the
//! web layer and the terminal chat both drive the same functions.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::features::AssistantType;
use crate::generator::Generator;
use crate::prompts::BRANDING_PREAMBLE;
use crate::request::{ChatMessage, GeneratorRequest, GeneratorResponse};
use crate::session::ChatSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    assistant_type: AssistantType,
    status: GenerationStatus,
    response: Option<GeneratorResponse>,
    error: Option<String>,
    session: Option<ChatSession>,
    transcript: Vec<ChatMessage>,
    chat_status: ChatStatus,
    // Bumped whenever the cycle is discarded, so late results can be recognized.
    cycle: u64,
}

/// A chat turn in flight: what to send and which session to send it on.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub cycle: u64,
    pub session: ChatSession,
    pub text: String,
}

/// Serializable snapshot handed to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    pub assistant_type: AssistantType,
    pub status: GenerationStatus,
    pub loading: bool,
    pub response: Option<GeneratorResponse>,
    pub error: Option<String>,
    pub transcript: Vec<ChatMessage>,
    pub chat_enabled: bool,
    pub chat_sending: bool,
}

impl AppState {
    pub fn new(assistant_type: AssistantType) -> Self {
        Self {
            assistant_type,
            ..Self::default()
        }
    }

    pub fn assistant_type(&self) -> AssistantType {
        self.assistant_type
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn response(&self) -> Option<&GeneratorResponse> {
        self.response.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn session(&self) -> Option<&ChatSession> {
        self.session.as_ref()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn chat_status(&self) -> ChatStatus {
        self.chat_status
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn is_loading(&self) -> bool {
        self.status == GenerationStatus::Loading
    }

    /// True while any remote call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.is_loading() || self.chat_status == ChatStatus::Sending
    }

    /// The chat panel exists only once a cycle produced both a result and a session.
    pub fn chat_enabled(&self) -> bool {
        self.session.is_some() && self.response.is_some()
    }

    pub fn view(&self) -> StateView {
        StateView {
            assistant_type: self.assistant_type,
            status: self.status,
            loading: self.is_loading(),
            response: self.response.clone(),
            error: self.error.clone(),
            transcript: self.transcript.clone(),
            chat_enabled: self.chat_enabled(),
            chat_sending: self.chat_status == ChatStatus::Sending,
        }
    }

    fn discarded(&self, assistant_type: AssistantType) -> AppState {
        AppState {
            assistant_type,
            cycle: self.cycle + 1,
            ..AppState::default()
        }
    }

    /// Switching category drops the result, the transcript and the session.
    pub fn on_switch_category(&self, assistant_type: AssistantType) -> AppState {
        debug!(?assistant_type, "Switching assistant category");
        self.discarded(assistant_type)
    }

    /// Starts a new cycle. `None` while another call is outstanding.
    pub fn begin_generate(&self) -> Option<AppState> {
        if self.is_busy() {
            return None;
        }
        Some(AppState {
            status: GenerationStatus::Loading,
            ..self.discarded(self.assistant_type)
        })
    }

    /// Settles the cycle started by [`begin_generate`](Self::begin_generate).
    /// Outcomes for any other cycle are ignored.
    pub fn finish_generate(
        &self,
        cycle: u64,
        outcome: Result<(GeneratorResponse, ChatSession), AppError>,
    ) -> AppState {
        if cycle != self.cycle || !self.is_loading() {
            warn!(cycle, current = self.cycle, "Dropping stale generation result");
            return self.clone();
        }
        match outcome {
            Ok((response, session)) => AppState {
                status: GenerationStatus::Success,
                transcript: vec![ChatMessage::from_response(&response)],
                response: Some(response),
                session: Some(session),
                ..self.clone()
            },
            Err(err) => AppState {
                status: GenerationStatus::Error,
                error: Some(err.to_string()),
                ..self.clone()
            },
        }
    }

    /// Appends the user's message optimistically. `None` if there is no
    /// session, a call is already outstanding, or `text` is blank.
    pub fn begin_send(&self, text: &str) -> Option<(AppState, PendingSend)> {
        if text.trim().is_empty() || self.is_busy() || !self.chat_enabled() {
            return None;
        }
        let session = self.session.clone()?;
        let mut transcript = self.transcript.clone();
        transcript.push(ChatMessage::user(text));
        let next = AppState {
            transcript,
            chat_status: ChatStatus::Sending,
            ..self.clone()
        };
        let pending = PendingSend {
            cycle: self.cycle,
            session,
            text: text.to_string(),
        };
        Some((next, pending))
    }

    /// Appends the model reply, or an error line, for the turn started by
    /// [`begin_send`](Self::begin_send).
    pub fn finish_send(
        &self,
        cycle: u64,
        outcome: Result<(String, ChatSession), AppError>,
    ) -> AppState {
        if cycle != self.cycle || self.chat_status != ChatStatus::Sending {
            warn!(cycle, current = self.cycle, "Dropping stale chat reply");
            return self.clone();
        }
        let mut transcript = self.transcript.clone();
        let session = match outcome {
            Ok((reply, session)) => {
                transcript.push(ChatMessage::model(format!("{BRANDING_PREAMBLE}{reply}")));
                Some(session)
            }
            Err(err) => {
                transcript.push(ChatMessage::model(format!("Lỗi: {err}")));
                self.session.clone()
            }
        };
        AppState {
            transcript,
            session,
            chat_status: ChatStatus::Idle,
            ..self.clone()
        }
    }
}

/// Runs one whole generation cycle. A validation failure leaves `state`
/// untouched and is returned as `Err`; every other outcome is folded into
/// the returned snapshot.
pub async fn on_generate(
    state: &AppState,
    generator: &Generator,
    request: &GeneratorRequest,
) -> Result<AppState, AppError> {
    request.validate()?;
    let Some(loading) = state.begin_generate() else {
        return Ok(state.clone());
    };
    let outcome = run_generation(generator, request).await;
    Ok(loading.finish_generate(loading.cycle(), outcome))
}

/// Generation followed by opening the follow-up session.
pub async fn run_generation(
    generator: &Generator,
    request: &GeneratorRequest,
) -> Result<(GeneratorResponse, ChatSession), AppError> {
    let response = generator.generate(request).await?;
    let session = generator.open_session(request.feature());
    Ok((response, session))
}

/// Runs one chat turn against the current session.
pub async fn on_send_message(state: &AppState, generator: &Generator, text: &str) -> AppState {
    let Some((sending, pending)) = state.begin_send(text) else {
        return state.clone();
    };
    let outcome = run_send(generator, pending.session, &pending.text).await;
    sending.finish_send(pending.cycle, outcome)
}

/// Sends on an owned session and hands it back once it has recorded the turn.
pub async fn run_send(
    generator: &Generator,
    mut session: ChatSession,
    text: &str,
) -> Result<(String, ChatSession), AppError> {
    let reply = generator.send(&mut session, text).await?;
    Ok((reply, session))
}
