//! One-shot generation and the chat relay that follows it.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::error::AppError;
use crate::features::FeatureKind;
use crate::gemini::{Content, GeminiClient, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Tool};
use crate::prompts::{self, FeatureProfile, BRANDING_PREAMBLE};
use crate::request::{GeneratorRequest, GeneratorResponse};
use crate::session::ChatSession;

#[derive(Deserialize)]
struct MessageReply {
    message: String,
    #[serde(default)]
    starters: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct PoemReply {
    title: String,
    poem: String,
    #[serde(default)]
    starters: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameReply {
    title: String,
    instructions: String,
    opening_line: String,
    #[serde(default)]
    starters: Option<Vec<String>>,
}

/// Builds the single `generateContent` call for a prompt and feature profile.
pub fn generation_request(prompt: String, profile: &FeatureProfile) -> GenerateContentRequest {
    let response_mime_type = profile
        .response_schema
        .as_ref()
        .map(|_| "application/json".to_string());
    GenerateContentRequest {
        contents: vec![Content::user_text(prompt)],
        system_instruction: Some(Content::instruction(profile.system_instruction.clone())),
        tools: profile.use_search.then(|| vec![Tool::google_search()]),
        generation_config: Some(GenerationConfig {
            temperature: Some(profile.temperature),
            response_mime_type,
            response_schema: profile.response_schema.clone(),
        }),
    }
}

/// Maps a raw reply into the normalized response for `request`.
pub fn interpret_reply(
    request: &GeneratorRequest,
    reply: &GenerateContentResponse,
) -> Result<GeneratorResponse> {
    let text = reply
        .text()
        .ok_or_else(|| anyhow!("Gemini reply carried no text"))?;

    let response = match request {
        GeneratorRequest::Message { name, .. } => {
            let parsed: MessageReply =
                serde_json::from_str(text.trim()).context("Malformed message reply")?;
            GeneratorResponse {
                title: format!("Tin nhắn cho {name}"),
                content: format!("{BRANDING_PREAMBLE}{}", parsed.message),
                starters: parsed.starters,
                disclaimer: None,
                sources: None,
            }
        }
        GeneratorRequest::Poem { .. } => {
            let parsed: PoemReply =
                serde_json::from_str(text.trim()).context("Malformed poem reply")?;
            GeneratorResponse {
                title: parsed.title,
                content: format!("{BRANDING_PREAMBLE}{}", parsed.poem),
                starters: parsed.starters,
                disclaimer: None,
                sources: None,
            }
        }
        GeneratorRequest::Game { .. } => {
            let parsed: GameReply =
                serde_json::from_str(text.trim()).context("Malformed game reply")?;
            GeneratorResponse {
                title: parsed.title,
                content: format!(
                    "{BRANDING_PREAMBLE}{}\n\n{}",
                    parsed.instructions, parsed.opening_line
                ),
                starters: parsed.starters,
                disclaimer: None,
                sources: None,
            }
        }
        _ => GeneratorResponse {
            title: request.feature().default_title().to_string(),
            content: format!("{BRANDING_PREAMBLE}{text}"),
            starters: None,
            disclaimer: None,
            sources: Some(reply.sources()),
        },
    };
    Ok(response)
}

/// Entry point for generation and follow-up chat. Cheap to clone.
#[derive(Clone)]
pub struct Generator {
    client: GeminiClient,
}

impl Generator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Validates `request`, calls the model once and normalizes the reply.
    /// Never retries; any remote or parsing failure becomes [`AppError::Generation`].
    #[instrument(skip(self, request), fields(feature = request.feature().slug()))]
    pub async fn generate(&self, request: &GeneratorRequest) -> Result<GeneratorResponse, AppError> {
        request.validate()?;

        let profile = prompts::select(request.feature());
        let prompt = prompts::build_prompt(request);
        debug!(%prompt, use_search = profile.use_search, temperature = profile.temperature, "Built generation prompt");

        let call = generation_request(prompt, &profile);
        let reply = self.client.generate_content(&call).await.map_err(|e| {
            error!(error = ?e, "Generation call failed");
            AppError::generation()
        })?;

        let response = interpret_reply(request, &reply).map_err(|e| {
            error!(error = ?e, "Could not process generation reply");
            AppError::generation()
        })?;

        info!(title = %response.title, "Generated content");
        Ok(response)
    }

    /// Opens a fresh conversation seeded with the feature's system instruction.
    pub fn open_session(&self, feature: FeatureKind) -> ChatSession {
        info!(feature = feature.slug(), "Opening chat session");
        ChatSession::new(feature)
    }

    /// Relays one user message and returns the raw model reply (no preamble).
    #[instrument(skip(self, session, text), fields(feature = session.feature().slug(), exchanges = session.exchanges()))]
    pub async fn send(&self, session: &mut ChatSession, text: &str) -> Result<String, AppError> {
        let request = GenerateContentRequest {
            contents: session.contents_with(text),
            system_instruction: Some(Content::instruction(session.system_instruction())),
            tools: None,
            generation_config: None,
        };

        let reply = self.client.generate_content(&request).await.map_err(|e| {
            error!(error = ?e, "Chat call failed");
            AppError::send()
        })?;

        let reply_text = reply.text().ok_or_else(|| {
            error!("Chat reply carried no text");
            AppError::send()
        })?;

        session.record_exchange(text, &reply_text);
        Ok(reply_text)
    }
}
