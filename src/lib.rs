//! Romantic message, poem and mini-game generator with practical advice
//! topics, backed by Gemini, plus a follow-up chat on the same persona.

pub mod app_state;
pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod features;
pub mod gemini;
pub mod generator;
pub mod prompts;
pub mod request;
pub mod session;
pub mod web_server;

pub use app_state::{on_generate, on_send_message, AppState, GenerationStatus};
pub use config::Config;
pub use error::AppError;
pub use features::{AssistantType, FeatureKind, MessageType};
pub use gemini::GeminiClient;
pub use generator::Generator;
pub use request::{ChatMessage, GeneratorRequest, GeneratorResponse, Role, Source};
pub use session::ChatSession;
