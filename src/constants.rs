// Defaults, some of which may be overridden from the environment (or a .env file).

use std::env;

lazy_static::lazy_static! {
    pub static ref TEMPLATES_DIR: String = env::var("LOINHO_TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string());
    pub static ref STATIC_DIR: String = env::var("LOINHO_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
}

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Port used by `loinho serve` when neither `--port` nor `LOINHO_PORT` is set.
pub const DEFAULT_PORT: u16 = 9900;

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "API_KEY";
