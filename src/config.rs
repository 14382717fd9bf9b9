use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::constants::{DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL};
use crate::error::AppError;
use crate::gemini::GeminiClient;
use crate::generator::Generator;

/// Process configuration resolved at startup.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Config {
    /// Fails with [`AppError::Configuration`] when the key is absent or blank.
    pub fn new(
        api_key: Option<String>,
        model: Option<String>,
        api_base: Option<String>,
    ) -> Result<Self, AppError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(AppError::missing_api_key)?;
        Ok(Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            api_base: api_base.unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
        })
    }

    pub fn generator(&self) -> Result<Generator> {
        let client = GeminiClient::new(
            self.api_key.clone(),
            self.model.clone(),
            self.api_base.clone(),
        )?;
        info!(model = %client.model(), api_base = %self.api_base, "Gemini client ready");
        Ok(Generator::new(client))
    }
}

/// Loads `path` if given, otherwise a `.env` in the working directory if one exists.
pub fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
            debug!(path = %path.display(), "Loaded env file");
        }
        None => {
            if let Ok(path) = dotenvy::dotenv() {
                debug!(path = %path.display(), "Loaded .env");
            }
        }
    }
    Ok(())
}
