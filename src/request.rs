//! Request, response and transcript types shared by the generator, the
//! state machine and the presentation layers.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::features::{FeatureKind, MessageType};

/// Placeholder title for citations the remote side did not name.
pub const UNKNOWN_SOURCE_TITLE: &str = "Nguồn không xác định";

/// One generation request, tagged by the feature it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "feature", rename_all = "kebab-case")]
pub enum GeneratorRequest {
    Message {
        name: String,
        #[serde(default)]
        characteristics: String,
        #[serde(default)]
        message_type: MessageType,
    },
    Poem {
        name: String,
        #[serde(default)]
        characteristics: String,
        poem_topic: String,
    },
    Game {
        name: String,
        #[serde(default)]
        characteristics: String,
        game_idea: String,
    },
    Health { query: String },
    Finance { query: String },
    Life { query: String },
    Study { query: String },
    FengShui { query: String },
    Spirituality { query: String },
}

impl GeneratorRequest {
    /// Builds a practical request. Returns `None` for creative kinds.
    pub fn advice(feature: FeatureKind, query: impl Into<String>) -> Option<Self> {
        let query = query.into();
        let request = match feature {
            FeatureKind::Health => GeneratorRequest::Health { query },
            FeatureKind::Finance => GeneratorRequest::Finance { query },
            FeatureKind::Life => GeneratorRequest::Life { query },
            FeatureKind::Study => GeneratorRequest::Study { query },
            FeatureKind::FengShui => GeneratorRequest::FengShui { query },
            FeatureKind::Spirituality => GeneratorRequest::Spirituality { query },
            FeatureKind::Message | FeatureKind::Poem | FeatureKind::Game => return None,
        };
        Some(request)
    }

    pub fn feature(&self) -> FeatureKind {
        match self {
            GeneratorRequest::Message { .. } => FeatureKind::Message,
            GeneratorRequest::Poem { .. } => FeatureKind::Poem,
            GeneratorRequest::Game { .. } => FeatureKind::Game,
            GeneratorRequest::Health { .. } => FeatureKind::Health,
            GeneratorRequest::Finance { .. } => FeatureKind::Finance,
            GeneratorRequest::Life { .. } => FeatureKind::Life,
            GeneratorRequest::Study { .. } => FeatureKind::Study,
            GeneratorRequest::FengShui { .. } => FeatureKind::FengShui,
            GeneratorRequest::Spirituality { .. } => FeatureKind::Spirituality,
        }
    }

    /// The recipient's name for creative requests.
    pub fn name(&self) -> Option<&str> {
        match self {
            GeneratorRequest::Message { name, .. }
            | GeneratorRequest::Poem { name, .. }
            | GeneratorRequest::Game { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The free-form question for practical requests.
    pub fn query(&self) -> Option<&str> {
        match self {
            GeneratorRequest::Health { query }
            | GeneratorRequest::Finance { query }
            | GeneratorRequest::Life { query }
            | GeneratorRequest::Study { query }
            | GeneratorRequest::FengShui { query }
            | GeneratorRequest::Spirituality { query } => Some(query),
            _ => None,
        }
    }

    /// Checks required fields. Must pass before any remote call is made.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = self.name() {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Vui lòng nhập tên của nàng.".into()));
            }
        }
        match self {
            GeneratorRequest::Poem { poem_topic, .. } if poem_topic.trim().is_empty() => Err(
                AppError::Validation("Vui lòng nhập chủ đề cho bài thơ.".into()),
            ),
            GeneratorRequest::Game { game_idea, .. } if game_idea.trim().is_empty() => Err(
                AppError::Validation("Vui lòng nhập ý tưởng cho trò chơi.".into()),
            ),
            _ => match self.query() {
                Some(query) if query.trim().is_empty() => Err(AppError::Validation(
                    "Vui lòng nhập câu hỏi hoặc yêu cầu của bạn.".into(),
                )),
                _ => Ok(()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

impl Source {
    /// Applies the citation rules: no uri means no source, no title means the placeholder.
    pub fn from_parts(uri: Option<&str>, title: Option<&str>) -> Option<Self> {
        let uri = uri.filter(|u| !u.is_empty())?;
        let title = title
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN_SOURCE_TITLE);
        Some(Source {
            uri: uri.to_string(),
            title: title.to_string(),
        })
    }
}

/// Normalized result of one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorResponse {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
            disclaimer: None,
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
            sources: None,
            disclaimer: None,
        }
    }

    /// First transcript entry of a cycle: the generated content, citations included.
    pub fn from_response(response: &GeneratorResponse) -> Self {
        Self {
            role: Role::Model,
            content: response.content.clone(),
            sources: response.sources.clone(),
            disclaimer: response.disclaimer.clone(),
        }
    }
}
