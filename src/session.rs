use crate::features::FeatureKind;
use crate::gemini::Content;
use crate::prompts;

/// Handle to one follow-up conversation.
///
/// Created once per generation cycle with the same system instruction that was
/// used for the one-shot generation, so the chat keeps the persona. The
/// `generateContent` endpoint is stateless, so the handle carries the turns
/// the remote side needs; callers only ever see it through [`crate::Generator::send`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    feature: FeatureKind,
    system_instruction: String,
    history: Vec<Content>,
}

impl ChatSession {
    pub fn new(feature: FeatureKind) -> Self {
        Self {
            feature,
            system_instruction: prompts::system_instruction(feature),
            history: Vec::new(),
        }
    }

    pub fn feature(&self) -> FeatureKind {
        self.feature
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Number of completed exchanges (user turn + model reply).
    pub fn exchanges(&self) -> usize {
        self.history.len() / 2
    }

    /// Contents for the next call: prior turns followed by `text`.
    pub(crate) fn contents_with(&self, text: &str) -> Vec<Content> {
        let mut contents = self.history.clone();
        contents.push(Content::user_text(text));
        contents
    }

    /// Only called after the remote side answered; failed turns leave no trace.
    pub(crate) fn record_exchange(&mut self, user_text: &str, model_text: &str) {
        self.history.push(Content::user_text(user_text));
        self.history.push(Content::model_text(model_text));
    }
}
