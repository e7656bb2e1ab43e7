//! Completion provider abstraction.

use rig::agent::AgentBuilder;
use rig::prelude::CompletionClient;
use rig::providers::gemini;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{Error, Result};

/// Google Gemini completion models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GeminiModel {
    /// Gemini 2.0 Flash (fast, multimodal)
    #[strum(serialize = "gemini-2.0-flash")]
    Gemini20Flash,
    /// Gemini 1.5 Pro (long context)
    #[strum(serialize = "gemini-1.5-pro")]
    Gemini15Pro,
    /// Gemini 1.5 Flash (fast)
    #[strum(serialize = "gemini-1.5-flash")]
    Gemini15Flash,
}

impl Default for GeminiModel {
    fn default() -> Self {
        Self::Gemini20Flash
    }
}

/// Completion provider wrapping a Gemini completion model.
///
/// Cheap to clone; agents are built from a fresh handle per agent.
#[derive(Clone)]
pub struct CompletionProvider {
    model: gemini::completion::CompletionModel,
    model_name: String,
}

impl CompletionProvider {
    /// Creates a Gemini completion provider with a specific model.
    pub fn gemini(api_key: &str, model: GeminiModel) -> Result<Self> {
        let client = gemini::Client::new(api_key)
            .map_err(|e| Error::provider("gemini", e.to_string()))?;

        Ok(Self {
            model: client.completion_model(model.as_ref()),
            model_name: model.as_ref().to_string(),
        })
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns an agent builder over this provider's model.
    pub(crate) fn agent(&self) -> AgentBuilder<gemini::completion::CompletionModel> {
        AgentBuilder::new(self.model.clone())
    }
}

impl std::fmt::Debug for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionProvider")
            .field("provider", &"gemini")
            .field("model", &self.model_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_names_are_wire_identifiers() {
        assert_eq!(GeminiModel::Gemini20Flash.as_ref(), "gemini-2.0-flash");
        assert_eq!(GeminiModel::Gemini15Pro.as_ref(), "gemini-1.5-pro");
    }

    #[test]
    fn model_parses_from_identifier() {
        let model: GeminiModel = "gemini-1.5-flash".parse().expect("parse");
        assert_eq!(model, GeminiModel::Gemini15Flash);
    }
}
