//! Service configuration and collaborator construction.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use studia_opendal::{FileStore, StorageConfig};
use studia_postgres::{PgClient, PgConfig};
use studia_rig::{CompletionProvider, GeminiModel};
use studia_vision::{VisionClient, VisionConfig};
use studia_youtube::{YoutubeClient, YoutubeConfig};

use crate::extract::AuthKeys;
use crate::handler::{ErrorKind, Result};
use crate::middleware::CorsConfig;

/// Complete service configuration.
///
/// Collaborator clients are constructed from this once at process start and
/// injected into request handlers through the service state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Database configuration.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(flatten)]
    pub postgres: PgConfig,

    /// Storage configuration.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(flatten)]
    pub storage: StorageConfig,

    /// Secret used to sign authentication tokens.
    #[cfg_attr(feature = "config", arg(long, env = "AUTH_SECRET"))]
    pub auth_secret: String,

    /// Gemini API key for the generation collaborator.
    #[cfg_attr(feature = "config", arg(long, env = "GEMINI_API_KEY"))]
    pub gemini_api_key: String,

    /// Gemini model identifier.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "GEMINI_MODEL", default_value = "gemini-2.0-flash")
    )]
    pub gemini_model: String,

    /// Google Cloud Vision API key for the extraction collaborator.
    #[cfg_attr(feature = "config", arg(long, env = "VISION_API_KEY"))]
    pub vision_api_key: String,

    /// YouTube Data API key for the video-suggestion collaborator.
    #[cfg_attr(feature = "config", arg(long, env = "YOUTUBE_API_KEY"))]
    pub youtube_api_key: String,
}

impl ServiceConfig {
    /// Connects to Postgres.
    pub fn connect_postgres(&self) -> Result<PgClient> {
        PgClient::new(self.postgres.clone()).map_err(|e| {
            ErrorKind::InternalServerError
                .with_message("Failed to connect to database")
                .with_context(e.to_string())
        })
    }

    /// Opens the file store.
    pub fn open_file_store(&self) -> Result<FileStore> {
        FileStore::new(self.storage.clone()).map_err(|e| {
            ErrorKind::InternalServerError
                .with_message("Failed to open file store")
                .with_context(e.to_string())
        })
    }

    /// Creates the generation completion provider.
    pub fn create_completion_provider(&self) -> Result<CompletionProvider> {
        let model: GeminiModel = self.gemini_model.parse().map_err(|_| {
            ErrorKind::InternalServerError
                .with_message("Invalid Gemini model identifier")
                .with_context(self.gemini_model.clone())
        })?;

        CompletionProvider::gemini(&self.gemini_api_key, model).map_err(|e| {
            ErrorKind::InternalServerError
                .with_message("Failed to create generation provider")
                .with_context(e.to_string())
        })
    }

    /// Creates the vision client.
    pub fn create_vision_client(&self) -> Result<VisionClient> {
        VisionClient::new(VisionConfig::new(&self.vision_api_key)).map_err(|e| {
            ErrorKind::InternalServerError
                .with_message("Failed to create vision client")
                .with_context(e.to_string())
        })
    }

    /// Creates the YouTube client.
    pub fn create_youtube_client(&self) -> Result<YoutubeClient> {
        YoutubeClient::new(YoutubeConfig::new(&self.youtube_api_key)).map_err(|e| {
            ErrorKind::InternalServerError
                .with_message("Failed to create youtube client")
                .with_context(e.to_string())
        })
    }

    /// Creates the token signing keys.
    pub fn create_auth_keys(&self) -> AuthKeys {
        AuthKeys::from_secret(self.auth_secret.as_bytes())
    }
}

/// Middleware configuration grouped for the binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct MiddlewareConfig {
    /// CORS configuration.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(flatten)]
    pub cors: CorsConfig,
}
