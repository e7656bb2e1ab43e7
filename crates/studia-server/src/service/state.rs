//! Application state and dependency injection.

use std::sync::Arc;

use studia_opendal::FileStore;
use studia_postgres::PgClient;
use studia_rig::{StudyAgent, TutorAgent};
use studia_vision::VisionClient;
use studia_youtube::YoutubeClient;

use crate::extract::AuthKeys;
use crate::handler::Result;
use crate::service::{AuthHasher, ExportService, ServiceConfig};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection). Every
/// collaborator handle is constructed once at process start and shared by
/// reference; request handlers never build clients of their own.
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    file_store: FileStore,
    vision_client: VisionClient,
    youtube_client: YoutubeClient,
    study_agent: Arc<StudyAgent>,
    tutor_agent: Arc<TutorAgent>,
    export_service: ExportService,

    auth_hasher: AuthHasher,
    auth_keys: AuthKeys,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to all external services and loads required resources.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let file_store = config.open_file_store()?;
        let provider = config.create_completion_provider()?;

        let service_state = Self {
            pg_client: config.connect_postgres()?,
            vision_client: config.create_vision_client()?,
            youtube_client: config.create_youtube_client()?,
            study_agent: Arc::new(StudyAgent::new(&provider)),
            tutor_agent: Arc::new(TutorAgent::new(&provider)),
            export_service: ExportService::new(file_store.clone()),
            file_store,

            auth_hasher: AuthHasher::new(),
            auth_keys: config.create_auth_keys(),
        };

        Ok(service_state)
    }

    /// Returns the database client.
    pub fn pg_client(&self) -> &PgClient {
        &self.pg_client
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(file_store: FileStore);
impl_di!(vision_client: VisionClient);
impl_di!(youtube_client: YoutubeClient);
impl_di!(study_agent: Arc<StudyAgent>);
impl_di!(tutor_agent: Arc<TutorAgent>);
impl_di!(export_service: ExportService);

impl_di!(auth_hasher: AuthHasher);
impl_di!(auth_keys: AuthKeys);
