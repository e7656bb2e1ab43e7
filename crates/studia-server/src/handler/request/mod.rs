//! Request body, query, and path parameter types for all handlers.

mod account;
mod analysis;
mod authentication;
mod chat;
mod export;
mod paths;
mod upload;

pub use account::UpdateProfileRequest;
pub use analysis::{ListQuery, UpdateTitleRequest, VideoSearchQuery};
pub use authentication::{ChangePasswordRequest, LoginRequest, RegisterRequest};
pub use chat::{GenerateMindMapRequest, MessagesQuery, SendMessageRequest, UpdateMessageRequest};
pub use export::BatchExportRequest;
pub use paths::{AnalysisPathParams, ChatPathParams, FilenamePathParams, MessagePathParams};
pub use upload::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE, RetryRequest, UploadForm, UploadFormBuilder};
