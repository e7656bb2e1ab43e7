//! Response body types for all handlers.

mod account;
mod analysis;
mod chat;
mod error_response;
mod export;

pub use account::{AccountProfile, AckResponse, AuthResponse, ProfileResponse};
pub use analysis::{
    AnalysisDetail, AnalysisListResponse, AnalysisResponse, AnalysisSummary, FlashcardsResponse,
    MindMapResponse, PaginationMeta, QuizResponse, StatisticsBody, StatisticsResponse,
    TopicEntry, TopicsResponse, VideoSearchResponse, VideosResponse, image_url_of, material_of,
    videos_of,
};
pub use chat::{
    ChatHistoryResponse, ChatStatisticsBody, ChatStatisticsResponse, MessageView,
    MessagesResponse, MindMapGenerationResponse, RecentChatEntry, SendMessageResponse,
    UpdateMessageResponse,
};
pub use error_response::ErrorResponse;
pub use export::{ExportEntry, ExportHistoryResponse, ExportResponse};
