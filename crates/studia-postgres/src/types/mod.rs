//! Contains enumerations, pagination, and other custom types.

mod enums;
mod pagination;

pub use enums::{ContentType, MessageKind, MessageRole};
pub use pagination::{MAX_LIMIT, OffsetPage, OffsetPagination};
