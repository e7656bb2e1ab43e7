//! Database enumeration types for type-safe queries.
//!
//! Each enumeration corresponds to a PostgreSQL ENUM type defined in the
//! schema and provides serialization support for APIs and database
//! integration through Diesel.

pub mod content_type;
pub mod message_kind;
pub mod message_role;

pub use content_type::ContentType;
pub use message_kind::MessageKind;
pub use message_role::MessageRole;
