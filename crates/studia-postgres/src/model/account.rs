//! Account model for PostgreSQL database operations.
//!
//! ## Models
//!
//! - [`Account`] - Main account model
//! - [`NewAccount`] - Data structure for creating new accounts
//! - [`UpdateAccount`] - Data structure for updating existing accounts

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::accounts;

/// Account model representing a registered student.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Email address (unique).
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Display name.
    pub display_name: String,
    /// Avatar URL, if set.
    pub avatar_url: Option<String>,
    /// Whether the email address was verified.
    pub is_verified: bool,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

/// Data structure for creating a new account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    /// Email address.
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Display name.
    pub display_name: String,
}

/// Data structure for updating an existing account.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAccount {
    /// Updated email address.
    pub email: Option<String>,
    /// Updated password hash.
    pub password_hash: Option<String>,
    /// Updated display name.
    pub display_name: Option<String>,
    /// Updated avatar URL.
    pub avatar_url: Option<Option<String>>,
    /// Updated verification state.
    pub is_verified: Option<bool>,
}
