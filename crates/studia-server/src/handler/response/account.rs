//! Account and authentication response types.

use jiff::Timestamp;
use serde::Serialize;
use studia_postgres::model::Account;
use uuid::Uuid;

/// Public projection of an account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    /// Account identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Whether the email address was verified.
    pub is_verified: bool,
    /// When the account was created.
    pub created_at: Timestamp,
}

impl From<Account> for AccountProfile {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.display_name,
            email: account.email,
            avatar: account.avatar_url,
            is_verified: account.is_verified,
            created_at: account.created_at.into(),
        }
    }
}

/// Response for register and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated account.
    pub user: AccountProfile,
}

/// Response wrapping a profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    /// Always `true` on success.
    pub success: bool,
    /// The account.
    pub user: AccountProfile,
}

/// Plain acknowledgement response.
#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
}

impl AckResponse {
    /// Creates an acknowledgement.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
