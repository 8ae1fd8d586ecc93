//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use nextrade_baas::AuthUser;
use nextrade_core::{Email, Role};
use serde::{Deserialize, Serialize};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the signed-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Identity provider user ID.
    pub id: String,
    /// Admin's email address.
    pub email: Email,
    /// Display name from the provider's metadata, if set.
    pub name: Option<String>,
    /// Role claim at sign-in time.
    pub role: Role,
}

impl From<AuthUser> for CurrentAdmin {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// Session keys for admin state.
pub mod keys {
    /// Key for storing the current signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the lead id awaiting delete confirmation.
    pub const PENDING_DELETE: &str = "pending_delete";
}
