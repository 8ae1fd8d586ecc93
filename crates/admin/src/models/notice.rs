//! Notices shown after a redirect.
//!
//! Handlers redirect with `?notice=<code>` (or `?error=<code>` on the login
//! page) and the next page renders the matching message. Codes that don't
//! parse are ignored.

/// Banner shown above the lead table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardNotice {
    Deleted,
    DeleteFailed,
    DeleteUnconfirmed,
    StatusUpdated,
    UpdateFailed,
    InvalidStatus,
    LoadFailed,
    NotFound,
}

impl DashboardNotice {
    const ALL: [Self; 8] = [
        Self::Deleted,
        Self::DeleteFailed,
        Self::DeleteUnconfirmed,
        Self::StatusUpdated,
        Self::UpdateFailed,
        Self::InvalidStatus,
        Self::LoadFailed,
        Self::NotFound,
    ];

    /// Look up a notice by its query-string code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    /// Query-string code for this notice.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::DeleteFailed => "delete_failed",
            Self::DeleteUnconfirmed => "delete_unconfirmed",
            Self::StatusUpdated => "status_updated",
            Self::UpdateFailed => "update_failed",
            Self::InvalidStatus => "invalid_status",
            Self::LoadFailed => "load_failed",
            Self::NotFound => "not_found",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Deleted => "Lead deleted.",
            Self::DeleteFailed => "Failed to delete the lead. Please try again.",
            Self::DeleteUnconfirmed => "Delete was not confirmed. Nothing was removed.",
            Self::StatusUpdated => "Lead status updated.",
            Self::UpdateFailed => "Failed to update the lead status. Please try again.",
            Self::InvalidStatus => "Unknown status. Nothing was changed.",
            Self::LoadFailed => "Failed to load leads. Showing the last loaded list.",
            Self::NotFound => "That lead no longer exists.",
        }
    }

    #[must_use]
    pub const fn is_error(self) -> bool {
        !matches!(self, Self::Deleted | Self::StatusUpdated)
    }

    /// Redirect target for the lead list carrying this notice.
    #[must_use]
    pub fn location(self) -> String {
        format!("/leads?notice={}", self.code())
    }
}

/// Reason a sign-in attempt was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    Invalid,
    Forbidden,
    Unavailable,
}

impl LoginError {
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        [Self::Invalid, Self::Forbidden, Self::Unavailable]
            .into_iter()
            .find(|e| e.code() == code)
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Forbidden => "forbidden",
            Self::Unavailable => "unavailable",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid credentials",
            Self::Forbidden => "This account does not have admin access.",
            Self::Unavailable => "Sign-in is temporarily unavailable. Please try again.",
        }
    }

    #[must_use]
    pub fn location(self) -> String {
        format!("/auth/login?error={}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_successes_are_not_errors() {
        assert!(!DashboardNotice::Deleted.is_error());
        assert!(!DashboardNotice::StatusUpdated.is_error());
        assert!(DashboardNotice::DeleteFailed.is_error());
        assert!(DashboardNotice::LoadFailed.is_error());
    }

    #[test]
    fn test_unknown_codes_are_ignored() {
        assert_eq!(
            DashboardNotice::from_code("delete_failed"),
            Some(DashboardNotice::DeleteFailed)
        );
        assert_eq!(DashboardNotice::from_code("<script>"), None);
        assert_eq!(LoginError::from_code("forbidden"), Some(LoginError::Forbidden));
        assert_eq!(LoginError::from_code(""), None);
    }

    #[test]
    fn test_locations() {
        assert_eq!(DashboardNotice::Deleted.location(), "/leads?notice=deleted");
        assert_eq!(LoginError::Invalid.location(), "/auth/login?error=invalid");
    }
}
