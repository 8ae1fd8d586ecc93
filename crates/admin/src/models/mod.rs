//! Admin-specific types: the session identity and dashboard notices.

pub mod notice;
pub mod session;

pub use notice::{DashboardNotice, LoginError};
pub use session::{CurrentAdmin, keys as session_keys};
