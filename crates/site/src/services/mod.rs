//! Service layer for the site.

pub mod intake;

pub use intake::{IntakeError, IntakeOutcome, LeadIntake};
