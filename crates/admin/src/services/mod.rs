//! Admin services.

pub mod lead_board;

pub use lead_board::{BoardError, LeadBoard, LeadSnapshot, MutationOutcome};
