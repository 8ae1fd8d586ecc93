//! Lead pipeline status.

use serde::{Deserialize, Serialize};

/// Where a lead sits in the sales pipeline.
///
/// Rows written before the status column existed have no value; those
/// deserialize as [`LeadStatus::New`] via `#[serde(default)]` on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Closed,
}

impl LeadStatus {
    /// All statuses in pipeline order, for select inputs.
    pub const ALL: [Self; 4] = [Self::New, Self::Contacted, Self::Qualified, Self::Closed];

    /// Wire value as stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Closed => "closed",
        }
    }

    /// Human label for the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::Closed => "Closed",
        }
    }

    /// Whether this status counts toward the conversion rate.
    #[must_use]
    pub const fn is_converted(self) -> bool {
        matches!(self, Self::Qualified | Self::Closed)
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`LeadStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid lead status: {0}")]
pub struct ParseLeadStatusError(String);

impl std::str::FromStr for LeadStatus {
    type Err = ParseLeadStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "qualified" => Ok(Self::Qualified),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseLeadStatusError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_new() {
        assert_eq!(LeadStatus::default(), LeadStatus::New);
    }

    #[test]
    fn test_from_str_accepts_any_case() {
        assert_eq!("Qualified".parse::<LeadStatus>().unwrap(), LeadStatus::Qualified);
        assert!("archived".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_converted_statuses() {
        let converted: Vec<_> = LeadStatus::ALL
            .into_iter()
            .filter(|s| s.is_converted())
            .collect();
        assert_eq!(converted, vec![LeadStatus::Qualified, LeadStatus::Closed]);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&LeadStatus::Contacted).unwrap(),
            "\"contacted\""
        );
    }
}
