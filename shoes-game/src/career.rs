//! Career identifiers shared by every world, the hub and replay codes.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareerId {
    Doctor,
    Lawyer,
    Influencer,
    Politician,
    Engineer,
}

impl CareerId {
    /// Hub menu order.
    pub const ALL: [Self; 5] = [
        Self::Doctor,
        Self::Lawyer,
        Self::Influencer,
        Self::Politician,
        Self::Engineer,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Lawyer => "lawyer",
            Self::Influencer => "influencer",
            Self::Politician => "politician",
            Self::Engineer => "engineer",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Doctor => "Doctor",
            Self::Lawyer => "Lawyer",
            Self::Influencer => "Influencer",
            Self::Politician => "Politician",
            Self::Engineer => "Engineer",
        }
    }

    /// One-line pitch shown on the career selection card.
    #[must_use]
    pub const fn tagline(self) -> &'static str {
        match self {
            Self::Doctor => "Save lives under pressure",
            Self::Lawyer => "Find truth in testimony",
            Self::Influencer => "Create viral content",
            Self::Politician => "Lead with wisdom",
            Self::Engineer => "Build the future",
        }
    }

    /// Two-letter prefix used by replay codes, e.g. `DR-ORANGE42`.
    #[must_use]
    pub const fn replay_prefix(self) -> &'static str {
        match self {
            Self::Doctor => "DR",
            Self::Lawyer => "LW",
            Self::Influencer => "IF",
            Self::Politician => "PO",
            Self::Engineer => "EN",
        }
    }

    #[must_use]
    pub fn from_replay_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|career| career.replay_prefix().eq_ignore_ascii_case(prefix))
    }
}

impl fmt::Display for CareerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown career '{0}' (expected doctor, lawyer, influencer, politician or engineer)")]
pub struct UnknownCareer(pub String);

impl FromStr for CareerId {
    type Err = UnknownCareer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|career| career.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownCareer(needle.to_string()))
    }
}

impl From<CareerId> for String {
    fn from(value: CareerId) -> Self {
        value.as_str().to_string()
    }
}
