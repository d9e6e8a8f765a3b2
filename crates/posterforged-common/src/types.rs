//! Core enums shared across the poster engine.

use serde::{Deserialize, Serialize};

/// Orientation of a poster image.
///
/// `Landscape` covers backdrop/cover art, `Portrait` the classic
/// poster-shaped art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosterKind {
    Landscape,
    Portrait,
}

impl std::fmt::Display for PosterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Landscape => write!(f, "Landscape"),
            Self::Portrait => write!(f, "Portrait"),
        }
    }
}

impl std::str::FromStr for PosterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "landscape" | "backdrop" => Ok(Self::Landscape),
            "portrait" | "poster" => Ok(Self::Portrait),
            other => Err(format!("unknown poster kind: {other}")),
        }
    }
}

/// Request-side orientation filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    Landscape,
    Portrait,
    #[default]
    Both,
}

impl KindFilter {
    /// Whether a record of the given orientation passes this filter.
    #[must_use]
    pub fn accepts(self, kind: PosterKind) -> bool {
        match self {
            Self::Landscape => kind == PosterKind::Landscape,
            Self::Portrait => kind == PosterKind::Portrait,
            Self::Both => true,
        }
    }
}

impl std::str::FromStr for KindFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "landscape" | "backdrop" => Ok(Self::Landscape),
            "portrait" | "poster" => Ok(Self::Portrait),
            "both" | "all" => Ok(Self::Both),
            other => Err(format!("unknown kind filter: {other}")),
        }
    }
}
