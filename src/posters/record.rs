//! The canonical poster record every provider's output is normalized into.

use posterforged_common::PosterKind;
use serde::{Deserialize, Serialize};

/// One normalized poster/backdrop candidate.
///
/// Invariants (enforced by the normalizer, which drops violators):
/// `image_url` is non-empty and URL-parseable; `kind` is always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterRecord {
    /// Registry key of the provider that produced this record.
    pub source_id: String,
    /// Human-readable provider name, used in captions.
    pub provider_name: String,
    /// Direct URL of the image.
    pub image_url: String,
    /// Orientation of the image.
    pub kind: PosterKind,
    /// Display language of the artwork; `None` means "No Language".
    pub language: Option<String>,
    /// Display title, with the year folded in when known
    /// (e.g. "Maari (2025)").
    pub title: String,
}

impl PosterRecord {
    /// Build the display title from the raw title/year pair.
    pub(crate) fn display_title(title: Option<&str>, year: Option<&str>) -> String {
        match (title, year) {
            (Some(t), Some(y)) => format!("{t} ({y})"),
            (Some(t), None) => t.to_string(),
            (None, _) => "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_title_combinations() {
        assert_eq!(
            PosterRecord::display_title(Some("Maari"), Some("2025")),
            "Maari (2025)"
        );
        assert_eq!(PosterRecord::display_title(Some("Maari"), None), "Maari");
        assert_eq!(PosterRecord::display_title(None, Some("2025")), "Unknown");
        assert_eq!(PosterRecord::display_title(None, None), "Unknown");
    }
}
