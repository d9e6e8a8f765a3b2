//! Normalization: raw provider extractions into filtered, ordered records.
//!
//! The normalizer is the single place where filtering and ordering happen,
//! so pagination is deterministic across repeated calls on identical input.

use posterforged_common::KindFilter;

use crate::providers::ProviderResult;

use super::PosterRecord;

/// Identity of the adapter a batch of raw results came from.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Registry key (e.g. "amzn").
    pub key: String,
    /// Caption display name (e.g. "Amazon Prime Video").
    pub display_name: String,
}

/// Request-side filters applied during normalization.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Orientation filter.
    pub kind: KindFilter,
    /// Exact-match language tag. Untagged ("No Language") candidates always
    /// pass; tagged candidates must match.
    pub language: Option<String>,
}

/// Normalize raw extractions into the canonical, ordered record sequence.
///
/// Batches are consumed in adapter order and each batch in source order.
/// After filtering, records are stably sorted by `(kind, language)` with
/// untagged languages last; candidates equal under that key keep their
/// source order. Producing an empty sequence is a valid outcome, not an
/// error.
pub fn normalize(
    batches: Vec<(SourceInfo, Vec<ProviderResult>)>,
    filters: &Filters,
) -> Vec<PosterRecord> {
    let mut records: Vec<PosterRecord> = Vec::new();

    for (source, results) in batches {
        for result in results {
            if !is_valid_image_url(&result.url) {
                tracing::debug!(source = %source.key, url = %result.url, "dropping invalid image url");
                continue;
            }
            if !filters.kind.accepts(result.kind) {
                continue;
            }
            if let (Some(wanted), Some(tag)) = (&filters.language, &result.language) {
                if !wanted.eq_ignore_ascii_case(tag) {
                    continue;
                }
            }

            records.push(PosterRecord {
                source_id: source.key.clone(),
                provider_name: source.display_name.clone(),
                image_url: result.url,
                kind: result.kind,
                language: result.language,
                title: PosterRecord::display_title(result.title.as_deref(), result.year.as_deref()),
            });
        }
    }

    // Stable: records equal under the key keep their source order.
    records.sort_by(|a, b| {
        (a.kind, a.language.is_none(), &a.language).cmp(&(b.kind, b.language.is_none(), &b.language))
    });

    records
}

/// A record URL must be non-empty, absolute, and http(s).
fn is_valid_image_url(url: &str) -> bool {
    match reqwest::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
