//! Caption rendering for the currently selected poster.
//!
//! Pure formatting: one fixed HTML template per record, no side effects.
//! The transport layer sends `text` as the message body and may reuse
//! `link` directly (e.g. for reposting the raw image).

use crate::posters::PosterRecord;

/// A rendered caption: the message text plus the raw image link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    /// HTML message body.
    pub text: String,
    /// The record's raw image URL, for direct reuse.
    pub link: String,
}

/// Render the caption for one poster record.
///
/// Template: a bold title line, then a bold source line
/// `{provider} {kind} [{language}]: Click Here` where the `Click Here`
/// anchor points at the image and the language segment is omitted for
/// untagged artwork.
pub fn render(record: &PosterRecord) -> Caption {
    let mut text = String::new();
    if !record.title.is_empty() {
        text.push_str(&format!("<b>🎬 {}</b>\n\n", escape(&record.title)));
    }

    let language = match &record.language {
        Some(lang) => format!(" [{}]", escape(lang)),
        None => String::new(),
    };
    text.push_str(&format!(
        "<b>{} {}{}: <a href=\"{}\">Click Here</a></b>",
        escape(&record.provider_name),
        record.kind,
        language,
        escape(&record.image_url),
    ));

    Caption {
        text,
        link: record.image_url.clone(),
    }
}

/// Minimal HTML escaping for text interpolated into the template.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
