//! Pure pagination: page views, navigation keyboards, callback tokens.
//!
//! Everything here is a pure function over a session snapshot. Mutation
//! goes through [`crate::session::SessionStore::advance`]; the transport
//! layer feeds button callbacks back into it via [`parse_callback`].

use posterforged_common::SessionId;
use serde::{Deserialize, Serialize};

use crate::posters::PosterRecord;
use crate::session::{NavAction, SelectionSession};

/// How many numeric jump buttons share one keyboard row.
const NUMERIC_ROW_WIDTH: usize = 5;

/// The rendered snapshot of one pagination step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    /// The record under the cursor; `None` for an empty result set.
    pub record: Option<PosterRecord>,
    /// Zero-based cursor position.
    pub index: usize,
    /// Total number of records in the session.
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// One interactive control the transport renders as a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavButton {
    /// Button label (e.g. "2" or "Next ➡").
    pub label: String,
    /// Opaque callback token carried back on press.
    pub callback: String,
}

/// Render the current page of a session.
///
/// For an empty session the view has no record and both navigation flags
/// are false. Rendering the same session twice yields identical views.
pub fn render(session: &SelectionSession) -> PageView {
    let total = session.records.len();
    PageView {
        record: session.current().cloned(),
        index: session.current_index,
        total,
        has_prev: session.current_index > 0,
        has_next: total > 0 && session.current_index + 1 < total,
    }
}

/// Build the navigation keyboard for a page view.
///
/// Layout: a prev/next row (only the applicable directions), then numeric
/// jump buttons `1..=total` chunked [`NUMERIC_ROW_WIDTH`] per row. An empty
/// view gets an empty keyboard.
pub fn keyboard(view: &PageView, session_id: SessionId) -> Vec<Vec<NavButton>> {
    let mut rows = Vec::new();
    if view.total == 0 {
        return rows;
    }

    let mut nav_row = Vec::new();
    if view.has_prev {
        nav_row.push(NavButton {
            label: "⬅ Prev".to_string(),
            callback: callback_data(session_id, NavAction::Prev),
        });
    }
    if view.has_next {
        nav_row.push(NavButton {
            label: "Next ➡".to_string(),
            callback: callback_data(session_id, NavAction::Next),
        });
    }
    if !nav_row.is_empty() {
        rows.push(nav_row);
    }

    let mut numeric_row = Vec::new();
    for idx in 0..view.total {
        let label = if idx == view.index {
            format!("· {} ·", idx + 1)
        } else {
            (idx + 1).to_string()
        };
        numeric_row.push(NavButton {
            label,
            callback: callback_data(session_id, NavAction::Jump(idx)),
        });
        if numeric_row.len() == NUMERIC_ROW_WIDTH {
            rows.push(std::mem::take(&mut numeric_row));
        }
    }
    if !numeric_row.is_empty() {
        rows.push(numeric_row);
    }

    rows
}

/// Encode a navigation action into a callback token.
pub fn callback_data(session_id: SessionId, action: NavAction) -> String {
    let suffix = match action {
        NavAction::Prev => "prev".to_string(),
        NavAction::Next => "next".to_string(),
        NavAction::Jump(idx) => format!("jump:{idx}"),
    };
    format!("poster:{session_id}:{suffix}")
}

/// Decode a callback token back into a session id and action.
///
/// Returns `None` for tokens this module did not produce.
pub fn parse_callback(data: &str) -> Option<(SessionId, NavAction)> {
    let rest = data.strip_prefix("poster:")?;
    let (id_part, action_part) = rest.split_once(':')?;
    let session_id = SessionId::parse(id_part)?;

    let action = match action_part {
        "prev" => NavAction::Prev,
        "next" => NavAction::Next,
        other => {
            let idx = other.strip_prefix("jump:")?.parse().ok()?;
            NavAction::Jump(idx)
        }
    };
    Some((session_id, action))
}
