//! The calendar event model and its input shapes.
//!
//! Events live as a flat JSON array on disk. Clients may send extra fields;
//! only the known ones survive deserialization.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display color applied when a client does not pick one.
pub const DEFAULT_COLOR: &str = "#3498db";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// A calendar event as persisted in the events file.
///
/// Identity is the `id`; every other field is mutable. Timestamps are kept
/// as the client-supplied strings (e.g. `2024-01-01T09:00`) and never
/// reinterpreted, which is what makes date filtering a plain prefix match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: String,
    pub end: String,
    #[serde(default = "default_color")]
    pub color: String,
}

/// An incoming event from a create or sync request.
///
/// The id is generated when absent; unknown fields are dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct EventDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl EventDraft {
    /// Materialize the draft, filling in a fresh id and the default color
    /// where the client left them out.
    pub fn into_event(self) -> Event {
        Event {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: self.title,
            description: self.description,
            start: self.start,
            end: self.end,
            color: self.color.unwrap_or_else(default_color),
        }
    }
}

/// A partial update for an existing event. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl EventPatch {
    /// Shallow-merge the patch onto an event, preserving unset fields.
    pub fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = Some(description);
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(color) = self.color {
            event.color = color;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.color.is_none()
    }
}
