//! Event entity.

use serde::{Deserialize, Serialize};

/// A scheduled restaurant event.
///
/// Carries two independent date-like strings: `event_date` is when the event
/// takes place (free-form, caller supplied) and `date` is the record's last
/// modified stamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
    pub id: String,
    pub name: String,
    pub event_date: String,
    pub date: String,
    pub event_description: String,
}
