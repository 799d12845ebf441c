//! Joins events with their creator and category names for display.

use serde::Serialize;

use crate::models::{format_timestamp, Category, CategoryId, Event, User};

const CATEGORY_SEPARATOR: &str = ", ";

/// Resolution of an event's `createdBy` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "user", rename_all = "lowercase")]
pub enum Creator {
    /// Users have not been loaded yet.
    Pending,
    /// Users are loaded and none matches.
    Missing,
    Known(User),
}

impl Creator {
    pub fn resolve(event: &Event, users: Option<&[User]>) -> Self {
        let Some(users) = users else {
            return Self::Pending;
        };
        event
            .created_by
            .and_then(|id| users.iter().find(|user| user.id == id))
            .cloned()
            .map_or(Self::Missing, Self::Known)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Known(user) => Some(user),
            Self::Pending | Self::Missing => None,
        }
    }
}

/// Names of the given categories joined with `", "`. Ids with no matching
/// category are left out.
pub fn category_names(ids: &[CategoryId], categories: &[Category]) -> String {
    ids.iter()
        .filter_map(|id| categories.iter().find(|category| category.id == *id))
        .map(|category| category.name.as_str())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(CATEGORY_SEPARATOR)
}

/// What an event card in the collection view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub event: Event,
    pub category_names: String,
    pub start_label: String,
    pub end_label: String,
}

impl EventSummary {
    pub fn compose(event: &Event, categories: &[Category]) -> Self {
        Self {
            event: event.clone(),
            category_names: category_names(&event.category_ids, categories),
            start_label: format_timestamp(&event.start_time),
            end_label: format_timestamp(&event.end_time),
        }
    }
}

/// The detail view of one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(flatten)]
    pub summary: EventSummary,
    pub creator: Creator,
}

impl EventDetail {
    pub fn with_creator(event: &Event, categories: &[Category], creator: Creator) -> Self {
        Self {
            summary: EventSummary::compose(event, categories),
            creator,
        }
    }

    pub fn event(&self) -> &Event {
        &self.summary.event
    }
}
