use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{CategoryId, EventId, UserId};

/// An event as stored by the data service.
///
/// Fields the catalogue does not know about are kept in `extra` so that an
/// update writes them back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category_ids: Vec<CategoryId>,
    pub created_by: Option<UserId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated event payload without a server-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub image: String,
    pub location: String,
    pub start_time: String,
    pub end_time: String,
    pub category_ids: Vec<CategoryId>,
    pub created_by: UserId,
}

impl Event {
    /// Copy of this event with every edited field replaced by `draft`.
    pub fn merged_with(&self, draft: &NewEvent) -> Event {
        Event {
            id: self.id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            image: draft.image.clone(),
            location: draft.location.clone(),
            start_time: draft.start_time.clone(),
            end_time: draft.end_time.clone(),
            category_ids: draft.category_ids.clone(),
            created_by: Some(draft.created_by),
            extra: self.extra.clone(),
        }
    }

    pub fn has_category(&self, id: CategoryId) -> bool {
        self.category_ids.contains(&id)
    }
}

/// Some stored records carry `"categoryIds": null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
