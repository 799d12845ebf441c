//! Title search and category selection over an event list.

use std::collections::BTreeSet;

use crate::models::Event;

/// Search text plus the set of checked category ids.
///
/// Category ids are kept as strings, the form in which a checkbox group
/// reports them. An empty selection applies no category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    query: String,
    selected: BTreeSet<String>,
}

impl EventFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            selected: BTreeSet::new(),
        }
    }

    pub fn with_categories<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_categories(ids);
        self
    }

    /// Parses a comma-separated selection such as `"1,3"`. Blank entries are
    /// skipped.
    pub fn with_category_list(self, list: &str) -> Self {
        self.with_categories(
            list.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        )
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn set_categories<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = ids.into_iter().map(Into::into).collect();
    }

    /// Checks or unchecks a single category.
    pub fn toggle_category(&mut self, id: impl Into<String>, checked: bool) {
        let id = id.into();
        if checked {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.selected.is_empty()
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.matches_title(event) && self.matches_category(event)
    }

    fn matches_title(&self, event: &Event) -> bool {
        event
            .title
            .to_lowercase()
            .contains(&self.query.to_lowercase())
    }

    fn matches_category(&self, event: &Event) -> bool {
        self.selected.is_empty()
            || event
                .category_ids
                .iter()
                .any(|id| self.selected.contains(&id.to_string()))
    }

    /// Events passing the filter, in their original order.
    pub fn apply<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events.iter().filter(|event| self.matches(event)).collect()
    }
}
