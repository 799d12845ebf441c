use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{CatalogueView, EventView};
use crate::models::EventId;

/// Views shared by every request the server handles.
///
/// One catalogue carries the add flow, and each event id has its own view
/// carrying the edit and delete flows, so overlapping submissions on the
/// same flow see each other.
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    catalogue: CatalogueView,
    events: Arc<Mutex<HashMap<EventId, EventView>>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalogue(&self) -> &CatalogueView {
        &self.catalogue
    }

    /// The view for `event_id`, created on first use.
    pub fn event(&self, event_id: EventId) -> EventView {
        self.lock()
            .entry(event_id)
            .or_insert_with(|| EventView::new(event_id))
            .clone()
    }

    /// Drops the view for an event that no longer exists.
    pub fn forget(&self, event_id: EventId) {
        if let Some(view) = self.lock().remove(&event_id) {
            view.unmount();
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<EventId, EventView>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::MutationState;
    use crate::testing::MemoryGateway;

    #[tokio::test]
    async fn test_same_id_shares_one_view() {
        let gateway = MemoryGateway::seeded();
        let registry = ViewRegistry::new();

        registry.event(2).open_delete();
        assert!(registry.event(2).is_delete_open());
        assert!(!registry.event(1).is_delete_open());
        assert_eq!(registry.lock().len(), 2);

        registry
            .event(2)
            .confirm_delete(&gateway)
            .await
            .expect("delete succeeds");
        assert_eq!(registry.event(2).delete_state(), MutationState::Succeeded);
    }

    #[test]
    fn test_forget_unmounts_and_removes() {
        let registry = ViewRegistry::new();
        let view = registry.event(7);
        registry.forget(7);

        assert!(!view.is_mounted());
        assert!(registry.lock().is_empty());
        assert!(registry.event(7).is_mounted());
    }
}
