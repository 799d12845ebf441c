use tracing::{info, warn};

use super::ViewState;
use crate::composer::EventSummary;
use crate::filter::EventFilter;
use crate::gateway::{Gateway, RequestError};
use crate::models::{Category, Event, NewEvent, User};
use crate::mutation::{
    EventForm, MutationError, MutationFlow, MutationState, Navigation, Notification, Outcome,
};

#[derive(Debug, Default)]
pub struct CatalogueState {
    pub events: Vec<Event>,
    pub categories: Vec<Category>,
    /// Creator options for the add form, loaded when it opens.
    pub users: Option<Vec<User>>,
    pub filter: EventFilter,
    pub form_open: bool,
    pub add_flow: MutationFlow,
}

/// The searchable list of all events, with the add-event form.
#[derive(Debug, Clone)]
pub struct CatalogueView {
    state: ViewState<CatalogueState>,
}

impl Default for CatalogueView {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogueView {
    pub fn new() -> Self {
        Self {
            state: ViewState::new(CatalogueState::default()),
        }
    }

    /// Fetches events and categories. Whatever loaded is kept even when the
    /// other request fails; the first failure is returned.
    pub async fn mount<G>(&self, gateway: &G) -> Result<(), RequestError>
    where
        G: Gateway + ?Sized,
    {
        let (events, categories) = tokio::join!(gateway.list_events(), gateway.list_categories());
        let failure = events
            .as_ref()
            .err()
            .or(categories.as_ref().err())
            .cloned();

        self.state.update(move |state| {
            if let Ok(events) = events {
                state.events = events;
            }
            if let Ok(categories) = categories {
                state.categories = categories;
            }
        });

        match failure {
            Some(err) => {
                warn!(error = %err, "catalogue failed to load");
                Err(err)
            }
            None => Ok(()),
        }
    }

    pub fn unmount(&self) {
        self.state.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_mounted()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.state.update(|state| state.filter.set_query(query));
    }

    pub fn toggle_category(&self, id: impl Into<String>, checked: bool) {
        let id = id.into();
        self.state
            .update(|state| state.filter.toggle_category(id, checked));
    }

    pub fn filter(&self) -> EventFilter {
        self.state.read(|state| state.filter.clone())
    }

    /// Cards for the events passing the current filter, in list order.
    pub fn visible(&self) -> Vec<EventSummary> {
        self.visible_with(&self.filter())
    }

    /// Like [`CatalogueView::visible`] but with a caller-owned filter, for
    /// callers sharing one view.
    pub fn visible_with(&self, filter: &EventFilter) -> Vec<EventSummary> {
        self.state.read(|state| {
            filter
                .apply(&state.events)
                .into_iter()
                .map(|event| EventSummary::compose(event, &state.categories))
                .collect()
        })
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.read(|state| state.events.clone())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.read(|state| state.categories.clone())
    }

    pub fn users(&self) -> Option<Vec<User>> {
        self.state.read(|state| state.users.clone())
    }

    pub fn is_form_open(&self) -> bool {
        self.state.read(|state| state.form_open)
    }

    pub fn add_state(&self) -> MutationState {
        self.state.read(|state| state.add_flow.state().clone())
    }

    /// Opens the add form and loads its creator options.
    pub async fn open_form<G>(&self, gateway: &G) -> Result<(), RequestError>
    where
        G: Gateway + ?Sized,
    {
        self.state.update(|state| {
            state.form_open = true;
            if !state.add_flow.is_submitting() {
                state.add_flow.reset();
            }
        });
        let users = gateway.list_users().await?;
        self.state.update(|state| state.users = Some(users));
        Ok(())
    }

    pub fn close_form(&self) {
        self.state.update(|state| state.form_open = false);
    }

    /// Validates `form`, creates the event and appends the stored record.
    ///
    /// An invalid form never reaches the gateway.
    pub async fn submit_new_event<G>(
        &self,
        gateway: &G,
        form: &EventForm,
    ) -> Result<Outcome<Event>, MutationError>
    where
        G: Gateway + ?Sized,
    {
        let draft = self
            .state
            .update(|state| -> Result<NewEvent, MutationError> {
                state.add_flow.begin()?;
                match form.validate() {
                    Ok(draft) => {
                        state.add_flow.submit();
                        Ok(draft)
                    }
                    Err(err) => {
                        state.add_flow.reject(err.clone());
                        Err(MutationError::from(err))
                    }
                }
            })
            .ok_or(MutationError::Unmounted)??;

        let result = gateway.create_event(&draft).await;

        let applied = self
            .state
            .update(|state| {
                state.add_flow.finish(&result);
                if let Ok(event) = &result {
                    state.events.push(event.clone());
                    state.form_open = false;
                }
            })
            .is_some();

        let event = result?;
        info!(event_id = event.id, applied, "event created");
        Ok(Outcome {
            notification: Notification::success(
                "Event added.",
                Some(format!("\"{}\" was added to the catalogue.", event.title)),
            ),
            value: event,
            navigation: Navigation::CloseForm,
            applied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::RequestError;
    use crate::mutation::{Field, Level};
    use crate::testing::MemoryGateway;

    fn launch_form() -> EventForm {
        EventForm {
            title: "Launch".to_string(),
            description: "d".to_string(),
            image: "http://x/i.png".to_string(),
            location: "HQ".to_string(),
            start_time: "2024-01-01T10:00".to_string(),
            end_time: "2024-01-01T11:00".to_string(),
            category_ids: vec!["1".to_string()],
            created_by: "2".to_string(),
        }
    }

    async fn wait_for_calls(gateway: &MemoryGateway, count: usize) {
        while gateway.calls().len() < count {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_mount_loads_events_and_categories() {
        let gateway = MemoryGateway::seeded();
        let view = CatalogueView::new();
        view.mount(&gateway).await.expect("mount succeeds");

        assert_eq!(view.events().len(), 2);
        assert_eq!(view.categories().len(), 2);

        let cards = view.visible();
        assert_eq!(cards[0].category_names, "sports, games");
        assert_eq!(cards[1].category_names, "games");
    }

    #[tokio::test]
    async fn test_filter_updates_visible_cards() {
        let gateway = MemoryGateway::seeded();
        let view = CatalogueView::new();
        view.mount(&gateway).await.expect("mount succeeds");

        view.set_query("party");
        view.toggle_category("2", true);
        let ids: Vec<i64> = view.visible().iter().map(|c| c.event.id).collect();
        assert_eq!(ids, vec![1]);

        view.set_query("");
        let ids: Vec<i64> = view.visible().iter().map(|c| c.event.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_shared_view_filters_per_caller() {
        let gateway = MemoryGateway::seeded();
        let view = CatalogueView::new();
        view.mount(&gateway).await.expect("mount succeeds");

        let games = EventFilter::default().with_category_list("2");
        let sports = EventFilter::new("").with_category_list("1");
        assert_eq!(view.visible_with(&games).len(), 2);
        let ids: Vec<i64> = view.visible_with(&sports).iter().map(|c| c.event.id).collect();
        assert_eq!(ids, vec![1]);
        assert!(view.filter().is_empty());
    }

    #[tokio::test]
    async fn test_create_appends_record_and_closes_form() {
        let gateway = MemoryGateway::seeded();
        let view = CatalogueView::new();
        view.mount(&gateway).await.expect("mount succeeds");
        view.open_form(&gateway).await.expect("users load");
        assert!(view.is_form_open());
        assert_eq!(view.users().map(|u| u.len()), Some(2));

        let outcome = view
            .submit_new_event(&gateway, &launch_form())
            .await
            .expect("create succeeds");

        assert!(outcome.applied);
        assert_eq!(outcome.navigation, Navigation::CloseForm);
        assert_eq!(outcome.notification.level, Level::Success);
        assert_eq!(outcome.value.id, 3);
        assert!(!view.is_form_open());
        assert_eq!(view.events().last().map(|e| e.title.as_str()), Some("Launch"));
        assert_eq!(view.add_state(), MutationState::Succeeded);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_gateway() {
        let gateway = MemoryGateway::seeded();
        let view = CatalogueView::new();

        let mut form = launch_form();
        form.category_ids.clear();
        let err = view
            .submit_new_event(&gateway, &form)
            .await
            .expect_err("categories are required");

        match err {
            MutationError::Invalid(err) => assert_eq!(err.fields(), vec![Field::CategoryIds]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(gateway.calls().is_empty());
        assert!(matches!(view.add_state(), MutationState::Invalid(_)));
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_rejected() {
        let (gateway, permits) = MemoryGateway::held();
        let view = CatalogueView::new();
        let form = launch_form();

        let (first, second) = tokio::join!(view.submit_new_event(&gateway, &form), async {
            wait_for_calls(&gateway, 1).await;
            let second = view.submit_new_event(&gateway, &form).await;
            permits.add_permits(1);
            second
        });

        assert!(first.is_ok());
        assert!(matches!(second, Err(MutationError::AlreadySubmitting)));
        assert_eq!(gateway.calls(), vec!["POST /events".to_string()]);
    }

    #[tokio::test]
    async fn test_response_after_unmount_leaves_state_alone() {
        let (gateway, permits) = MemoryGateway::held();
        let view = CatalogueView::new();
        let form = launch_form();

        let (outcome, _) = tokio::join!(view.submit_new_event(&gateway, &form), async {
            wait_for_calls(&gateway, 1).await;
            view.unmount();
            permits.add_permits(1);
        });

        let outcome = outcome.expect("the service still stored the event");
        assert!(!outcome.applied);
        assert!(view.events().is_empty());
        assert_eq!(gateway.stored_events().len(), 3);
    }

    #[tokio::test]
    async fn test_submit_on_unmounted_view_is_refused() {
        let gateway = MemoryGateway::seeded();
        let view = CatalogueView::new();
        view.unmount();

        let err = view
            .submit_new_event(&gateway, &launch_form())
            .await
            .expect_err("view is gone");
        assert!(matches!(err, MutationError::Unmounted));
        assert!(gateway.calls().is_empty());
        assert_eq!(view.add_state(), MutationState::Idle);
    }

    #[tokio::test]
    async fn test_failed_mount_keeps_partial_data() {
        let view = CatalogueView::new();
        let gateway = crate::gateway::RestGateway::new("http://127.0.0.1:9");
        let err = view.mount(&gateway).await.expect_err("nothing listens");

        assert!(matches!(err, RequestError::Transport(_)));
        assert!(view.events().is_empty());
        assert!(view.visible().is_empty());
    }
}
