use tracing::{info, warn};

use super::ViewState;
use crate::composer::{Creator, EventDetail};
use crate::gateway::{Gateway, RequestError};
use crate::models::{Category, Event, EventId, User};
use crate::mutation::{
    EventForm, MutationError, MutationFlow, MutationState, Navigation, Notification, Outcome,
};

/// Shown in place of the detail when the event or its creator is absent.
pub const NOT_FOUND_MESSAGE: &str = "Something went wrong...";

#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Pending,
    Ready(T),
    /// The fetch finished without a record.
    Absent,
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending | Self::Absent => None,
        }
    }

    fn from_result(result: &Result<T, RequestError>) -> Self
    where
        T: Clone,
    {
        match result {
            Ok(value) => Self::Ready(value.clone()),
            Err(_) => Self::Absent,
        }
    }
}

#[derive(Debug)]
pub struct EventViewState {
    pub event_id: EventId,
    pub event: Loadable<Event>,
    pub creator: Creator,
    pub categories: Vec<Category>,
    pub users: Option<Vec<User>>,
    pub edit_open: bool,
    pub delete_open: bool,
    pub edit_flow: MutationFlow,
    pub delete_flow: MutationFlow,
}

/// What the detail page renders.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    NotFound,
    Ready(EventDetail),
}

/// One event with its creator, plus the edit and delete dialogs.
#[derive(Debug, Clone)]
pub struct EventView {
    state: ViewState<EventViewState>,
}

impl EventView {
    pub fn new(event_id: EventId) -> Self {
        Self {
            state: ViewState::new(EventViewState {
                event_id,
                event: Loadable::Pending,
                creator: Creator::Pending,
                categories: Vec::new(),
                users: None,
                edit_open: false,
                delete_open: false,
                edit_flow: MutationFlow::default(),
                delete_flow: MutationFlow::default(),
            }),
        }
    }

    pub fn event_id(&self) -> EventId {
        self.state.read(|state| state.event_id)
    }

    /// Fetches the event then its creator, alongside categories and users.
    /// Returns the first failure, with the event's own failure first.
    pub async fn mount<G>(&self, gateway: &G) -> Result<(), RequestError>
    where
        G: Gateway + ?Sized,
    {
        let (primary, categories, users) = tokio::join!(
            self.load_event_and_creator(gateway),
            gateway.list_categories(),
            gateway.list_users()
        );
        let failure = primary
            .as_ref()
            .err()
            .or(categories.as_ref().err())
            .or(users.as_ref().err())
            .cloned();

        self.state.update(move |state| {
            if let Ok(categories) = categories {
                state.categories = categories;
            }
            if let Ok(users) = users {
                state.users = Some(users);
            }
        });

        match failure {
            Some(err) => {
                warn!(event_id = self.event_id(), error = %err, "event view failed to load");
                Err(err)
            }
            None => Ok(()),
        }
    }

    async fn load_event_and_creator<G>(&self, gateway: &G) -> Result<(), RequestError>
    where
        G: Gateway + ?Sized,
    {
        let event = gateway.get_event(self.event_id()).await;
        let created_by = event.as_ref().ok().and_then(|event| event.created_by);
        self.state
            .update(|state| state.event = Loadable::from_result(&event));
        event?;

        let Some(user_id) = created_by else {
            self.state.update(|state| state.creator = Creator::Missing);
            return Ok(());
        };
        self.load_creator(gateway, user_id).await
    }

    async fn load_creator<G>(&self, gateway: &G, user_id: i64) -> Result<(), RequestError>
    where
        G: Gateway + ?Sized,
    {
        let creator = gateway.get_user(user_id).await;
        self.state.update(|state| {
            state.creator = match &creator {
                Ok(user) => Creator::Known(user.clone()),
                Err(_) => Creator::Missing,
            }
        });
        creator.map(|_| ())
    }

    pub fn unmount(&self) {
        self.state.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_mounted()
    }

    pub fn render(&self) -> DetailState {
        self.state.read(|state| match (&state.event, &state.creator) {
            (Loadable::Absent, _) | (_, Creator::Missing) => DetailState::NotFound,
            (Loadable::Ready(event), Creator::Known(_)) => DetailState::Ready(
                EventDetail::with_creator(event, &state.categories, state.creator.clone()),
            ),
            _ => DetailState::Loading,
        })
    }

    pub fn event(&self) -> Option<Event> {
        self.state.read(|state| state.event.ready().cloned())
    }

    pub fn creator(&self) -> Creator {
        self.state.read(|state| state.creator.clone())
    }

    pub fn users(&self) -> Option<Vec<User>> {
        self.state.read(|state| state.users.clone())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.read(|state| state.categories.clone())
    }

    pub fn is_edit_open(&self) -> bool {
        self.state.read(|state| state.edit_open)
    }

    pub fn is_delete_open(&self) -> bool {
        self.state.read(|state| state.delete_open)
    }

    pub fn edit_state(&self) -> MutationState {
        self.state.read(|state| state.edit_flow.state().clone())
    }

    pub fn delete_state(&self) -> MutationState {
        self.state.read(|state| state.delete_flow.state().clone())
    }

    /// Opens the edit dialog with the loaded event's values.
    pub fn open_edit(&self) -> Option<EventForm> {
        self.state
            .update(|state| {
                let form = state.event.ready().map(EventForm::from_event)?;
                state.edit_open = true;
                if !state.edit_flow.is_submitting() {
                    state.edit_flow.reset();
                }
                Some(form)
            })
            .flatten()
    }

    pub fn close_edit(&self) {
        self.state.update(|state| state.edit_open = false);
    }

    pub fn open_delete(&self) {
        self.state.update(|state| {
            state.delete_open = true;
            if !state.delete_flow.is_submitting() {
                state.delete_flow.reset();
            }
        });
    }

    pub fn close_delete(&self) {
        self.state.update(|state| state.delete_open = false);
    }

    /// Validates `form`, merges it over the loaded event and stores the
    /// result. Fields of the event the form does not cover are sent back
    /// unchanged.
    pub async fn submit_edit<G>(
        &self,
        gateway: &G,
        form: &EventForm,
    ) -> Result<Outcome<Event>, MutationError>
    where
        G: Gateway + ?Sized,
    {
        let (original, merged) = self
            .state
            .update(|state| -> Result<(Event, Event), MutationError> {
                let original = state
                    .event
                    .ready()
                    .cloned()
                    .ok_or(MutationError::NothingLoaded("edit"))?;
                state.edit_flow.begin()?;
                match form.validate() {
                    Ok(draft) => {
                        state.edit_flow.submit();
                        let merged = original.merged_with(&draft);
                        Ok((original, merged))
                    }
                    Err(err) => {
                        state.edit_flow.reject(err.clone());
                        Err(MutationError::from(err))
                    }
                }
            })
            .ok_or(MutationError::Unmounted)??;

        let result = gateway.update_event(&merged).await;

        let applied = self
            .state
            .update(|state| {
                state.edit_flow.finish(&result);
                if let Ok(event) = &result {
                    state.event = Loadable::Ready(event.clone());
                    state.edit_open = false;
                }
            })
            .is_some();

        let updated = result?;
        if applied && updated.created_by != original.created_by {
            self.refresh_creator(gateway, &updated).await;
        }

        info!(event_id = updated.id, applied, "event updated");
        Ok(Outcome {
            value: updated,
            navigation: Navigation::Collection,
            notification: Notification::success("Event updated successfully", None::<String>),
            applied,
        })
    }

    async fn refresh_creator<G>(&self, gateway: &G, event: &Event)
    where
        G: Gateway + ?Sized,
    {
        let listed = self
            .state
            .read(|state| Creator::resolve(event, state.users.as_deref()));

        match (listed, event.created_by) {
            (Creator::Known(user), _) => {
                self.state
                    .update(|state| state.creator = Creator::Known(user));
            }
            (_, Some(id)) => {
                if let Err(err) = self.load_creator(gateway, id).await {
                    warn!(user_id = id, error = %err, "creator of edited event not found");
                }
            }
            (_, None) => {
                self.state.update(|state| state.creator = Creator::Missing);
            }
        }
    }

    /// Deletes the event. On failure the dialog stays open and nothing else
    /// changes.
    pub async fn confirm_delete<G>(&self, gateway: &G) -> Result<Outcome<()>, MutationError>
    where
        G: Gateway + ?Sized,
    {
        let event_id = self
            .state
            .update(|state| {
                state.delete_flow.begin()?;
                state.delete_flow.submit();
                Ok::<_, MutationError>(state.event_id)
            })
            .ok_or(MutationError::Unmounted)??;

        let result = gateway.delete_event(event_id).await;
        let applied = self
            .state
            .update(|state| {
                state.delete_flow.finish(&result);
                if result.is_ok() {
                    state.delete_open = false;
                }
            })
            .is_some();

        if let Err(err) = result {
            warn!(event_id, error = %err, "event delete failed");
            return Err(err.into());
        }

        info!(event_id, applied, "event deleted");
        Ok(Outcome {
            value: (),
            navigation: Navigation::Collection,
            notification: Notification::success(
                "Event deleted.",
                Some("The event has been successfully deleted."),
            ),
            applied,
        })
    }
}
