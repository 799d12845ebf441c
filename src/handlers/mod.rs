use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::filter::EventFilter;
use crate::models::EventId;
use crate::mutation::{EventForm, MutationError, MutationKind, MutationState};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::views::{DetailState, EventView, NOT_FOUND_MESSAGE};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "event-catalogue",
    };

    success(payload, "Health check successful").into_response()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventQuery {
    /// Title search text.
    pub q: String,
    /// Comma-separated category ids.
    pub categories: String,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Response, AppError> {
    let filter = EventFilter::new(query.q).with_category_list(&query.categories);
    let catalogue = state.views().catalogue();
    catalogue.mount(state.gateway()).await?;

    let cards = catalogue.visible_with(&filter);
    let message = format!("{} event(s) found", cards.len());
    Ok(success(cards, message))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(form): Json<EventForm>,
) -> Result<Response, AppError> {
    let outcome = state
        .views()
        .catalogue()
        .submit_new_event(state.gateway(), &form)
        .await
        .map_err(|e| AppError::mutation(MutationKind::Create, e))?;

    let message = outcome.notification.title.clone();
    Ok(created(outcome, message))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Response, AppError> {
    let view = EventView::new(event_id);
    let loaded = view.mount(state.gateway()).await;

    match (view.render(), loaded) {
        (DetailState::Ready(detail), _) => Ok(success(detail, "Event loaded")),
        (_, Err(err)) if !err.is_not_found() => Err(err.into()),
        (DetailState::NotFound, _) => Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_string())),
        (DetailState::Loading, _) => Err(AppError::InternalServerError(format!(
            "event {event_id} still loading after mount"
        ))),
    }
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
    Json(form): Json<EventForm>,
) -> Result<Response, AppError> {
    if let Err(err) = form.validate() {
        return Err(AppError::mutation(MutationKind::Update, err.into()));
    }

    let view = state.views().event(event_id);
    if view.edit_state() == MutationState::Submitting {
        return Err(AppError::mutation(
            MutationKind::Update,
            MutationError::AlreadySubmitting,
        ));
    }

    if let Err(err) = view.mount(state.gateway()).await {
        if view.event().is_none() {
            if !err.is_not_found() {
                return Err(err.into());
            }
            state.views().forget(event_id);
            return Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }
    }

    let outcome = view
        .submit_edit(state.gateway(), &form)
        .await
        .map_err(|e| AppError::mutation(MutationKind::Update, e))?;

    let message = outcome.notification.title.clone();
    Ok(success(outcome, message))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Response, AppError> {
    let view = state.views().event(event_id);
    view.open_delete();
    let result = view.confirm_delete(state.gateway()).await;

    match &result {
        Ok(_) => state.views().forget(event_id),
        Err(MutationError::Request(err)) if err.is_not_found() => {
            state.views().forget(event_id)
        }
        Err(_) => {}
    }
    let outcome = result.map_err(|e| AppError::mutation(MutationKind::Delete, e))?;

    let message = outcome.notification.title.clone();
    Ok(success(outcome, message))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<Response, AppError> {
    let categories = state.gateway().list_categories().await?;
    Ok(success(categories, "Categories loaded"))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Response, AppError> {
    let users = state.gateway().list_users().await?;
    Ok(success(users, "Users loaded"))
}
