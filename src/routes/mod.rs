use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, SecurityHeaders};
use crate::gateway::Gateway;
use crate::handlers::{
    create_event, delete_event, get_event, health_check, list_categories, list_events,
    list_users, update_event,
};
use crate::views::ViewRegistry;

#[derive(Clone)]
pub struct AppState {
    gateway: Arc<dyn Gateway>,
    views: ViewRegistry,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            views: ViewRegistry::new(),
        }
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }
}

pub fn create_routes(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/:event_id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/categories", get(list_categories))
        .route("/api/users", get(list_users))
        .with_state(state);

    SecurityHeaders::from_env()
        .apply(api)
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
}
