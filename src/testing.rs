//! In-memory data service used by the view and flow tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Map;
use tokio::sync::Semaphore;

use crate::gateway::{Gateway, RequestError};
use crate::models::{Category, Event, EventId, NewEvent, User, UserId};

#[derive(Debug, Default)]
struct Store {
    events: Vec<Event>,
    categories: Vec<Category>,
    users: Vec<User>,
}

/// A [`Gateway`] backed by vectors that records every call it serves.
///
/// A held gateway parks each call after recording it until a permit is
/// released, which lets tests act while a request is in flight.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    store: Mutex<Store>,
    calls: Mutex<Vec<String>>,
    hold: Option<Arc<Semaphore>>,
}

impl MemoryGateway {
    pub fn seeded() -> Self {
        let gateway = Self::default();
        {
            let mut store = gateway.store();
            store.categories = vec![category(1, "sports"), category(2, "games")];
            store.users = vec![user(1, "Jane Bennett"), user(2, "Ignacio Doe")];
            store.events = vec![event(1, "Party", &[1, 2], 1), event(2, "Meeting", &[2], 2)];
        }
        gateway
    }

    pub fn held() -> (Self, Arc<Semaphore>) {
        let permits = Arc::new(Semaphore::new(0));
        let gateway = Self {
            hold: Some(Arc::clone(&permits)),
            ..Self::seeded()
        };
        (gateway, permits)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn stored_events(&self) -> Vec<Event> {
        self.store().events.clone()
    }

    fn store(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        if let Some(hold) = &self.hold {
            hold.acquire().await.expect("semaphore open").forget();
        }
    }
}

fn not_found(noun: &str) -> RequestError {
    RequestError::Status {
        status: StatusCode::NOT_FOUND,
        message: format!("Failed to fetch {noun}"),
    }
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
    }
}

pub fn user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        image: format!("http://x/u{id}.png"),
    }
}

pub fn event(id: i64, title: &str, category_ids: &[i64], created_by: i64) -> Event {
    Event {
        id,
        title: title.to_string(),
        description: format!("{title} description"),
        image: format!("http://x/e{id}.png"),
        location: "HQ".to_string(),
        start_time: "2024-01-01T10:00".to_string(),
        end_time: "2024-01-01T11:00".to_string(),
        category_ids: category_ids.to_vec(),
        created_by: Some(created_by),
        extra: Map::new(),
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn list_events(&self) -> Result<Vec<Event>, RequestError> {
        self.record("GET /events".to_string()).await;
        Ok(self.store().events.clone())
    }

    async fn get_event(&self, id: EventId) -> Result<Event, RequestError> {
        self.record(format!("GET /events/{id}")).await;
        let store = self.store();
        store
            .events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| not_found("event"))
    }

    async fn create_event(&self, draft: &NewEvent) -> Result<Event, RequestError> {
        self.record("POST /events".to_string()).await;
        let mut store = self.store();
        let id = store.events.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let created = Event {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            image: draft.image.clone(),
            location: draft.location.clone(),
            start_time: draft.start_time.clone(),
            end_time: draft.end_time.clone(),
            category_ids: draft.category_ids.clone(),
            created_by: Some(draft.created_by),
            extra: Map::new(),
        };
        store.events.push(created.clone());
        Ok(created)
    }

    async fn update_event(&self, event: &Event) -> Result<Event, RequestError> {
        self.record(format!("PUT /events/{}", event.id)).await;
        let mut store = self.store();
        let slot = store
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| not_found("event"))?;
        *slot = event.clone();
        Ok(event.clone())
    }

    async fn delete_event(&self, id: EventId) -> Result<(), RequestError> {
        self.record(format!("DELETE /events/{id}")).await;
        let mut store = self.store();
        let before = store.events.len();
        store.events.retain(|e| e.id != id);
        if store.events.len() == before {
            return Err(RequestError::Status {
                status: StatusCode::NOT_FOUND,
                message: "Failed to delete event".to_string(),
            });
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RequestError> {
        self.record("GET /categories".to_string()).await;
        Ok(self.store().categories.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, RequestError> {
        self.record("GET /users".to_string()).await;
        Ok(self.store().users.clone())
    }

    async fn get_user(&self, id: UserId) -> Result<User, RequestError> {
        self.record(format!("GET /users/{id}")).await;
        let store = self.store();
        store
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| not_found("user"))
    }
}
