//! Access to the external REST data service.
//!
//! [`RestGateway`] speaks the generic resource contract (`list`, `get`,
//! `create`, `update`, `delete`). Views and flows only see the typed
//! [`Gateway`] trait so they can run against any implementation.

use async_trait::async_trait;

use crate::models::{Category, Event, EventId, NewEvent, User, UserId};

pub mod error;
pub mod rest;

pub use error::RequestError;
pub use rest::RestGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Events,
    Categories,
    Users,
}

impl Resource {
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Categories => "categories",
            Self::Users => "users",
        }
    }

    /// Singular noun used in failure messages, e.g. "Failed to fetch event".
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::Events => "event",
            Self::Categories => "category",
            Self::Users => "user",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, RequestError>;
    async fn get_event(&self, id: EventId) -> Result<Event, RequestError>;
    async fn create_event(&self, draft: &NewEvent) -> Result<Event, RequestError>;
    async fn update_event(&self, event: &Event) -> Result<Event, RequestError>;
    async fn delete_event(&self, id: EventId) -> Result<(), RequestError>;
    async fn list_categories(&self) -> Result<Vec<Category>, RequestError>;
    async fn list_users(&self) -> Result<Vec<User>, RequestError>;
    async fn get_user(&self, id: UserId) -> Result<User, RequestError>;
}
