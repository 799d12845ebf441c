use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{Gateway, RequestError, Resource};
use crate::models::{Category, Event, EventId, NewEvent, User, UserId};

#[derive(Debug, Clone)]
pub struct RestGateway {
    base_url: String,
    client: reqwest::Client,
}

impl RestGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }

    fn item_url(&self, resource: Resource, id: i64) -> String {
        format!("{}/{}/{}", self.base_url, resource.path(), id)
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
    ) -> Result<Vec<T>, RequestError> {
        let url = self.collection_url(resource);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        read_json(resource, "fetch", response).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: i64,
    ) -> Result<T, RequestError> {
        let url = self.item_url(resource, id);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        read_json(resource, "fetch", response).await
    }

    pub async fn create<P, T>(&self, resource: Resource, payload: &P) -> Result<T, RequestError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.collection_url(resource);
        debug!(%url, "POST");
        let response = self.client.post(&url).json(payload).send().await?;
        read_json(resource, "create", response).await
    }

    pub async fn update<P, T>(
        &self,
        resource: Resource,
        id: i64,
        payload: &P,
    ) -> Result<T, RequestError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.item_url(resource, id);
        debug!(%url, "PUT");
        let response = self.client.put(&url).json(payload).send().await?;
        read_json(resource, "update", response).await
    }

    pub async fn delete(&self, resource: Resource, id: i64) -> Result<(), RequestError> {
        let url = self.item_url(resource, id);
        debug!(%url, "DELETE");
        let response = self.client.delete(&url).send().await?;
        ensure_success(resource, "delete", response).await?;
        Ok(())
    }
}

async fn ensure_success(
    resource: Resource,
    action: &str,
    response: Response,
) -> Result<Response, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(%resource, %status, body = %body, "data service call failed");
    Err(RequestError::Status {
        status,
        message: format!("Failed to {action} {}", resource.noun()),
    })
}

async fn read_json<T: DeserializeOwned>(
    resource: Resource,
    action: &str,
    response: Response,
) -> Result<T, RequestError> {
    let response = ensure_success(resource, action, response).await?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl Gateway for RestGateway {
    async fn list_events(&self) -> Result<Vec<Event>, RequestError> {
        self.list(Resource::Events).await
    }

    async fn get_event(&self, id: EventId) -> Result<Event, RequestError> {
        self.get(Resource::Events, id).await
    }

    async fn create_event(&self, draft: &NewEvent) -> Result<Event, RequestError> {
        self.create(Resource::Events, draft).await
    }

    async fn update_event(&self, event: &Event) -> Result<Event, RequestError> {
        self.update(Resource::Events, event.id, event).await
    }

    async fn delete_event(&self, id: EventId) -> Result<(), RequestError> {
        self.delete(Resource::Events, id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RequestError> {
        self.list(Resource::Categories).await
    }

    async fn list_users(&self) -> Result<Vec<User>, RequestError> {
        self.list(Resource::Users).await
    }

    async fn get_user(&self, id: UserId) -> Result<User, RequestError> {
        self.get(Resource::Users, id).await
    }
}
