use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::ApiErrorBody;
use crate::mapper::RawIdea;
use crate::models::{DeleteResponse, Id, Idea, IdeaStatus, NewIdea, UpdateIdea};

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")] Transport(#[from] reqwest::Error),
    #[error("{message}")] Api { status: u16, message: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Operations the dashboard needs from the ideas API.
#[async_trait]
pub trait IdeaApi: Send + Sync {
    async fn list_ideas(&self) -> ClientResult<Vec<Idea>>;
    async fn get_idea(&self, id: Id) -> ClientResult<Idea>;
    async fn create_idea(&self, draft: &NewIdea) -> ClientResult<Idea>;
    async fn update_idea(&self, id: Id, upd: &UpdateIdea) -> ClientResult<Idea>;
    async fn update_status(&self, id: Id, status: IdeaStatus) -> ClientResult<Idea>;
    async fn delete_idea(&self, id: Id) -> ClientResult<()>;
}

/// HTTP client for `/api/ideas`. Every idea in a response is passed through
/// the lenient mapper before it reaches the caller.
#[derive(Clone)]
pub struct IdeasClient {
    http: Client,
    base_url: String,
}

impl IdeasClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/api/ideas{}", self.base_url, suffix)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ClientError::Api { status: status.as_u16(), message: error_message(status, &text) });
        }
        Ok(res.json::<T>().await?)
    }

    async fn send_idea(&self, req: RequestBuilder) -> ClientResult<Idea> {
        self.send::<RawIdea>(req).await.map(Idea::from)
    }
}

/// Prefer the server's `{"error": ..}` message, then the raw body, then the
/// status line.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(ApiErrorBody { error }) = serde_json::from_str::<ApiErrorBody>(body) {
        if !error.is_empty() {
            return error;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        body.to_string()
    }
}

#[async_trait]
impl IdeaApi for IdeasClient {
    async fn list_ideas(&self) -> ClientResult<Vec<Idea>> {
        let rows: Vec<RawIdea> = self.send(self.http.get(self.url(""))).await?;
        Ok(rows.into_iter().map(Idea::from).collect())
    }

    async fn get_idea(&self, id: Id) -> ClientResult<Idea> {
        self.send_idea(self.http.get(self.url(&format!("/{id}")))).await
    }

    async fn create_idea(&self, draft: &NewIdea) -> ClientResult<Idea> {
        self.send_idea(self.http.post(self.url("")).json(draft)).await
    }

    async fn update_idea(&self, id: Id, upd: &UpdateIdea) -> ClientResult<Idea> {
        self.send_idea(self.http.put(self.url(&format!("/{id}"))).json(upd)).await
    }

    async fn update_status(&self, id: Id, status: IdeaStatus) -> ClientResult<Idea> {
        let body = json!({ "status": status.code() });
        self.send_idea(self.http.patch(self.url(&format!("/{id}/status"))).json(&body)).await
    }

    async fn delete_idea(&self, id: Id) -> ClientResult<()> {
        let _: DeleteResponse = self.send(self.http.delete(self.url(&format!("/{id}")))).await?;
        Ok(())
    }
}
