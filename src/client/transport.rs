use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use super::error::ClientError;
use crate::domain::request::{CreateTaskRequest, DeleteResponse, UpdateTaskRequest};
use crate::domain::task::{Task, TaskId};

/// The REST surface as seen from the client.
#[async_trait]
pub trait TaskTransport: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Task>, ClientError>;
    async fn get(&self, id: &TaskId) -> Result<Task, ClientError>;
    async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ClientError>;
    async fn update(&self, id: &TaskId, request: &UpdateTaskRequest) -> Result<Task, ClientError>;
    async fn delete(&self, id: &TaskId) -> Result<DeleteResponse, ClientError>;
}

#[derive(Clone)]
pub struct HttpTaskTransport {
    client: Client,
    base_url: String,
}

impl HttpTaskTransport {
    /// `base_url` points at the API root, e.g. `http://127.0.0.1:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(ClientError::Status { status, body: String::from_utf8_lossy(&body).into_owned() });
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::Parsing(e.to_string()))
    }
}

#[async_trait]
impl TaskTransport for HttpTaskTransport {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        self.send(self.request(Method::GET, "/tasks")).await
    }

    async fn get(&self, id: &TaskId) -> Result<Task, ClientError> {
        self.send(self.request(Method::GET, &format!("/tasks/{id}"))).await
    }

    async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ClientError> {
        self.send(self.request(Method::POST, "/tasks").json(request)).await
    }

    async fn update(&self, id: &TaskId, request: &UpdateTaskRequest) -> Result<Task, ClientError> {
        self.send(self.request(Method::PUT, &format!("/tasks/{id}")).json(request)).await
    }

    async fn delete(&self, id: &TaskId) -> Result<DeleteResponse, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/tasks/{id}"))).await
    }
}
