/// Kanban API access
///
/// [`BoardApi`] is the contract the store talks to; [`HttpBoardApi`] is its
/// `reqwest` implementation. Request bodies are the validated request types
/// from `kanban_shared::validation::requests`, so the client serializes
/// exactly what the server deserializes.
///
/// # Example
///
/// ```no_run
/// use kanban_client::api::{BoardApi, HttpBoardApi};
///
/// # async fn example() -> kanban_client::error::ClientResult<()> {
/// let api = HttpBoardApi::new("http://localhost:5100");
/// for board in api.list_boards().await? {
///     println!("{} ({} columns)", board.name, board.columns.len());
/// }
/// # Ok(())
/// # }
/// ```

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use kanban_shared::{
    models::{board::Board, column::Column, subtask::Subtask, task::Task},
    validation::{
        requests::{
            CreateBoardRequest, CreateColumnRequest, CreateTaskRequest, UpdateBoardRequest,
            UpdateColumnRequest, UpdateSubtaskRequest, UpdateTaskRequest,
        },
        FieldViolation,
    },
};
use reqwest::{Method, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// Operations the kanban API offers
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn list_boards(&self) -> ClientResult<Vec<Board>>;

    async fn get_board(&self, id: Uuid) -> ClientResult<Board>;

    async fn create_board(&self, req: &CreateBoardRequest) -> ClientResult<Board>;

    async fn update_board(&self, id: Uuid, req: &UpdateBoardRequest) -> ClientResult<Board>;

    async fn delete_board(&self, id: Uuid) -> ClientResult<()>;

    async fn create_column(&self, req: &CreateColumnRequest) -> ClientResult<Column>;

    async fn update_column(&self, id: Uuid, req: &UpdateColumnRequest) -> ClientResult<Column>;

    async fn delete_column(&self, id: Uuid) -> ClientResult<()>;

    async fn get_task(&self, id: Uuid) -> ClientResult<Task>;

    async fn create_task(&self, req: &CreateTaskRequest) -> ClientResult<Task>;

    async fn update_task(&self, id: Uuid, req: &UpdateTaskRequest) -> ClientResult<Task>;

    async fn delete_task(&self, id: Uuid) -> ClientResult<()>;

    async fn update_subtask(&self, id: Uuid, req: &UpdateSubtaskRequest) -> ClientResult<Subtask>;

    async fn delete_subtask(&self, id: Uuid) -> ClientResult<()>;
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Vec<FieldViolation>,
}

/// `BoardApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpBoardApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBoardApi {
    /// `base_url` is the server root, e.g. `http://localhost:5100`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Response> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        check_status(response).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Ok(response.json().await?)
    }

    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(method, path, Some(body)).await?;
        Ok(response.json().await?)
    }

    async fn remove(&self, path: &str) -> ClientResult<()> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }
}

/// Turns an error status into [`ClientError::Api`], keeping the server's
/// message when the body has one
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let (message, details) = match response.json::<ErrorBody>().await {
        Ok(body) => (body.error, body.details),
        Err(_) => (format!("Request failed with status {}", status), Vec::new()),
    };

    tracing::warn!(status = status.as_u16(), "API error: {}", message);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
        details,
    })
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn list_boards(&self) -> ClientResult<Vec<Board>> {
        self.fetch("/boards").await
    }

    async fn get_board(&self, id: Uuid) -> ClientResult<Board> {
        self.fetch(&format!("/boards/{}", id)).await
    }

    async fn create_board(&self, req: &CreateBoardRequest) -> ClientResult<Board> {
        self.write(Method::POST, "/boards", req).await
    }

    async fn update_board(&self, id: Uuid, req: &UpdateBoardRequest) -> ClientResult<Board> {
        self.write(Method::PUT, &format!("/boards/{}", id), req).await
    }

    async fn delete_board(&self, id: Uuid) -> ClientResult<()> {
        self.remove(&format!("/boards/{}", id)).await
    }

    async fn create_column(&self, req: &CreateColumnRequest) -> ClientResult<Column> {
        self.write(Method::POST, "/columns", req).await
    }

    async fn update_column(&self, id: Uuid, req: &UpdateColumnRequest) -> ClientResult<Column> {
        self.write(Method::PUT, &format!("/columns/{}", id), req).await
    }

    async fn delete_column(&self, id: Uuid) -> ClientResult<()> {
        self.remove(&format!("/columns/{}", id)).await
    }

    async fn get_task(&self, id: Uuid) -> ClientResult<Task> {
        self.fetch(&format!("/tasks/{}", id)).await
    }

    async fn create_task(&self, req: &CreateTaskRequest) -> ClientResult<Task> {
        self.write(Method::POST, "/tasks", req).await
    }

    async fn update_task(&self, id: Uuid, req: &UpdateTaskRequest) -> ClientResult<Task> {
        self.write(Method::PUT, &format!("/tasks/{}", id), req).await
    }

    async fn delete_task(&self, id: Uuid) -> ClientResult<()> {
        self.remove(&format!("/tasks/{}", id)).await
    }

    async fn update_subtask(&self, id: Uuid, req: &UpdateSubtaskRequest) -> ClientResult<Subtask> {
        self.write(Method::PUT, &format!("/subtasks/{}", id), req).await
    }

    async fn delete_subtask(&self, id: Uuid) -> ClientResult<()> {
        self.remove(&format!("/subtasks/{}", id)).await
    }
}
