use serde_json::Value;
use tracing::info;

use crate::{
    error::{TodoError, TodoResult},
    models::Todo,
};

pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/todos";

/// Reads the remote todo collection and projects its head.
#[derive(Debug, Clone)]
pub struct RemoteFetcher {
    client: reqwest::Client,
    url: String,
    limit: usize,
}
impl RemoteFetcher {
    pub fn new(url: impl Into<String>, limit: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// One GET against the configured URL, keeping at most `limit` records.
    pub async fn fetch_first(&self) -> TodoResult<Vec<Todo>> {
        let res = self.client.get(&self.url).send().await?;
        if !res.status().is_success() {
            return Err(TodoError::BadStatus(res.status()));
        }
        let body: Value = res.json().await?;
        let todos = project_first(&body, self.limit)?;
        info!(url = %self.url, count = todos.len(), "fetched todos");
        Ok(todos)
    }
}

/// Project the first `limit` elements of a JSON array.
pub fn project_first(body: &Value, limit: usize) -> TodoResult<Vec<Todo>> {
    let records = body.as_array().ok_or(TodoError::NotAnArray)?;
    Ok(records.iter().take(limit).map(Todo::project).collect())
}
