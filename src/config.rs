use std::time::Duration;

use clap::Parser;

use crate::fetcher::DEFAULT_API_URL;

/// Caches a remote todo list locally and serves it as an htmx page.
#[derive(Parser, Debug, Clone)]
#[command(name = "todo-cache", version, about, long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "TODO_BIND", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// Directory of the local key-value store
    #[arg(long, env = "TODO_DB_PATH", default_value = "db")]
    pub db_path: String,

    /// Remote collection to fetch todos from
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Key the todo list is stored under
    #[arg(long, env = "TODO_STORAGE_KEY", default_value = "todos")]
    pub storage_key: String,

    /// Number of remote records kept per fetch
    #[arg(long, env = "TODO_FETCH_LIMIT", default_value_t = 20)]
    pub fetch_limit: usize,

    /// Seconds a status message stays visible
    #[arg(long, env = "TODO_STATUS_TTL_SECS", default_value_t = 3)]
    pub status_ttl_secs: u64,
}
impl Config {
    pub fn status_ttl(&self) -> Duration {
        Duration::from_secs(self.status_ttl_secs)
    }
}
