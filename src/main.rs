use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    routing::{get, post},
    Form, Router,
};
use clap::Parser;
use maud::{html, Markup};
use serde::Deserialize;
use todo_cache::{
    config::Config, confirm::FormConfirmation, controller::TodoApp, db::driver::Db,
    fetcher::RemoteFetcher, models::TodoId, repository::TodoRepository, status::StatusBoard,
};
use tokio::{
    net::TcpListener,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

// === App State ===
#[derive(Debug, Clone)]
struct AppState {
    state: Arc<RwLock<TodoApp>>,
}
impl AppState {
    fn new(app: TodoApp) -> Self {
        Self {
            state: Arc::new(RwLock::new(app)),
        }
    }

    fn from_config(config: &Config) -> Result<Self> {
        let db = Db::new(&config.db_path)?;
        Ok(Self::new(TodoApp::new(
            TodoRepository::new(db, config.storage_key.clone()),
            RemoteFetcher::new(config.api_url.clone(), config.fetch_limit),
            StatusBoard::new(config.status_ttl()),
        )))
    }

    // shared access: renders
    async fn read(&self) -> RwLockReadGuard<'_, TodoApp> {
        self.state.read().await
    }
    // exclusive access: read-modify-write of the stored list
    async fn write(&self) -> RwLockWriteGuard<'_, TodoApp> {
        self.state.write().await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let listener = TcpListener::bind(&config.bind).await?;
    info!(addr = %listener.local_addr()?, db = %config.db_path, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/todos", get(todos))
        .route("/status", get(status))
        .route("/fetch", post(fetch_todos))
        .route("/toggle_todo", post(toggle_todo))
        .route("/remove_todo", post(remove_todo))
        .route("/clear", post(clear_todos))
        .with_state(state)
}

// list fragment plus the status line swapped out-of-band
fn with_status(app: &TodoApp, list: Markup) -> Markup {
    html! {
        (list)
        (app.render_status(true))
    }
}

// === Routes ===
async fn root(State(state): State<AppState>) -> Markup {
    state.read().await.page()
}

async fn todos(State(state): State<AppState>) -> Markup {
    state.read().await.render_todos()
}

async fn status(State(state): State<AppState>) -> Markup {
    state.read().await.render_status(false)
}

// no lock is held while the remote is awaited
async fn fetch_todos(State(state): State<AppState>) -> Markup {
    let fetcher = state.read().await.begin_fetch();
    let fetched = fetcher.fetch_first().await;
    let app = state.write().await;
    let list = app.finish_fetch(fetched);
    with_status(&app, list)
}

#[derive(Deserialize)]
struct ToggleTodo {
    id: TodoId,
    #[serde(default)]
    completed: bool,
}
async fn toggle_todo(
    State(state): State<AppState>,
    Form(ToggleTodo { id, completed }): Form<ToggleTodo>,
) -> Markup {
    let app = state.write().await;
    let list = app.toggle_completed(&id, completed);
    with_status(&app, list)
}

#[derive(Deserialize)]
struct RemoveTodo {
    id: TodoId,
    #[serde(default)]
    confirmed: bool,
}
async fn remove_todo(
    State(state): State<AppState>,
    Form(RemoveTodo { id, confirmed }): Form<RemoveTodo>,
) -> Markup {
    let app = state.write().await;
    let list = app.delete_todo(&id, &FormConfirmation { confirmed });
    with_status(&app, list)
}

async fn clear_todos(
    State(state): State<AppState>,
    Form(confirmation): Form<FormConfirmation>,
) -> Markup {
    let app = state.write().await;
    let list = app.clear_all(&confirmation);
    with_status(&app, list)
}

// Tests
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Json,
    };
    use serde_json::json;
    use todo_cache::models::Todo;
    use tokio::{sync::Notify, time::timeout};
    use tower::ServiceExt;

    use super::*;

    // serve `remote` on an ephemeral port and return the url of its `/todos`
    async fn serve(remote: Router) -> Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, remote).await });
        Ok(format!("http://{addr}/todos"))
    }

    // remote collection of `n` todos
    async fn serve_source(n: u64) -> Result<String> {
        let body: Vec<_> = (1..=n)
            .map(|i| json!({ "id": i, "title": format!("todo {i}"), "completed": false }))
            .collect();
        serve(Router::new().route("/todos", get(move || async move { Json(body) }))).await
    }

    // remote that accepts the request and never answers
    async fn serve_stalled(started: Arc<Notify>) -> Result<String> {
        serve(Router::new().route(
            "/todos",
            get(move || {
                let started = started.clone();
                async move {
                    started.notify_one();
                    std::future::pending::<Json<Vec<serde_json::Value>>>().await
                }
            }),
        ))
        .await
    }

    async fn setup(url: &str, todos: &[Todo]) -> Result<AppState> {
        let repo = TodoRepository::new(Db::temporary()?, "todos");
        repo.save(todos)?;
        Ok(AppState::new(TodoApp::new(
            repo,
            RemoteFetcher::new(url, 20),
            StatusBoard::new(Duration::from_secs(3)),
        )))
    }

    fn form(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(state: &AppState, req: Request<Body>) -> Result<(StatusCode, String)> {
        let res = router(state.clone()).oneshot(req).await?;
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
        Ok((status, String::from_utf8(body.to_vec())?))
    }

    #[tokio::test]
    async fn test_root_renders_page() -> Result<()> {
        let state = setup("http://127.0.0.1:9", &[Todo::new(1, "A", false)]).await?;
        let (code, body) = send(&state, get_req("/")).await?;
        assert_eq!(code, StatusCode::OK);
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains(r#"data-id="1""#));
        Ok(())
    }

    #[tokio::test]
    async fn test_todos_empty() -> Result<()> {
        let state = setup("http://127.0.0.1:9", &[]).await?;
        let (code, body) = send(&state, get_req("/todos")).await?;
        assert_eq!(code, StatusCode::OK);
        assert!(body.contains(r#"style="display: block""#));
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_route() -> Result<()> {
        let state = setup("http://127.0.0.1:9", &[Todo::new(1, "A", false)]).await?;
        let (code, body) = send(&state, form("/toggle_todo", "id=1&completed=true")).await?;
        assert_eq!(code, StatusCode::OK);
        assert!(body.contains("Mark Incomplete"));
        assert!(state.read().await.repo().load()[0].completed);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_requires_confirmation() -> Result<()> {
        let state = setup("http://127.0.0.1:9", &[Todo::new(1, "A", false)]).await?;
        send(&state, form("/remove_todo", "id=1")).await?;
        assert_eq!(state.read().await.repo().load().len(), 1);

        let (_, body) = send(&state, form("/remove_todo", "id=1&confirmed=true")).await?;
        assert!(state.read().await.repo().load().is_empty());
        assert!(body.contains("Todo deleted."));
        assert!(body.contains(r#"hx-swap-oob="true""#));
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_route() -> Result<()> {
        let state = setup("http://127.0.0.1:9", &[Todo::new(1, "A", false)]).await?;
        send(&state, form("/clear", "confirmed=true")).await?;
        assert!(state.read().await.repo().load().is_empty());
        let (_, body) = send(&state, get_req("/status")).await?;
        assert!(body.contains("Stored todos cleared."));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_route() -> Result<()> {
        let url = serve_source(50).await?;
        let state = setup(&url, &[]).await?;
        let (code, body) = send(&state, form("/fetch", "")).await?;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.matches("<li").count(), 20);
        assert_eq!(state.read().await.repo().load().len(), 20);
        Ok(())
    }

    #[tokio::test]
    async fn test_pending_fetch_does_not_block_other_routes() -> Result<()> {
        let started = Arc::new(Notify::new());
        let url = serve_stalled(started.clone()).await?;
        let state = setup(&url, &[Todo::new(1, "A", false)]).await?;

        let fetch = tokio::spawn({
            let state = state.clone();
            async move { send(&state, form("/fetch", "")).await }
        });
        started.notified().await;

        let (code, _) = timeout(
            Duration::from_secs(5),
            send(&state, form("/toggle_todo", "id=1&completed=true")),
        )
        .await??;
        assert_eq!(code, StatusCode::OK);
        assert!(state.read().await.repo().load()[0].completed);

        let (_, body) = timeout(Duration::from_secs(5), send(&state, get_req("/status"))).await??;
        assert!(body.contains("Fetching todos from API..."));

        fetch.abort();
        Ok(())
    }
}
