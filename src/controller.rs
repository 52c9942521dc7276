use maud::Markup;
use tracing::{error, info, warn};

use crate::{
    confirm::Confirm,
    error::TodoResult,
    fetcher::RemoteFetcher,
    models::{Todo, TodoId},
    repository::TodoRepository,
    status::StatusBoard,
    views::{self, CLEAR_PROMPT, DELETE_PROMPT},
};

/// The todo operations, each ending in a fresh render of the stored list.
#[derive(Debug)]
pub struct TodoApp {
    repo: TodoRepository,
    fetcher: RemoteFetcher,
    status: StatusBoard,
}
impl TodoApp {
    pub fn new(repo: TodoRepository, fetcher: RemoteFetcher, status: StatusBoard) -> Self {
        Self {
            repo,
            fetcher,
            status,
        }
    }

    pub fn repo(&self) -> &TodoRepository {
        &self.repo
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn page(&self) -> Markup {
        views::page(
            &self.repo.load(),
            self.status.current().as_ref(),
            self.fetcher.limit(),
        )
    }

    pub fn render_todos(&self) -> Markup {
        views::todos_html(&self.repo.load())
    }

    pub fn render_status(&self, oob: bool) -> Markup {
        views::status_html(self.status.current().as_ref(), oob)
    }

    /// Replace the stored list with the head of the remote collection.
    ///
    /// Convenience for callers that own the app outright. Shared callers run
    /// the three phases themselves so no lock is held across the network call.
    pub async fn fetch_and_store_first20(&self) -> Markup {
        let fetcher = self.begin_fetch();
        let fetched = fetcher.fetch_first().await;
        self.finish_fetch(fetched)
    }

    /// Announce the fetch and hand out the fetcher to run it.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime (see [`StatusBoard::set`]).
    pub fn begin_fetch(&self) -> RemoteFetcher {
        self.status.info("Fetching todos from API...");
        self.fetcher.clone()
    }

    /// Store a fetch result, replacing the stored list on success. Storage is
    /// left untouched on failure.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime (see [`StatusBoard::set`]).
    pub fn finish_fetch(&self, fetched: TodoResult<Vec<Todo>>) -> Markup {
        match fetched.and_then(|todos| self.store_fetched(&todos)) {
            Ok(count) => {
                info!(count, "replaced stored todos");
                self.status.info(format!(
                    "Saved first {} todos to storage.",
                    self.fetcher.limit()
                ));
            }
            Err(err) => {
                error!(error = %err, "fetch failed");
                self.status.error(format!("Failed to fetch todos: {err}"));
            }
        }
        self.render_todos()
    }

    fn store_fetched(&self, todos: &[Todo]) -> TodoResult<usize> {
        self.repo.save(todos)?;
        Ok(todos.len())
    }

    /// Set `completed` on the first todo with a matching id.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime (see [`StatusBoard::set`]).
    pub fn toggle_completed(&self, id: &TodoId, completed: bool) -> Markup {
        let mut todos = self.repo.load();
        match find(&mut todos, id) {
            Some(todo) => {
                todo.completed = completed;
                self.save(&todos);
            }
            None => {
                warn!(%id, "toggle target not found");
                self.status.error("Todo not found");
            }
        }
        self.render_todos()
    }

    /// Remove the first todo with a matching id once the user confirms. The
    /// id is looked up before the port is asked.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime (see [`StatusBoard::set`]).
    pub fn delete_todo(&self, id: &TodoId, confirm: &dyn Confirm) -> Markup {
        let mut todos = self.repo.load();
        let Some(idx) = todos.iter().position(|t| &t.id == id) else {
            warn!(%id, "delete target not found");
            self.status.error("Todo not found");
            return self.render_todos();
        };
        if !confirm.confirm(DELETE_PROMPT) {
            info!(%id, "delete declined");
            return self.render_todos();
        }

        todos.remove(idx);
        if self.save(&todos) {
            self.status.info("Todo deleted.");
        }
        self.render_todos()
    }

    /// Drop the stored list once the user confirms.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime (see [`StatusBoard::set`]).
    pub fn clear_all(&self, confirm: &dyn Confirm) -> Markup {
        if !confirm.confirm(CLEAR_PROMPT) {
            info!("clear declined");
            return self.render_todos();
        }
        match self.repo.clear() {
            Ok(()) => self.status.info("Stored todos cleared."),
            Err(err) => {
                error!(error = %err, "failed to clear todos");
                self.status.error(format!("Failed to clear todos: {err}"));
            }
        }
        self.render_todos()
    }

    // write failures end up on the status line
    fn save(&self, todos: &[Todo]) -> bool {
        match self.repo.save(todos) {
            Ok(()) => true,
            Err(err) => {
                error!(error = %err, "failed to save todos");
                self.status.error(format!("Failed to save todos: {err}"));
                false
            }
        }
    }
}

fn find<'a>(todos: &'a mut [Todo], id: &TodoId) -> Option<&'a mut Todo> {
    todos.iter_mut().find(|t| &t.id == id)
}
