use thiserror::Error;

/// Failures of the remote fetch and of writes to the todo store.
///
/// These never reach an HTTP response as an error; the controller turns them
/// into a status message.
#[derive(Error, Debug)]
pub enum TodoError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Network response was not ok ({0})")]
    BadStatus(reqwest::StatusCode),

    #[error("response is not a JSON array")]
    NotAnArray,

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type TodoResult<T> = std::result::Result<T, TodoError>;
