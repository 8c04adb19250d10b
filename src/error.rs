use thiserror::Error;

pub type Result<T> = std::result::Result<T, TutorError>;

#[derive(Debug, Error)]
pub enum TutorError {
    /// An operation was called in a state that does not allow it,
    /// e.g. completing a session that was never begun.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("unknown lesson: {0}")]
    UnknownLesson(String),

    /// The bundled lesson catalog is missing or unreadable.
    #[error("lesson catalog: {0}")]
    Catalog(String),

    #[error("config io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config format: {0}")]
    Config(#[from] serde_json::Error),
}
