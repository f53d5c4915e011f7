use crate::validation::FormErrors;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("video not found")]
    NotFound,

    #[error("invalid form: {0}")]
    Validation(FormErrors),

    #[error("io error: {0:?}")]
    IO(#[from] std::io::Error),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}
