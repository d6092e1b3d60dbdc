use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Core(#[from] sudodle_core::CoreError),
}
