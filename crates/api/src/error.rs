#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unknown cache strategy: {0} (expected none, partial or full)")]
    InvalidStrategy(String),
    #[error("Unknown phase: {0} (expected early, main or late)")]
    InvalidPhase(String),
}
