use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("assistant error: {0}")]
    Assistant(#[from] assistant::AssistantError),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("report error: {0}")]
    Csv(#[from] csv::Error),
    #[error("store error: {0}")]
    Engine(#[from] engine::EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
