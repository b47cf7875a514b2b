use std::path::PathBuf;
use thiserror::Error;

pub use crate::domain::error::{TreeError, TreeResult};

/// Errors while loading [`TreeOptions`](crate::config::TreeOptions).
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("options file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}
