use thiserror::Error;

use crate::generator::GeneratorError;
use crate::lexicon::LexiconError;
use crate::platform::PlatformError;
use crate::posts::PostError;
use crate::template::TemplateError;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("Generation error: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Post planning error: {0}")]
    Posts(#[from] PostError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

pub type Result<T> = std::result::Result<T, AppError>;
