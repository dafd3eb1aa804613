use miette::Diagnostic;
use thiserror::Error;

use crate::bitmap::BitmapError;

/// Main error type for eightbyeight operations
#[derive(Error, Diagnostic, Debug)]
pub enum SheetError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(eightbyeight::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Failed to load font face {face}")]
    #[diagnostic(
        code(eightbyeight::font),
        help("The embedded Spleen font data could not be parsed")
    )]
    FontLoad { face: String },

    #[error("Bitmap error: {0}")]
    #[diagnostic(code(eightbyeight::bitmap))]
    Bitmap(#[from] BitmapError),

    #[error("Parse error: {message}")]
    #[diagnostic(code(eightbyeight::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(eightbyeight::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Verification failed: {message}")]
    #[diagnostic(code(eightbyeight::verify))]
    Verify {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, SheetError>;
