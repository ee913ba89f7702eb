use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("artifact function name is empty")]
    EmptyFunctionName,
    #[error("artifact '{function}' has an empty command stream")]
    EmptyCommandStream { function: String },
    #[error("artifact '{function}' has non-finite scale {scale}")]
    NonFiniteScale { function: String, scale: f64 },
    #[error("artifact '{function}' needs exactly 3 base addresses (input, weight, output), found {found}")]
    BaseAddressCount { function: String, found: usize },
    #[error("artifact '{function}' needs at least 2 zero points (input, weight), found {found}")]
    ZeroPointCount { function: String, found: usize },
    #[error("'{symbol}' is not a valid C identifier")]
    InvalidSymbol { symbol: String },
    #[error("symbol '{symbol}' in '{function}' collides with another generated symbol")]
    SymbolCollision { function: String, symbol: String },
    #[error("function '{function}' is defined by more than one artifact")]
    DuplicateFunction { function: String },
    #[error("can only save to format=c, got '{format}'")]
    UnsupportedFormat { format: String },
    #[error("unknown command word {word:#010x}")]
    UnknownCommand { word: i32 },
    #[error("no command stream for '{function}' found in source")]
    MissingCommandStream { function: String },
    #[error("malformed command stream initializer for '{function}': {reason}")]
    MalformedCommandStream { function: String, reason: String },
    #[error("artifact manifest version '{found}' does not match expected '{expected}'")]
    ManifestVersionMismatch { found: u32, expected: u32 },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type CodegenResult<T> = Result<T, CodegenError>;
