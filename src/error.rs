use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimrError {
    #[error("unknown report sink `{0}` (expected `stderr` or `tracing`)")]
    UnknownSink(String),

    #[error("invalid report precision `{0}` (expected 0..=17 or `full`, where 0 and `full` mean full precision)")]
    InvalidPrecision(String),
}

pub type Result<T> = std::result::Result<T, TimrError>;
