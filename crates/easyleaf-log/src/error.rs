use thiserror::Error;

/// Why a rule match was dropped instead of becoming a record.
///
/// None of these abort a parse: the parser logs them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("extracted message is empty")]
    EmptyMessage,

    #[error("line number `{0}` does not fit in u32")]
    LineOutOfRange(String),

    #[error("rule panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parser config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{field}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}
