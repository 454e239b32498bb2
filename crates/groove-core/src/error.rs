use thiserror::Error;

/// Rejected engine configuration. Fatal at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("gesture alphabet is empty")]
    EmptyGestureAlphabet,

    #[error("gesture listed twice: {0}")]
    DuplicateGesture(String),

    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: i64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("perfect window ({perfect_ms}ms) must be narrower than good window ({good_ms}ms)")]
    WindowOrder { perfect_ms: i64, good_ms: i64 },

    #[error("target zone fraction must be in (0, 1] (got {0})")]
    TargetFraction(f64),

    #[error("purge factor must be positive (got {0})")]
    PurgeFactor(f64),

    #[error("notes would be purged at {purge_age_ms}ms, before their miss line at {miss_line_ms}ms")]
    PurgeBeforeMissLine { purge_age_ms: i64, miss_line_ms: i64 },

    #[error("{0} does not fit in a millisecond timestamp")]
    OutOfRange(&'static str),
}

/// Malformed session script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: command at {at_ms}ms is earlier than the previous one ({previous_ms}ms)")]
    OutOfOrder {
        line: usize,
        at_ms: i64,
        previous_ms: i64,
    },
}
