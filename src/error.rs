use thiserror::Error;

/// Errors raised while assigning colors or feeding a statistics view.
#[derive(Debug, Error)]
pub enum Error {
    /// A reserved impassable name was used on the ordinary color path.
    #[error("illegal entity name {name:?}, use `impassable_color()` instead")]
    ReservedName { name: String },
    /// A configured color is not a 6 digit hex number.
    #[error("colors must be 6 digit hex numbers without a leading '#', \
             e.g. FF0011, not {value:?}: {reason} at position {position}")]
    InvalidColor {
        value: String,
        position: usize,
        reason: &'static str,
    },
    /// The aggregation result was delivered more than once.
    #[error("statistics aggregation already delivered")]
    AlreadyComplete,
    #[error("cannot start the statistics aggregation: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Properties { line: usize, reason: &'static str },
    #[error("color configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
