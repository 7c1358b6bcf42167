use thiserror::Error;

/// Errors raised while computing positions or validating a reorder batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error("Unknown reorder type '{0}'. Allowed: items, groups")]
    UnknownKind(String),

    #[error("Entity '{0}' appears more than once in the reorder payload")]
    DuplicateEntity(String),

    #[error("No position left after the maximum in {0}")]
    PositionOverflow(String),
}
