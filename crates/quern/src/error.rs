//! Error taxonomy
//!
//! Every failure is raised synchronously at the violating call; nothing
//! is deferred into a timer callback.

/// Quern error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Empty or unparseable selector at construction
    #[error("cannot resolve a selection without a valid selector")]
    InvalidSelector,

    /// Wrong shape for a parameter with a declared expected type
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Offset requested for an axis other than "left"/"top"
    #[error("offset axis must be \"left\" or \"top\", got {0:?}")]
    InvalidOffsetAxis(String),
}
