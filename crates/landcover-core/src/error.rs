//! Error types for the aggregation pipeline.

use thiserror::Error;

use crate::taxonomy::CoarseClass;

/// Configuration and input-boundary errors.
///
/// Only genuine mismatches are errors. Filters that retain nothing produce an
/// empty table, and a zero prior-year area in percent-change math produces a
/// `None` cell; neither path returns a `ChangeError`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChangeError {
    /// A summary row's category is missing from the configured display order.
    #[error("category {0} is not in the configured category order")]
    UnknownCategory(CoarseClass),

    /// A summary row's period is missing from the configured period order.
    #[error("period {0:?} is not in the configured period order")]
    UnknownPeriod(String),

    #[error("malformed period label {0:?} (expected \"YYYY-YYYY\")")]
    MalformedPeriod(String),

    #[error("invalid change record: {0}")]
    InvalidRecord(String),
}
