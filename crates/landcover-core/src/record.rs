//! Validated change-record input boundary.

use serde::{Deserialize, Serialize};

use crate::error::ChangeError;

/// One (start class, end class, period) transition observation from a
/// change-detection product.
///
/// The source does not pre-aggregate: several records may share the same key,
/// and aggregation must sum their counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub start_class: u16,
    pub end_class: u16,
    /// Number of raster cells observed with this transition.
    pub count: u64,
    /// Time-span label, e.g. "2001-2011".
    pub period: String,
}

impl ChangeRecord {
    /// Validate a raw row at the input boundary.
    ///
    /// Class codes must be positive and the period label must parse as
    /// "YYYY-YYYY". Malformed rows are rejected here rather than propagated
    /// into the aggregation.
    pub fn new(
        start_class: u16,
        end_class: u16,
        count: u64,
        period: &str,
    ) -> Result<Self, ChangeError> {
        if start_class == 0 || end_class == 0 {
            return Err(ChangeError::InvalidRecord(format!(
                "class codes must be positive (got {} -> {})",
                start_class, end_class
            )));
        }
        parse_period(period)?;
        Ok(Self {
            start_class,
            end_class,
            count,
            period: period.to_owned(),
        })
    }
}

/// Parse a "YYYY-YYYY" period label into (start year, end year).
pub fn parse_period(label: &str) -> Result<(u16, u16), ChangeError> {
    let malformed = || ChangeError::MalformedPeriod(label.to_owned());
    let (a, b) = label.split_once('-').ok_or_else(malformed)?;
    if a.len() != 4 || b.len() != 4 {
        return Err(malformed());
    }
    let start: u16 = a.parse().map_err(|_| malformed())?;
    let end: u16 = b.parse().map_err(|_| malformed())?;
    if end < start {
        return Err(malformed());
    }
    Ok((start, end))
}
