//! Land-cover change aggregation over NLCD-style classification tables.
//!
//! Three pure transformations over in-memory tables: class normalization,
//! gain/loss aggregation relative to a class-of-interest set, and
//! year-over-year percent-change computation. Raster processing, geodatabase
//! access, and chart rendering live outside this crate; it consumes
//! already-loaded rows and produces summary tables plus the label/color
//! mappings a renderer needs.

pub mod change;
pub mod error;
pub mod normalize;
pub mod record;
pub mod taxonomy;
pub mod timeseries;

pub use change::{
    aggregate, net, ChangeConfig, ChangeSummaryRow, Direction, NetChangeRow, PeriodSpan,
    CELL_AREA_AC, CELL_AREA_HA,
};
pub use error::ChangeError;
pub use normalize::Remap;
pub use record::{parse_period, ChangeRecord};
pub use taxonomy::CoarseClass;
pub use timeseries::{
    class_trends, melt, signed_pct_label, year_from_column, AreaObservation, ClassTrend,
    WideAreaRow,
};
