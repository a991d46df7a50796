//! The series data model.
//!
//! A [`Series`] is one named, single-day, single-metric, single-dimension-combination
//! sequence of [`DataPoint`]s. Series are built by the importer (`dc_data_loader`),
//! collected in a [`SeriesStore`], and narrowed down for display with [`select_active`].

mod dimensions;
mod series;
mod store;
mod time_zone;

pub use self::dimensions::{DEFAULT_DIMENSION_KEY, DimensionSet};
pub use self::series::{DataPoint, PASTED_SOURCE_LABEL, Series, SeriesId, SourceLabel};
pub use self::store::{SeriesFilter, SeriesStore, select_active};
pub use self::time_zone::{TimeZoneSetting, calendar_date};

/// Re-exports of other crates.
pub mod external {
    pub use jiff;
}
