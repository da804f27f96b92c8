//! Pure presentation helpers for the sales dashboard: display formatting,
//! NaN-tolerant aggregates, client-side order table state and chart geometry.
//!
//! Nothing in this crate performs I/O and no function panics on odd input.

pub mod aggregate;
pub mod chart;
pub mod format;
pub mod table;

pub use aggregate::{safe_average, safe_max, safe_min, safe_sum};
pub use format::{
    format_compact_number, format_currency, format_date, format_number, format_percent,
};
