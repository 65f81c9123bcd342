//! Derived views over worker records
//!
//! - `aggregate`: cross-worker totals and means, group slices, histograms
//! - `chart`: radar and pie geometry for any skill vector

pub mod aggregate;
pub mod chart;

pub use aggregate::{
    aggregate, average, compare, group_slice, group_slices, level_histogram, summarize,
    GroupSlice, OverallSummary,
};
pub use chart::{axis_angle, gridline_radii, pie_fractions, radar_points};
