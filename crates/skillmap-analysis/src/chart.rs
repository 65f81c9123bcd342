//! Chart geometry: radar polygons and pie wedges

use crate::aggregate::level_histogram;
use skillmap_types::{reconcile, SkillError, SkillLevel, MAX_LEVEL};
use std::f64::consts::TAU;

/// Number of concentric gridlines drawn inside a radar chart
pub const GRIDLINES: usize = 4;

/// Angle of axis `index` out of `count`, in radians.
/// Zero points straight up and angles grow clockwise.
pub fn axis_angle(index: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    TAU * index as f64 / count as f64
}

/// Project a skill vector onto a radar chart centred on the origin (y up).
///
/// The vector is reconciled to `category_count` first. Each level sits at
/// `radius * level / MAX_LEVEL` along its axis. The polygon is closed: the
/// first point is repeated at the end.
pub fn radar_points(levels: &[SkillLevel], category_count: usize, radius: f64) -> Vec<(f64, f64)> {
    let levels = reconcile(levels, category_count);
    let mut points: Vec<(f64, f64)> = levels
        .iter()
        .enumerate()
        .map(|(index, &level)| {
            let distance = radius * f64::from(level) / f64::from(MAX_LEVEL);
            let angle = axis_angle(index, category_count);
            (distance * angle.sin(), distance * angle.cos())
        })
        .collect();

    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

/// Radii of the gridline rings, innermost first
pub fn gridline_radii(radius: f64) -> [f64; GRIDLINES] {
    std::array::from_fn(|i| radius * (i + 1) as f64 / GRIDLINES as f64)
}

/// Pie wedges for the levels present in `levels`, ascending by level.
/// Levels that never occur get no wedge at all.
pub fn pie_fractions(levels: &[SkillLevel]) -> Result<Vec<(String, f64)>, SkillError> {
    let histogram = level_histogram(levels)?;
    let total: usize = histogram.values().sum();

    Ok(histogram
        .into_iter()
        .map(|(level, count)| (format!("Level {}", level), count as f64 / total as f64))
        .collect())
}
