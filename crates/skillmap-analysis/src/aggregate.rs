//! Cross-worker aggregates and per-group views of a skill vector

use serde::Serialize;
use skillmap_types::{
    reconcile, validate_level, SkillError, SkillLevel, Taxonomy, WorkerRecord,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-category sum over all records.
///
/// Only indices below `category_count` are summed; a record shorter than that
/// contributes nothing at the missing positions.
pub fn aggregate(records: &[WorkerRecord], category_count: usize) -> Vec<u32> {
    let mut totals = vec![0u32; category_count];
    for record in records {
        for (total, &level) in totals.iter_mut().zip(&record.skill_levels) {
            *total += u32::from(level);
        }
    }
    totals
}

/// Per-category mean over all records, all zeros when there are none
pub fn average(records: &[WorkerRecord], category_count: usize) -> Vec<f64> {
    if records.is_empty() {
        return vec![0.0; category_count];
    }
    let count = records.len() as f64;
    aggregate(records, category_count)
        .into_iter()
        .map(|total| f64::from(total) / count)
        .collect()
}

/// `full[start..start + length]`, padded with the minimum level when short
pub fn group_slice(full: &[SkillLevel], start: usize, length: usize) -> Vec<SkillLevel> {
    reconcile(full.get(start..).unwrap_or_default(), length)
}

/// One group's share of a worker's skill vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSlice {
    pub group: String,
    pub categories: Vec<String>,
    pub levels: Vec<SkillLevel>,
}

/// Split a skill vector into its group slices, in taxonomy order
pub fn group_slices(levels: &[SkillLevel], taxonomy: &Taxonomy) -> Vec<GroupSlice> {
    taxonomy
        .group_ranges()
        .map(|(group, range)| GroupSlice {
            group: group.name.clone(),
            categories: group.categories.clone(),
            levels: group_slice(levels, range.start, range.len()),
        })
        .collect()
}

/// Count occurrences of each level. Levels that never occur are absent.
pub fn level_histogram(levels: &[SkillLevel]) -> Result<BTreeMap<SkillLevel, usize>, SkillError> {
    let mut histogram = BTreeMap::new();
    for &level in levels {
        *histogram.entry(validate_level(level)?).or_insert(0) += 1;
    }
    Ok(histogram)
}

/// Reconciled vectors for the named workers, in the order requested.
/// Names with no matching record are skipped.
pub fn compare(records: &[WorkerRecord], names: &[String], taxonomy: &Taxonomy) -> Vec<WorkerRecord> {
    names
        .iter()
        .filter_map(|name| {
            let found = records.iter().find(|record| &record.name == name);
            if found.is_none() {
                debug!("Comparison skips unknown worker '{}'", name);
            }
            found.map(|record| record.reconciled(taxonomy))
        })
        .collect()
}

/// The overall view: totals and means across every worker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    pub worker_count: usize,
    pub categories: Vec<String>,
    pub totals: Vec<u32>,
    pub averages: Vec<f64>,
}

pub fn summarize(records: &[WorkerRecord], taxonomy: &Taxonomy) -> OverallSummary {
    let count = taxonomy.category_count();
    OverallSummary {
        worker_count: records.len(),
        categories: taxonomy.flattened().to_vec(),
        totals: aggregate(records, count),
        averages: average(records, count),
    }
}
