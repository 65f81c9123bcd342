use anyhow::{Context, Result};
use skillmap_types::{validate_levels, WorkerRecord};
use std::fs;
use std::path::Path;

/// Read a JSON array of `{ "name": ..., "skill_levels": [...] }` objects.
///
/// Names are trimmed; empty names and out-of-range levels reject the file.
pub fn load_seed_file(path: &Path) -> Result<Vec<WorkerRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    parse_seed(&contents).with_context(|| format!("Invalid seed file {}", path.display()))
}

fn parse_seed(contents: &str) -> Result<Vec<WorkerRecord>> {
    let records: Vec<WorkerRecord> = serde_json::from_str(contents)?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| -> Result<WorkerRecord> {
            let name = record.name.trim();
            anyhow::ensure!(!name.is_empty(), "record {} has an empty name", index);
            validate_levels(&record.skill_levels)
                .with_context(|| format!("record {} ('{}')", index, name))?;
            Ok(WorkerRecord::new(name, record.skill_levels))
        })
        .collect()
}
