//! Draft-record editing.
//!
//! The editor keeps an explicit draft of the worker being edited instead of
//! reading values back out of a form. Saving decides between add and update
//! from the current selection.

use crate::service::SkillService;
use skillmap_analysis::group_slice;
use skillmap_persistence::StoreError;
use skillmap_types::{reconcile, validate_level, SkillError, SkillLevel, Taxonomy, WorkerRecord};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Worker name must not be empty")]
    EmptyName,

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What `save` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Added,
    Updated,
}

pub struct WorkerEditor {
    taxonomy: Taxonomy,
    selected: Option<String>,
    draft: WorkerRecord,
    dirty: bool,
}

impl WorkerEditor {
    pub fn new(taxonomy: Taxonomy) -> Self {
        let draft = WorkerRecord::blank(&taxonomy);
        Self {
            taxonomy,
            selected: None,
            draft,
            dirty: false,
        }
    }

    /// Start a fresh worker: no selection, empty name, every level at the minimum
    pub fn new_worker(&mut self) {
        self.selected = None;
        self.draft = WorkerRecord::blank(&self.taxonomy);
        self.dirty = false;
    }

    /// Load an existing worker for editing
    pub fn select(&mut self, record: &WorkerRecord) {
        self.selected = Some(record.name.clone());
        self.draft = record.reconciled(&self.taxonomy);
        self.dirty = false;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn draft(&self) -> &WorkerRecord {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
        self.dirty = true;
    }

    pub fn set_level(&mut self, index: usize, level: SkillLevel) -> Result<(), EditorError> {
        let count = self.draft.skill_levels.len();
        let slot = self
            .draft
            .skill_levels
            .get_mut(index)
            .ok_or(SkillError::IndexOutOfRange { index, count })?;
        *slot = validate_level(level)?;
        self.dirty = true;
        Ok(())
    }

    /// Set a level by category name
    pub fn set_category(&mut self, category: &str, level: SkillLevel) -> Result<(), EditorError> {
        let index = self
            .taxonomy
            .index_of(category)
            .ok_or_else(|| EditorError::UnknownCategory(category.to_string()))?;
        self.set_level(index, level)
    }

    /// Replace the whole vector. Every level is checked before anything changes;
    /// the vector is then fitted to the taxonomy.
    pub fn set_levels(&mut self, levels: &[SkillLevel]) -> Result<(), EditorError> {
        for &level in levels {
            validate_level(level)?;
        }
        self.draft.skill_levels = reconcile(levels, self.taxonomy.category_count());
        self.dirty = true;
        Ok(())
    }

    /// Levels of one group as currently drafted
    pub fn group_view(&self, group: &str) -> Result<Vec<SkillLevel>, EditorError> {
        let range = self
            .taxonomy
            .group_range(group)
            .ok_or_else(|| SkillError::UnknownGroup(group.to_string()))?;
        Ok(group_slice(&self.draft.skill_levels, range.start, range.len()))
    }

    /// Persist the draft. On failure the store and the editor are unchanged.
    pub async fn save(&mut self, service: &SkillService) -> Result<SaveOutcome, EditorError> {
        let name = self.draft.name.trim().to_string();
        if name.is_empty() {
            return Err(EditorError::EmptyName);
        }

        let outcome = match &self.selected {
            Some(old_name) => {
                service
                    .update_worker(old_name, &name, &self.draft.skill_levels)
                    .await?;
                SaveOutcome::Updated
            }
            None => {
                service.add_worker(&name, &self.draft.skill_levels).await?;
                SaveOutcome::Added
            }
        };

        debug!("Saved worker '{}' ({:?})", name, outcome);
        self.draft.name = name.clone();
        self.selected = Some(name);
        self.dirty = false;
        Ok(outcome)
    }
}
