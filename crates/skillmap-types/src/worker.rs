use crate::level::{reconcile, SkillLevel, MIN_LEVEL};
use crate::taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};

/// A worker and their skill vector, aligned to the taxonomy's flattened order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub name: String,
    pub skill_levels: Vec<SkillLevel>,
}

impl WorkerRecord {
    pub fn new(name: impl Into<String>, skill_levels: Vec<SkillLevel>) -> Self {
        Self {
            name: name.into(),
            skill_levels,
        }
    }

    /// A nameless record with every category at the minimum level
    pub fn blank(taxonomy: &Taxonomy) -> Self {
        Self::new(String::new(), vec![MIN_LEVEL; taxonomy.category_count()])
    }

    /// Copy with the skill vector fitted to the taxonomy
    pub fn reconciled(&self, taxonomy: &Taxonomy) -> Self {
        Self::new(
            self.name.clone(),
            reconcile(&self.skill_levels, taxonomy.category_count()),
        )
    }
}

/// Input row of the report exporters: a worker with explicit category labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub categories: Vec<String>,
    pub skill_levels: Vec<SkillLevel>,
}

impl ReportEntry {
    pub fn new(
        name: impl Into<String>,
        categories: Vec<String>,
        skill_levels: Vec<SkillLevel>,
    ) -> Self {
        Self {
            name: name.into(),
            categories,
            skill_levels,
        }
    }

    /// Label a stored record with the taxonomy, reconciling its length
    pub fn from_record(record: &WorkerRecord, taxonomy: &Taxonomy) -> Self {
        Self::new(
            record.name.clone(),
            taxonomy.flattened().to_vec(),
            reconcile(&record.skill_levels, taxonomy.category_count()),
        )
    }

    /// Keep only the given categories, in the given order.
    /// Categories this entry does not carry are left out.
    pub fn restricted_to(&self, categories: &[String]) -> Self {
        let (categories, skill_levels) = categories
            .iter()
            .filter_map(|category| {
                self.level_of(category)
                    .map(|level| (category.clone(), level))
            })
            .unzip();
        Self::new(self.name.clone(), categories, skill_levels)
    }

    pub fn level_of(&self, category: &str) -> Option<SkillLevel> {
        self.categories
            .iter()
            .position(|c| c == category)
            .and_then(|index| self.skill_levels.get(index).copied())
    }

    /// Whether categories and levels can be drawn as one chart
    pub fn is_well_formed(&self) -> bool {
        !self.categories.is_empty() && self.categories.len() == self.skill_levels.len()
    }
}
