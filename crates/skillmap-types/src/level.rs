//! Skill level bounds and the length reconciliation policy

use crate::error::{Result, SkillError};

/// A single skill level (1 = novice, 5 = expert)
pub type SkillLevel = u8;

/// Lowest valid level, also the neutral value used for padding
pub const MIN_LEVEL: SkillLevel = 1;

/// Highest valid level
pub const MAX_LEVEL: SkillLevel = 5;

/// Check that a level lies in `MIN_LEVEL..=MAX_LEVEL`
pub fn validate_level(level: SkillLevel) -> Result<SkillLevel> {
    if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(SkillError::InvalidLevel { level })
    }
}

/// Check every level of a vector
pub fn validate_levels(levels: &[SkillLevel]) -> Result<()> {
    levels.iter().try_for_each(|&level| validate_level(level).map(|_| ()))
}

/// Fit a skill vector to `count` categories.
///
/// Longer vectors are truncated, shorter ones are padded with `MIN_LEVEL`.
/// Every place where a stored vector meets a category list goes through here.
pub fn reconcile(levels: &[SkillLevel], count: usize) -> Vec<SkillLevel> {
    let mut fitted: Vec<SkillLevel> = levels.iter().copied().take(count).collect();
    fitted.resize(count, MIN_LEVEL);
    fitted
}
