use crate::error::{Result, SkillError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

/// A named parent group of skill categories (one tab in the editor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub categories: Vec<String>,
}

impl CategoryGroup {
    pub fn new<I, S>(name: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The ordered category taxonomy.
///
/// Flattening the groups in group-then-member order gives the canonical
/// category order. Index `i` of every skill vector refers to `flattened()[i]`,
/// so the taxonomy must not be reordered once workers have been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CategoryGroup>", into = "Vec<CategoryGroup>")]
pub struct Taxonomy {
    groups: Vec<CategoryGroup>,
    flattened: Vec<String>,
}

impl Taxonomy {
    /// Build a taxonomy, rejecting empty groups and repeated category names
    pub fn new(groups: Vec<CategoryGroup>) -> Result<Self> {
        if groups.is_empty() {
            return Err(SkillError::InvalidTaxonomy(
                "at least one category group is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for group in &groups {
            if group.is_empty() {
                return Err(SkillError::InvalidTaxonomy(format!(
                    "group '{}' has no categories",
                    group.name
                )));
            }
            for category in &group.categories {
                if !seen.insert(category.as_str()) {
                    return Err(SkillError::InvalidTaxonomy(format!(
                        "category '{}' appears more than once",
                        category
                    )));
                }
            }
        }

        Ok(Self::from_groups(groups))
    }

    /// Build the canonical flattened order; `groups` must already be valid
    fn from_groups(groups: Vec<CategoryGroup>) -> Self {
        let flattened = groups
            .iter()
            .flat_map(|group| group.categories.iter().cloned())
            .collect();
        Self { groups, flattened }
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// Categories in canonical order
    pub fn flattened(&self) -> &[String] {
        &self.flattened
    }

    pub fn category_count(&self) -> usize {
        self.flattened.len()
    }

    pub fn group(&self, name: &str) -> Option<&CategoryGroup> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Position of a group inside the flattened order
    pub fn group_range(&self, name: &str) -> Option<Range<usize>> {
        self.group_ranges()
            .find(|(group, _)| group.name == name)
            .map(|(_, range)| range)
    }

    /// Every group paired with its index range, in group order
    pub fn group_ranges(&self) -> impl Iterator<Item = (&CategoryGroup, Range<usize>)> {
        self.groups.iter().scan(0usize, |start, group| {
            let range = *start..*start + group.len();
            *start = range.end;
            Some((group, range))
        })
    }

    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.flattened.iter().position(|c| c == category)
    }
}

impl Default for Taxonomy {
    /// The warehouse floor taxonomy: induction, lane sort, pick & stage, other
    fn default() -> Self {
        let groups = vec![
            CategoryGroup::new(
                "Induction",
                [
                    "Unloader",
                    "Every Labeler",
                    "Auto Labeler",
                    "Pusher",
                    "Water Spider",
                    "Finger",
                ],
            ),
            CategoryGroup::new("Lane Sort", ["Stow", "Buffer", "Downstream Control"]),
            CategoryGroup::new("Pick & Stage", ["Pick", "Detach", "TDR"]),
            CategoryGroup::new("Other", ["FC Return", "Repack", "Guidance"]),
        ];
        Self::from_groups(groups)
    }
}

impl TryFrom<Vec<CategoryGroup>> for Taxonomy {
    type Error = SkillError;

    fn try_from(groups: Vec<CategoryGroup>) -> Result<Self> {
        Self::new(groups)
    }
}

impl From<Taxonomy> for Vec<CategoryGroup> {
    fn from(taxonomy: Taxonomy) -> Self {
        taxonomy.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Taxonomy {
        Taxonomy::new(vec![
            CategoryGroup::new("A", ["a1", "a2"]),
            CategoryGroup::new("B", ["b1"]),
            CategoryGroup::new("C", ["c1", "c2", "c3"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_flattened_is_group_then_member_order() {
        let taxonomy = small();
        assert_eq!(taxonomy.flattened(), ["a1", "a2", "b1", "c1", "c2", "c3"]);
        assert_eq!(taxonomy.flattened(), small().flattened());
        assert_eq!(taxonomy.category_count(), 6);
    }

    #[test]
    fn test_group_ranges() {
        let taxonomy = small();
        assert_eq!(taxonomy.group_range("A"), Some(0..2));
        assert_eq!(taxonomy.group_range("B"), Some(2..3));
        assert_eq!(taxonomy.group_range("C"), Some(3..6));
        assert_eq!(taxonomy.group_range("missing"), None);
    }

    #[test]
    fn test_default_taxonomy_shape() {
        let taxonomy = Taxonomy::default();
        assert_eq!(taxonomy.groups().len(), 4);
        assert_eq!(taxonomy.category_count(), 15);
        assert_eq!(taxonomy.group_range("Pick & Stage"), Some(9..12));
        assert_eq!(taxonomy.index_of("Guidance"), Some(14));
        // Default must satisfy the same rules as a configured taxonomy
        // and flatten to the same order
        assert_eq!(
            Taxonomy::new(taxonomy.groups().to_vec()).unwrap(),
            taxonomy
        );
    }

    #[test]
    fn test_rejects_duplicate_category() {
        let result = Taxonomy::new(vec![
            CategoryGroup::new("A", ["pick"]),
            CategoryGroup::new("B", ["pick"]),
        ]);
        assert!(matches!(result, Err(SkillError::InvalidTaxonomy(_))));
    }

    #[test]
    fn test_rejects_empty_group_and_empty_taxonomy() {
        assert!(Taxonomy::new(vec![]).is_err());
        assert!(Taxonomy::new(vec![CategoryGroup::new("A", Vec::<String>::new())]).is_err());
    }

    #[test]
    fn test_toml_deserialization_validates() {
        #[derive(Deserialize)]
        struct Wrapper {
            taxonomy: Taxonomy,
        }

        let toml_str = r#"
            [[taxonomy]]
            name = "Dock"
            categories = ["Unload", "Scan"]

            [[taxonomy]]
            name = "Floor"
            categories = ["Stow"]
        "#;
        let wrapper: Wrapper = toml::from_str(toml_str).expect("Failed to parse TOML");
        assert_eq!(wrapper.taxonomy.flattened(), ["Unload", "Scan", "Stow"]);

        let duplicated = r#"
            [[taxonomy]]
            name = "Dock"
            categories = ["Scan", "Scan"]
        "#;
        assert!(toml::from_str::<Wrapper>(duplicated).is_err());
    }
}
