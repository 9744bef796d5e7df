//! Progression state and level math.
//!
//! Each trainable category accumulates minutes against a fixed base goal.
//! Completing a goal doubles the visible target (power-of-2 multiplier) and
//! raises the category level. The overall level is the weakest-link minimum
//! of the three category levels and selects the active Saiyan form.

mod state;

pub use state::{CategoryProgress, TrainingState, KI_MAX};

use serde::{Deserialize, Serialize};

/// The ten progression tiers, indexed by overall level.
pub const FORMS: [&str; 10] = [
    "Super Saiyan",
    "Super Saiyan 2",
    "Super Saiyan 3",
    "Super Saiyan 4",
    "Super Saiyan God",
    "Super Saiyan God Blue",
    "Ultra Instinct",
    "Mastered Ultra Instinct",
    "Kaio-ken UI",
    "Kaio-ken MUI",
];

/// The three trainable body areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Upper Body")]
    UpperBody,
    #[serde(rename = "Core")]
    Core,
    #[serde(rename = "Lower Body")]
    LowerBody,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::UpperBody, Category::Core, Category::LowerBody];

    /// Minutes required for one level in this category.
    pub fn base_goal(self) -> u64 {
        match self {
            Category::UpperBody => 960,
            Category::Core => 480,
            Category::LowerBody => 480,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::UpperBody => "Upper Body",
            Category::Core => "Core",
            Category::LowerBody => "Lower Body",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed-shape value-per-category record.
///
/// Replaces the original string-keyed records; a typo in a category name is
/// now a compile error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMap<T> {
    #[serde(rename = "Upper Body")]
    pub upper_body: T,
    #[serde(rename = "Core")]
    pub core: T,
    #[serde(rename = "Lower Body")]
    pub lower_body: T,
}

impl<T> CategoryMap<T> {
    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::UpperBody => &self.upper_body,
            Category::Core => &self.core,
            Category::LowerBody => &self.lower_body,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::UpperBody => &mut self.upper_body,
            Category::Core => &mut self.core,
            Category::LowerBody => &mut self.lower_body,
        }
    }
}

impl<T: Clone> CategoryMap<T> {
    /// A map with the same value in every category.
    pub fn uniform(value: T) -> Self {
        Self {
            upper_body: value.clone(),
            core: value.clone(),
            lower_body: value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_goals_match_constants() {
        assert_eq!(Category::UpperBody.base_goal(), 960);
        assert_eq!(Category::Core.base_goal(), 480);
        assert_eq!(Category::LowerBody.base_goal(), 480);
    }

    #[test]
    fn category_serde_uses_display_names() {
        let json = serde_json::to_string(&Category::UpperBody).unwrap();
        assert_eq!(json, "\"Upper Body\"");
        let back: Category = serde_json::from_str("\"Lower Body\"").unwrap();
        assert_eq!(back, Category::LowerBody);
    }

    #[test]
    fn category_map_indexing() {
        let mut map = CategoryMap::uniform(0u64);
        *map.get_mut(Category::Core) = 42;
        assert_eq!(*map.get(Category::Core), 42);
        assert_eq!(*map.get(Category::UpperBody), 0);
    }
}
