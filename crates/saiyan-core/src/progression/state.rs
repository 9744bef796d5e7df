//! The root training aggregate and its transition rules.

use serde::{Deserialize, Serialize};

use super::{Category, CategoryMap, FORMS};

/// Upper bound for the ki resource. Ki is clamped to `[0, KI_MAX]` on every
/// mutation, not just at storage time.
pub const KI_MAX: u32 = 100;

/// Per-category progress: cumulative minutes, the power-of-2 goal multiplier,
/// and the cached derived level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub minutes: u64,
    pub multiplier: u64,
    pub level: u32,
}

impl Default for CategoryProgress {
    fn default() -> Self {
        Self {
            minutes: 0,
            multiplier: 1,
            level: 0,
        }
    }
}

/// Root progression state, persisted as one blob.
///
/// `level` and the per-category `level` fields are derived caches; call
/// [`TrainingState::recompute`] after any mutation to bring them up to date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingState {
    #[serde(flatten)]
    pub categories: CategoryMap<CategoryProgress>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub ki: u32,
}

/// The original tracker persisted a flat blob with bare minute counts and
/// `"<name> Multiplier"` / `"<name> Level"` keys. Only minutes, multipliers
/// and ki are trusted; cached levels are re-derived (the original stored
/// them 1-based).
#[derive(Deserialize)]
struct LegacyState {
    #[serde(rename = "Upper Body")]
    upper_minutes: u64,
    #[serde(rename = "Core")]
    core_minutes: u64,
    #[serde(rename = "Lower Body")]
    lower_minutes: u64,
    #[serde(rename = "Upper Body Multiplier", default = "one")]
    upper_multiplier: u64,
    #[serde(rename = "Core Multiplier", default = "one")]
    core_multiplier: u64,
    #[serde(rename = "Lower Body Multiplier", default = "one")]
    lower_multiplier: u64,
    #[serde(default)]
    ki: u32,
}

fn one() -> u64 {
    1
}

impl TrainingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from either the native shape or the original flat blob.
    /// Derived caches are recomputed either way.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut state = serde_json::from_value::<TrainingState>(value.clone()).or_else(
            |native_err| {
                serde_json::from_value::<LegacyState>(value.clone())
                    .map(TrainingState::from)
                    .map_err(|_| native_err)
            },
        )?;
        state.recompute();
        Ok(state)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn minutes(&self, category: Category) -> u64 {
        self.categories.get(category).minutes
    }

    pub fn multiplier(&self, category: Category) -> u64 {
        self.categories.get(category).multiplier
    }

    /// Current visible goal for a category: `base_goal * multiplier`.
    pub fn goal(&self, category: Category) -> u64 {
        category.base_goal() * self.multiplier(category)
    }

    /// Derived level: `floor(minutes / base_goal)`, never negative.
    pub fn level_for(&self, category: Category) -> u32 {
        (self.minutes(category) / category.base_goal()) as u32
    }

    /// Total minutes logged across all categories ("power level").
    pub fn total_minutes(&self) -> u64 {
        Category::ALL.iter().map(|&c| self.minutes(c)).sum()
    }

    /// Name of the active form for the cached overall level.
    pub fn form(&self) -> &'static str {
        FORMS[self.level.min(FORMS.len() as u32 - 1) as usize]
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Add training minutes and grow the goal multiplier past any thresholds
    /// the new total crossed. Training costs 1 ki (floored at 0).
    ///
    /// Minutes saturate and the doubling stops at the last multiplier whose
    /// visible goal still fits in a `u64`, so absurd inputs cannot overflow.
    pub fn record(&mut self, category: Category, minutes: u64) {
        let base_goal = category.base_goal();
        let entry = self.categories.get_mut(category);
        entry.minutes = entry.minutes.saturating_add(minutes);
        while entry.minutes >= base_goal * entry.multiplier {
            let next = entry
                .multiplier
                .checked_mul(2)
                .filter(|next| base_goal.checked_mul(*next).is_some());
            match next {
                Some(next) => entry.multiplier = next,
                None => break,
            }
        }
        self.ki = self.ki.saturating_sub(1);
    }

    /// Reverse of [`record`](Self::record) for the same minutes, halving the
    /// multiplier back down and refunding the 1 ki spent (capped at KI_MAX).
    ///
    /// The halving boundary is strict `<` at `base_goal * multiplier / 2`,
    /// matching the goal-scaling mechanic exactly.
    pub fn unrecord(&mut self, category: Category, minutes: u64) {
        let base_goal = category.base_goal();
        let entry = self.categories.get_mut(category);
        entry.minutes = entry.minutes.saturating_sub(minutes);
        while entry.multiplier > 1 && entry.minutes < base_goal * entry.multiplier / 2 {
            entry.multiplier /= 2;
        }
        self.ki = self.ki.saturating_add(1).min(KI_MAX);
    }

    /// Raise ki, capped at [`KI_MAX`].
    pub fn gain_ki(&mut self, amount: u32) {
        self.ki = self.ki.saturating_add(amount).min(KI_MAX);
    }

    /// Lower ki, floored at 0.
    pub fn drain_ki(&mut self, amount: u32) {
        self.ki = self.ki.saturating_sub(amount);
    }

    /// One atomic recompute pass: re-derive all three category levels and the
    /// overall weakest-link level, clamped to the form table.
    pub fn recompute(&mut self) {
        for category in Category::ALL {
            self.categories.get_mut(category).level = self.level_for(category);
        }
        let min_level = Category::ALL
            .iter()
            .map(|&c| self.categories.get(c).level)
            .min()
            .unwrap_or(0);
        self.level = min_level.min(FORMS.len() as u32 - 1);
    }
}

impl From<LegacyState> for TrainingState {
    fn from(legacy: LegacyState) -> Self {
        let progress = |minutes, multiplier| CategoryProgress {
            minutes,
            multiplier,
            level: 0,
        };
        Self {
            categories: CategoryMap {
                upper_body: progress(legacy.upper_minutes, legacy.upper_multiplier.max(1)),
                core: progress(legacy.core_minutes, legacy.core_multiplier.max(1)),
                lower_body: progress(legacy.lower_minutes, legacy.lower_multiplier.max(1)),
            },
            level: 0,
            ki: legacy.ki.min(KI_MAX),
        }
    }
}
