//! Derived view of the whole session for rendering.
//!
//! Built fresh after every mutation; the view layer renders this and never
//! reaches into the aggregate.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::Session;
use crate::history::Dated;
use crate::progression::Category;

/// Per-category progress line.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySnapshot {
    pub category: Category,
    /// Minutes logged so far.
    pub current: u64,
    /// Visible goal: `base_goal * multiplier`.
    pub goal: u64,
    pub level: u32,
    /// 0.0 .. 100.0 progress within the current level's chunk.
    pub percent: f64,
}

/// One date's worth of rendered log lines, newest dates first.
#[derive(Debug, Clone, Serialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub entries: Vec<String>,
}

/// Grouped-by-date render of the three ledgers and the supplement log.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub training_total: usize,
    pub training: Vec<DateGroup>,
    pub ki_total: usize,
    pub ki: Vec<DateGroup>,
    pub supplements: Vec<DateGroup>,
}

/// Full derived state exposed to the view layer.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub categories: Vec<CategorySnapshot>,
    pub level: u32,
    pub form: &'static str,
    /// Total minutes logged across all categories.
    pub power_level: u64,
    pub ki: u32,
    pub history: HistoryView,
}

pub(super) fn build(session: &Session) -> Snapshot {
    let state = session.state();
    let categories = Category::ALL
        .iter()
        .map(|&category| {
            let base_goal = category.base_goal();
            let current = state.minutes(category);
            CategorySnapshot {
                category,
                current,
                goal: state.goal(category),
                level: state.level_for(category),
                percent: (current % base_goal) as f64 / base_goal as f64 * 100.0,
            }
        })
        .collect();

    // Undated legacy entries group under today, the same leniency the
    // original applied when rendering history.
    let today = Local::now().date_naive();
    let training = grouped(session.training_history().entries(), today, |e| {
        format!("{} - {} mins", e.category, e.minutes)
    });
    let ki = grouped(session.ki_history().entries(), today, |e| {
        format!("+{} Ki", e.amount)
    });
    let supplements = session
        .supplements()
        .iter_desc()
        .map(|(date, names)| DateGroup {
            date,
            entries: names.to_vec(),
        })
        .collect();

    Snapshot {
        categories,
        level: state.level,
        form: state.form(),
        power_level: state.total_minutes(),
        ki: state.ki,
        history: HistoryView {
            training_total: session.training_history().len(),
            training,
            ki_total: session.ki_history().len(),
            ki,
            supplements,
        },
    }
}

fn grouped<E: Dated>(
    entries: &[E],
    today: NaiveDate,
    render: impl Fn(&E) -> String,
) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();
    for entry in entries {
        let date = entry.log_date().unwrap_or(today);
        match groups.iter_mut().find(|g| g.date == date) {
            Some(group) => group.entries.push(render(entry)),
            None => groups.push(DateGroup {
                date,
                entries: vec![render(entry)],
            }),
        }
    }
    groups.sort_by(|a, b| b.date.cmp(&a.date));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_progress_and_goal() {
        let mut session = Session::new();
        session.log_ki(30).unwrap();
        session.log_training(Category::UpperBody, 960).unwrap();
        let snap = session.snapshot();

        let upper = &snap.categories[0];
        assert_eq!(upper.category, Category::UpperBody);
        assert_eq!(upper.current, 960);
        assert_eq!(upper.goal, 1920);
        assert_eq!(upper.level, 1);
        assert_eq!(upper.percent, 0.0); // 960 % 960 == 0, new chunk just began

        assert_eq!(snap.level, 0);
        assert_eq!(snap.form, "Super Saiyan");
        assert_eq!(snap.power_level, 960);
        assert_eq!(snap.ki, 29); // 30 logged, 1 spent training
    }

    #[test]
    fn percent_is_progress_within_current_chunk() {
        let mut session = Session::new();
        session.log_training(Category::Core, 120).unwrap();
        let core = &session.snapshot().categories[1];
        assert!((core.percent - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn history_view_groups_and_counts() {
        let mut session = Session::new();
        session.log_training(Category::Core, 30).unwrap();
        session.log_training(Category::UpperBody, 45).unwrap();
        session.log_ki(10).unwrap();
        session.log_supplement("Creatine").unwrap();

        let history = session.snapshot().history;
        assert_eq!(history.training_total, 2);
        assert_eq!(history.training.len(), 1); // both logged today
        assert_eq!(
            history.training[0].entries,
            ["Core - 30 mins", "Upper Body - 45 mins"]
        );
        assert_eq!(history.ki_total, 1);
        assert_eq!(history.ki[0].entries, ["+10 Ki"]);
        assert_eq!(history.supplements[0].entries, ["Creatine"]);
    }
}
