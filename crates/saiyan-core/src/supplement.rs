//! Supplement intake log, keyed by local calendar date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordered names taken per date. Append-only per date except via undo; a
/// date whose list becomes empty is removed entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplementLog {
    by_date: BTreeMap<NaiveDate, Vec<String>>,
}

impl SupplementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, date: NaiveDate, name: String) {
        self.by_date.entry(date).or_default().push(name);
    }

    /// Remove the **last** matching occurrence of `name` under `date`
    /// (last-index removal, so duplicates imported under the same date are
    /// unwound in reverse). Returns whether anything was removed.
    pub fn remove_last(&mut self, date: NaiveDate, name: &str) -> bool {
        let Some(names) = self.by_date.get_mut(&date) else {
            return false;
        };
        let Some(index) = names.iter().rposition(|n| n == name) else {
            return false;
        };
        names.remove(index);
        if names.is_empty() {
            self.by_date.remove(&date);
        }
        true
    }

    pub fn names_for(&self, date: NaiveDate) -> &[String] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Dates newest first, each with its names in insertion order.
    pub fn iter_desc(&self) -> impl Iterator<Item = (NaiveDate, &[String])> {
        self.by_date
            .iter()
            .rev()
            .map(|(date, names)| (*date, names.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    #[test]
    fn add_and_list_in_insertion_order() {
        let mut log = SupplementLog::new();
        log.add(day(1), "Creatine".into());
        log.add(day(1), "Whey".into());
        assert_eq!(log.names_for(day(1)), ["Creatine", "Whey"]);
    }

    #[test]
    fn remove_last_takes_the_final_matching_occurrence() {
        let mut log = SupplementLog::new();
        log.add(day(1), "Creatine".into());
        log.add(day(1), "Whey".into());
        log.add(day(1), "Creatine".into());
        assert!(log.remove_last(day(1), "Creatine"));
        assert_eq!(log.names_for(day(1)), ["Creatine", "Whey"]);
    }

    #[test]
    fn emptied_date_key_is_dropped() {
        let mut log = SupplementLog::new();
        log.add(day(2), "Creatine".into());
        assert!(log.remove_last(day(2), "Creatine"));
        assert!(log.is_empty());
    }

    #[test]
    fn remove_from_missing_date_is_a_noop() {
        let mut log = SupplementLog::new();
        log.add(day(1), "Creatine".into());
        assert!(!log.remove_last(day(2), "Creatine"));
        assert!(!log.remove_last(day(1), "Whey"));
        assert_eq!(log.names_for(day(1)), ["Creatine"]);
    }

    #[test]
    fn iter_desc_is_newest_first() {
        let mut log = SupplementLog::new();
        log.add(day(1), "A".into());
        log.add(day(3), "B".into());
        log.add(day(2), "C".into());
        let dates: Vec<NaiveDate> = log.iter_desc().map(|(d, _)| d).collect();
        assert_eq!(dates, [day(3), day(2), day(1)]);
    }

    #[test]
    fn serde_uses_iso_date_keys() {
        let mut log = SupplementLog::new();
        log.add(day(1), "Creatine".into());
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, r#"{"2025-08-01":["Creatine"]}"#);
    }
}
