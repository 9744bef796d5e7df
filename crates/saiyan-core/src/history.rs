//! Append-only event ledgers and grouped-by-date views.
//!
//! Three independent LIFO ledgers (training, ki, supplement) are the
//! authoritative undo source for their domain: undo pops the most recent
//! event of its own ledger and never touches the other two.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::progression::Category;

/// One append-only LIFO ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger<E> {
    entries: Vec<E>,
}

// Manual impl: a derived Default would bound `E: Default`, and events have
// no meaningful default value.
impl<E> Default for Ledger<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> Ledger<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, event: E) {
        self.entries.push(event);
    }

    /// Remove and return the most recent event, if any.
    pub fn pop(&mut self) -> Option<E> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }
}

/// A logged training session.
///
/// Legacy backups store these as `{ "type": ..., "mins": ... }` without a
/// timestamp; the aliases and optional `at` accept that shape unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingEvent {
    #[serde(alias = "type")]
    pub category: Category,
    #[serde(alias = "mins")]
    pub minutes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
}

/// A logged ki gain. The stored amount is the amount as originally logged,
/// uncapped, so undo can subtract it exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KiEvent {
    pub amount: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
}

impl<'de> Deserialize<'de> for KiEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Legacy ki history is a bare array of numbers.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bare(u32),
            Full {
                amount: u32,
                #[serde(default)]
                at: Option<DateTime<Utc>>,
            },
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Bare(amount) => KiEvent { amount, at: None },
            Repr::Full { amount, at } => KiEvent { amount, at },
        })
    }
}

/// A logged supplement intake, keyed by the local calendar date it was
/// taken on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementEvent {
    pub date: NaiveDate,
    pub name: String,
}

/// An event that can be attributed to a calendar date for grouped views.
/// `None` means the event predates date tracking (legacy/imported data).
pub trait Dated {
    fn log_date(&self) -> Option<NaiveDate>;
}

impl Dated for TrainingEvent {
    fn log_date(&self) -> Option<NaiveDate> {
        self.at.map(|at| at.with_timezone(&Local).date_naive())
    }
}

impl Dated for KiEvent {
    fn log_date(&self) -> Option<NaiveDate> {
        self.at.map(|at| at.with_timezone(&Local).date_naive())
    }
}

impl Dated for SupplementEvent {
    fn log_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

/// Group ledger entries by attributable date, newest date first, insertion
/// order within a date. Undated entries collect in a trailing `None` group;
/// callers decide the fallback (today for history views, "No Date" in the
/// CSV report).
pub fn group_by_date<E: Dated>(entries: &[E]) -> Vec<(Option<NaiveDate>, Vec<&E>)> {
    let mut groups: Vec<(Option<NaiveDate>, Vec<&E>)> = Vec::new();
    for entry in entries {
        let date = entry.log_date();
        match groups.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(entry),
            None => groups.push((date, vec![entry])),
        }
    }
    groups.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    groups
}
