//! The process-wide session aggregate.
//!
//! One [`Session`] owns the training state, the supplement log and the three
//! undo ledgers. Every mutating operation validates first, mutates, appends
//! to its ledger, then runs one recompute pass; persistence is an explicit
//! step the caller drives through [`Session::persist`]. An operation that
//! returns an error has changed nothing.

mod snapshot;

pub use snapshot::{CategorySnapshot, DateGroup, HistoryView, Snapshot};

use chrono::{Local, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{CoreError, Result, ValidationError};
use crate::export::Backup;
use crate::history::{KiEvent, Ledger, SupplementEvent, TrainingEvent};
use crate::progression::{Category, TrainingState};
use crate::storage::{keys, StateStore};
use crate::supplement::SupplementLog;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    state: TrainingState,
    supplements: SupplementLog,
    training_history: Ledger<TrainingEvent>,
    ki_history: Ledger<KiEvent>,
    supplement_history: Ledger<SupplementEvent>,
}

impl Session {
    /// A fresh session with zero progress.
    pub fn new() -> Self {
        let mut session = Self::default();
        session.state.recompute();
        session
    }

    /// Load the session from the store; absent keys fall back to defaults.
    ///
    /// # Errors
    /// Returns an error if a stored blob exists but cannot be decoded.
    pub fn load(store: &dyn StateStore) -> Result<Self> {
        let state = match store.load(keys::TRAINING_DATA)? {
            Some(value) => TrainingState::from_value(&value)?,
            None => TrainingState::new(),
        };
        let mut session = Self {
            state,
            supplements: load_or_default(store, keys::SUPPLEMENT_DATA)?,
            training_history: load_or_default(store, keys::TRAINING_HISTORY)?,
            ki_history: load_or_default(store, keys::KI_HISTORY)?,
            supplement_history: load_or_default(store, keys::SUPPLEMENT_HISTORY)?,
        };
        session.state.recompute();
        Ok(session)
    }

    /// Save every session blob through the store.
    ///
    /// # Errors
    /// Returns an error if serialization or a save fails; the in-memory
    /// session is unaffected either way.
    pub fn persist(&self, store: &dyn StateStore) -> Result<()> {
        store.save(keys::TRAINING_DATA, &serde_json::to_value(&self.state)?)?;
        store.save(
            keys::SUPPLEMENT_DATA,
            &serde_json::to_value(&self.supplements)?,
        )?;
        store.save(
            keys::TRAINING_HISTORY,
            &serde_json::to_value(&self.training_history)?,
        )?;
        store.save(keys::KI_HISTORY, &serde_json::to_value(&self.ki_history)?)?;
        store.save(
            keys::SUPPLEMENT_HISTORY,
            &serde_json::to_value(&self.supplement_history)?,
        )?;
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    pub fn ki(&self) -> u32 {
        self.state.ki
    }

    pub fn supplements(&self) -> &SupplementLog {
        &self.supplements
    }

    pub fn training_history(&self) -> &Ledger<TrainingEvent> {
        &self.training_history
    }

    pub fn ki_history(&self) -> &Ledger<KiEvent> {
        &self.ki_history
    }

    pub fn supplement_history(&self) -> &Ledger<SupplementEvent> {
        &self.supplement_history
    }

    /// Full derived view for rendering.
    pub fn snapshot(&self) -> Snapshot {
        snapshot::build(self)
    }

    // ── Training ─────────────────────────────────────────────────────

    /// Log training minutes for a category. Costs 1 ki.
    ///
    /// # Errors
    /// `ValidationError` if `minutes` is zero; nothing is mutated.
    pub fn log_training(&mut self, category: Category, minutes: u64) -> Result<()> {
        if minutes == 0 {
            return Err(ValidationError::NonPositiveMinutes.into());
        }
        self.state.record(category, minutes);
        self.training_history.push(TrainingEvent {
            category,
            minutes,
            at: Some(Utc::now()),
        });
        self.state.recompute();
        debug!(category = %category, minutes, "training logged");
        Ok(())
    }

    /// Undo the most recent training entry, restoring minutes, multiplier
    /// and the 1 ki it cost.
    ///
    /// # Errors
    /// `EmptyHistory` if the training ledger is empty.
    pub fn undo_training(&mut self) -> Result<TrainingEvent> {
        let event = self
            .training_history
            .pop()
            .ok_or(CoreError::EmptyHistory { domain: "training" })?;
        self.state.unrecord(event.category, event.minutes);
        self.state.recompute();
        debug!(category = %event.category, minutes = event.minutes, "training undone");
        Ok(event)
    }

    // ── Ki ───────────────────────────────────────────────────────────

    /// Log a ki gain, capped at 100. The ledger records the uncapped amount.
    ///
    /// # Errors
    /// `ValidationError` if `amount` is zero; nothing is mutated.
    pub fn log_ki(&mut self, amount: u32) -> Result<()> {
        if amount == 0 {
            return Err(ValidationError::NonPositiveKi.into());
        }
        self.state.gain_ki(amount);
        self.ki_history.push(KiEvent {
            amount,
            at: Some(Utc::now()),
        });
        self.state.recompute();
        debug!(amount, ki = self.state.ki, "ki logged");
        Ok(())
    }

    /// Undo the most recent ki entry, floored at 0.
    ///
    /// # Errors
    /// `EmptyHistory` if the ki ledger is empty.
    pub fn undo_ki(&mut self) -> Result<KiEvent> {
        let event = self
            .ki_history
            .pop()
            .ok_or(CoreError::EmptyHistory { domain: "ki" })?;
        self.state.drain_ki(event.amount);
        self.state.recompute();
        Ok(event)
    }

    /// Drain ki without touching any ledger (decay path).
    pub(crate) fn decay_ki(&mut self, points: u32) {
        self.state.drain_ki(points);
        self.state.recompute();
    }

    // ── Supplements ──────────────────────────────────────────────────

    /// Log a supplement under today's local calendar date.
    ///
    /// # Errors
    /// `ValidationError` if the name is empty after trimming.
    pub fn log_supplement(&mut self, name: &str) -> Result<SupplementEvent> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptySupplementName.into());
        }
        let event = SupplementEvent {
            date: Local::now().date_naive(),
            name: name.to_string(),
        };
        self.supplements.add(event.date, event.name.clone());
        self.supplement_history.push(event.clone());
        self.state.recompute();
        Ok(event)
    }

    /// Undo the most recent supplement entry: remove the last matching
    /// occurrence under its date.
    ///
    /// # Errors
    /// `EmptyHistory` if the supplement ledger is empty.
    pub fn undo_supplement(&mut self) -> Result<SupplementEvent> {
        let event = self
            .supplement_history
            .pop()
            .ok_or(CoreError::EmptyHistory {
                domain: "supplement",
            })?;
        self.supplements.remove_last(event.date, &event.name);
        self.state.recompute();
        Ok(event)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Wipe everything: in-memory state and every stored key, then persist
    /// the fresh blobs.
    ///
    /// # Errors
    /// Returns an error if the store cannot be cleared or written.
    pub fn reset(&mut self, store: &dyn StateStore) -> Result<()> {
        *self = Session::new();
        store.clear_all()?;
        self.persist(store)?;
        info!("all tracker data reset");
        Ok(())
    }

    /// Import a JSON backup payload, replacing the whole session.
    ///
    /// The payload is parsed and fully decoded before anything is touched;
    /// the caller persists afterwards to replace the stored blobs too.
    ///
    /// # Errors
    /// `ImportFormat` on parse failure or a missing required key; the
    /// session is left exactly as it was.
    pub fn import(&mut self, raw: &str) -> Result<()> {
        let backup = crate::export::parse_backup(raw)?;
        self.apply_backup(backup);
        Ok(())
    }

    /// Replace the whole session from a parsed backup. Used by import after
    /// the payload has been fully validated and decoded, so the swap cannot
    /// half-apply.
    pub(crate) fn apply_backup(&mut self, backup: Backup) {
        self.state = backup.state;
        self.supplements = backup.supplements;
        self.training_history = backup.training_history;
        self.ki_history = backup.ki_history;
        self.supplement_history = backup.supplement_history;
        self.state.recompute();
        info!("session replaced from imported backup");
    }
}

fn load_or_default<T: DeserializeOwned + Default>(
    store: &dyn StateStore,
    key: &str,
) -> Result<T> {
    match store.load(key)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}
