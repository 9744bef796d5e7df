//! Backup export and import.
//!
//! JSON export is the round-trippable backup: one object holding the five
//! persisted blobs under their storage keys. CSV export is a human-readable
//! text report grouped by date and is not importable. Import accepts only
//! the JSON shape and validates by explicit key existence, so an empty
//! ledger (`[]`) is a perfectly valid value.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::error::{CoreError, Result};
use crate::history::{group_by_date, KiEvent, Ledger, SupplementEvent, TrainingEvent};
use crate::progression::TrainingState;
use crate::session::Session;
use crate::storage::keys;
use crate::supplement::SupplementLog;

/// The five top-level keys a backup must carry.
pub const BACKUP_KEYS: [&str; 5] = [
    keys::TRAINING_DATA,
    keys::SUPPLEMENT_DATA,
    keys::TRAINING_HISTORY,
    keys::KI_HISTORY,
    keys::SUPPLEMENT_HISTORY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Parse a format identifier.
    ///
    /// # Errors
    /// `UnsupportedFormat` for anything other than `json` or `csv`.
    pub fn parse(id: &str) -> Result<Self> {
        match id.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(CoreError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Backup filename: `saiyan_life_tracker_backup_<ISO-date>.<ext>`.
pub fn filename(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "saiyan_life_tracker_backup_{date}.{ext}",
        ext = format.extension()
    )
}

/// Render the session in the requested format.
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn render(session: &Session, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(session),
        ExportFormat::Csv => Ok(to_csv(session)),
    }
}

fn to_json(session: &Session) -> Result<String> {
    let value = json!({
        keys::TRAINING_DATA: session.state(),
        keys::SUPPLEMENT_DATA: session.supplements(),
        keys::TRAINING_HISTORY: session.training_history(),
        keys::KI_HISTORY: session.ki_history(),
        keys::SUPPLEMENT_HISTORY: session.supplement_history(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn to_csv(session: &Session) -> String {
    let mut out = String::new();

    let date_heading = |date: Option<NaiveDate>| match date {
        Some(date) => date.to_string(),
        None => "No Date".to_string(),
    };

    out.push_str(&format!(
        "Training Logs History (Total {} entries)\n\n",
        session.training_history().len()
    ));
    for (date, events) in group_by_date(session.training_history().entries()) {
        out.push_str(&format!("{}\n\n", date_heading(date)));
        for event in events {
            out.push_str(&format!("{} - {} mins\n", event.category, event.minutes));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Ki Logs History (Total {} entries)\n\n",
        session.ki_history().len()
    ));
    for (date, events) in group_by_date(session.ki_history().entries()) {
        out.push_str(&format!("{}\n\n", date_heading(date)));
        for event in events {
            out.push_str(&format!("+{} Ki\n", event.amount));
        }
        out.push('\n');
    }

    out.push_str("Supplement Logs\n\n");
    for (date, names) in session.supplements().iter_desc() {
        out.push_str(&format!("{date}\n\n"));
        for name in names {
            out.push_str(&format!("{name}\n"));
        }
        out.push('\n');
    }

    out
}

/// A fully decoded backup, staged before any session state is touched so the
/// import swap is all-or-nothing.
#[derive(Debug, Clone)]
pub struct Backup {
    pub(crate) state: TrainingState,
    pub(crate) supplements: SupplementLog,
    pub(crate) training_history: Ledger<TrainingEvent>,
    pub(crate) ki_history: Ledger<KiEvent>,
    pub(crate) supplement_history: Ledger<SupplementEvent>,
}

/// Parse and validate a JSON backup payload.
///
/// # Errors
/// `ImportFormat` if the payload is not a JSON object, a required key is
/// absent, or any blob fails to decode. Nothing is mutated on failure.
pub fn parse_backup(raw: &str) -> Result<Backup> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| CoreError::ImportFormat(format!("not valid JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| CoreError::ImportFormat("top level must be an object".to_string()))?;

    // Key existence, not truthiness: an empty history array is present data.
    for key in BACKUP_KEYS {
        if !object.contains_key(key) {
            return Err(CoreError::ImportFormat(format!(
                "missing required key '{key}'"
            )));
        }
    }

    let state = TrainingState::from_value(&object[keys::TRAINING_DATA])
        .map_err(|e| CoreError::ImportFormat(format!("{}: {e}", keys::TRAINING_DATA)))?;
    let supplements = decode_blob(&object[keys::SUPPLEMENT_DATA], keys::SUPPLEMENT_DATA)?;
    let training_history = decode_blob(&object[keys::TRAINING_HISTORY], keys::TRAINING_HISTORY)?;
    let ki_history = decode_blob(&object[keys::KI_HISTORY], keys::KI_HISTORY)?;
    let supplement_history =
        decode_blob(&object[keys::SUPPLEMENT_HISTORY], keys::SUPPLEMENT_HISTORY)?;

    Ok(Backup {
        state,
        supplements,
        training_history,
        ki_history,
        supplement_history,
    })
}

fn decode_blob<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Result<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| CoreError::ImportFormat(format!("{key}: {e}")))
}
