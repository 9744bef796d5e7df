//! # Saiyan Life Tracker Core Library
//!
//! Core business logic for the Saiyan Life Tracker, a habit/fitness
//! gamification tracker. All operations are available through a standalone
//! CLI binary; any richer front end is a thin view layer over this crate.
//!
//! ## Architecture
//!
//! - **Progression**: per-category minutes, power-of-2 goal multipliers, and
//!   the weakest-link overall level that selects the active Saiyan form
//! - **Session**: the single aggregate owning state, supplement log and the
//!   three LIFO undo ledgers; mutate, recompute, then persist explicitly
//! - **Decay**: a wall-clock ki decay clock with startup catch-up and a
//!   caller-driven periodic tick
//! - **Storage**: SQLite key-value blobs and TOML configuration
//! - **Export**: JSON backups (importable) and a CSV text report
//!
//! ## Key Components
//!
//! - [`Session`]: root aggregate and operation surface
//! - [`TrainingState`]: progression state machine
//! - [`DecayClock`]: ki decay transitions
//! - [`Database`]: persisted session blobs
//! - [`Config`]: application configuration

pub mod decay;
pub mod error;
pub mod export;
pub mod history;
pub mod progression;
pub mod session;
pub mod storage;
pub mod supplement;

pub use decay::DecayClock;
pub use error::{CoreError, Result, StorageError, ValidationError};
pub use export::ExportFormat;
pub use history::{KiEvent, Ledger, SupplementEvent, TrainingEvent};
pub use progression::{Category, CategoryProgress, TrainingState, FORMS, KI_MAX};
pub use session::{Session, Snapshot};
pub use storage::{Config, Database, StateStore};
pub use supplement::SupplementLog;
