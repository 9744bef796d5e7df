//! Ki decay over wall-clock time.
//!
//! The clock has two transitions: a one-shot startup catch-up that charges
//! for time the tracker was closed, and a periodic tick that drains one ki
//! point per interval of runtime. Neither uses an internal thread; the
//! caller drives both, and [`run_loop`] provides a serialized tokio driver
//! with an explicit shutdown handle.

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::Result;
use crate::session::Session;
use crate::storage::{keys, StateStore};

/// Minutes of elapsed time per ki point lost.
pub const MINUTES_PER_POINT: u64 = 10;

/// Wall-clock decay state machine around the persisted watermark.
#[derive(Debug, Clone)]
pub struct DecayClock {
    watermark: Option<DateTime<Utc>>,
    minutes_per_point: u64,
}

impl DecayClock {
    pub fn new(watermark: Option<DateTime<Utc>>) -> Self {
        Self {
            watermark,
            minutes_per_point: MINUTES_PER_POINT,
        }
    }

    /// Override the catch-up rate (config knob; defaults to one point per
    /// 10 minutes).
    pub fn with_minutes_per_point(mut self, minutes_per_point: u64) -> Self {
        self.minutes_per_point = minutes_per_point.max(1);
        self
    }

    /// Load the watermark from the store.
    ///
    /// # Errors
    /// Returns an error if the stored timestamp cannot be decoded.
    pub fn load(store: &dyn StateStore) -> Result<Self> {
        let watermark = match store.load(keys::LAST_KI_DECAY)? {
            Some(value) => Some(serde_json::from_value(value)?),
            None => None,
        };
        Ok(Self::new(watermark))
    }

    /// Save the watermark to the store.
    ///
    /// # Errors
    /// Returns an error if the save fails.
    pub fn persist(&self, store: &dyn StateStore) -> Result<()> {
        if let Some(watermark) = self.watermark {
            store.save(keys::LAST_KI_DECAY, &serde_json::to_value(watermark)?)?;
        }
        Ok(())
    }

    pub fn watermark(&self) -> Option<DateTime<Utc>> {
        self.watermark
    }

    /// Startup catch-up: charge one ki point per `minutes_per_point` of gap
    /// since the last observation. The first run ever is free and only
    /// records the watermark. Returns the points removed.
    pub fn catch_up(&mut self, session: &mut Session, now: DateTime<Utc>) -> u32 {
        let Some(last) = self.watermark else {
            self.watermark = Some(now);
            return 0;
        };
        let elapsed_min = (now - last).num_minutes().max(0) as u64;
        let decay = u32::try_from(elapsed_min / self.minutes_per_point).unwrap_or(u32::MAX);
        if decay > 0 {
            let before = session.ki();
            session.decay_ki(decay);
            info!(
                elapsed_min,
                decay,
                ki = session.ki(),
                "ki catch-up applied"
            );
            debug!(before, after = session.ki(), "catch-up ki change");
        }
        self.watermark = Some(now);
        decay
    }

    /// Periodic tick: drain one ki point if any remains. The watermark only
    /// advances on an actual decrement; a tick at zero ki is a no-op, so an
    /// idle stretch at zero does not push the catch-up baseline forward.
    /// Returns whether ki changed (and therefore needs a persist).
    pub fn tick(&mut self, session: &mut Session, now: DateTime<Utc>) -> bool {
        if session.ki() == 0 {
            return false;
        }
        session.decay_ki(1);
        self.watermark = Some(now);
        debug!(ki = session.ki(), "ki decay tick");
        true
    }
}

/// Drive the periodic tick on a tokio interval until `shutdown` fires.
///
/// Everything runs on the caller's task, so decay never interleaves with a
/// user-triggered mutation mid-computation. Each applied decrement persists
/// the session and the watermark through `store`.
///
/// # Errors
/// Returns an error if a persist fails.
pub async fn run_loop(
    session: &mut Session,
    clock: &mut DecayClock,
    store: &dyn StateStore,
    tick_minutes: u64,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let period = std::time::Duration::from_secs(tick_minutes.max(1) * 60);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await; // the first tick fires immediately; skip it

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if clock.tick(session, Utc::now()) {
                    session.persist(store)?;
                    clock.persist(store)?;
                }
            }
            _ = shutdown.changed() => {
                info!("decay loop shutting down");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use chrono::Duration;

    fn session_with_ki(ki: u32) -> Session {
        let mut session = Session::new();
        if ki > 0 {
            session.log_ki(ki).unwrap();
        }
        session
    }

    #[test]
    fn first_catch_up_is_free() {
        let mut session = session_with_ki(50);
        let mut clock = DecayClock::new(None);
        let now = Utc::now();
        assert_eq!(clock.catch_up(&mut session, now), 0);
        assert_eq!(session.ki(), 50);
        assert_eq!(clock.watermark(), Some(now));
    }

    #[test]
    fn catch_up_charges_one_point_per_ten_minutes() {
        // Scenario E: 95 elapsed minutes -> 9 points.
        let mut session = session_with_ki(50);
        let now = Utc::now();
        let mut clock = DecayClock::new(Some(now - Duration::minutes(95)));
        assert_eq!(clock.catch_up(&mut session, now), 9);
        assert_eq!(session.ki(), 41);
        assert_eq!(clock.watermark(), Some(now));
    }

    #[test]
    fn catch_up_floors_ki_at_zero() {
        let mut session = session_with_ki(3);
        let now = Utc::now();
        let mut clock = DecayClock::new(Some(now - Duration::minutes(600)));
        assert_eq!(clock.catch_up(&mut session, now), 60);
        assert_eq!(session.ki(), 0);
    }

    #[test]
    fn short_gap_decays_nothing_but_advances_watermark() {
        let mut session = session_with_ki(10);
        let now = Utc::now();
        let mut clock = DecayClock::new(Some(now - Duration::minutes(9)));
        assert_eq!(clock.catch_up(&mut session, now), 0);
        assert_eq!(session.ki(), 10);
        assert_eq!(clock.watermark(), Some(now));
    }

    #[test]
    fn tick_drains_one_point_and_advances_watermark() {
        let mut session = session_with_ki(2);
        let earlier = Utc::now() - Duration::minutes(10);
        let mut clock = DecayClock::new(Some(earlier));
        let now = Utc::now();
        assert!(clock.tick(&mut session, now));
        assert_eq!(session.ki(), 1);
        assert_eq!(clock.watermark(), Some(now));
    }

    #[test]
    fn tick_at_zero_ki_leaves_watermark_alone() {
        let mut session = session_with_ki(0);
        let earlier = Utc::now() - Duration::minutes(10);
        let mut clock = DecayClock::new(Some(earlier));
        assert!(!clock.tick(&mut session, Utc::now()));
        assert_eq!(session.ki(), 0);
        assert_eq!(clock.watermark(), Some(earlier));
    }

    #[test]
    fn watermark_persists_and_loads() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        let clock = DecayClock::new(Some(now));
        clock.persist(&db).unwrap();
        let loaded = DecayClock::load(&db).unwrap();
        assert_eq!(loaded.watermark(), Some(now));
    }

    #[test]
    fn absent_watermark_loads_as_none() {
        let db = Database::open_memory().unwrap();
        let clock = DecayClock::load(&db).unwrap();
        assert!(clock.watermark().is_none());
    }

    #[tokio::test]
    async fn run_loop_stops_on_shutdown_signal() {
        let db = Database::open_memory().unwrap();
        let mut session = session_with_ki(5);
        let mut clock = DecayClock::new(Some(Utc::now()));
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        run_loop(&mut session, &mut clock, &db, 10, rx).await.unwrap();
        assert_eq!(session.ki(), 5);
    }
}
