use chrono::Utc;
use clap::Subcommand;
use saiyan_core::{decay, Config, Database, DecayClock, Session};
use tokio::sync::watch;

#[derive(Subcommand)]
pub enum DecayAction {
    /// Apply the startup catch-up once and exit
    CatchUp,
    /// Run the periodic decay scheduler until interrupted
    Run,
}

pub fn run(action: DecayAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DecayAction::CatchUp => catch_up(),
        DecayAction::Run => daemon(),
    }
}

fn catch_up() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut session = Session::load(&db)?;
    let mut clock =
        DecayClock::load(&db)?.with_minutes_per_point(config.decay.minutes_per_point);

    let removed = clock.catch_up(&mut session, Utc::now());
    session.persist(&db)?;
    clock.persist(&db)?;
    println!("Catch-up removed {} ki (now {}/100)", removed, session.ki());
    Ok(())
}

fn daemon() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    if !config.decay.enabled {
        println!("Decay is disabled in config.toml");
        return Ok(());
    }

    let db = Database::open()?;
    let mut session = Session::load(&db)?;
    let mut clock =
        DecayClock::load(&db)?.with_minutes_per_point(config.decay.minutes_per_point);

    let removed = clock.catch_up(&mut session, Utc::now());
    session.persist(&db)?;
    clock.persist(&db)?;
    if removed > 0 {
        println!("Catch-up removed {removed} ki");
    }
    println!(
        "Decay scheduler running: 1 ki per {} min of runtime. Ctrl-C to stop.",
        config.decay.tick_minutes
    );

    // Single-threaded runtime: decay ticks and their persists never
    // interleave with anything else.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            let _ = tx.send(true);
        });
        decay::run_loop(&mut session, &mut clock, &db, config.decay.tick_minutes, rx).await
    })?;
    Ok(())
}
