use clap::Subcommand;
use saiyan_core::{Database, Session};

#[derive(Subcommand)]
pub enum TrainAction {
    /// Log training minutes for a category (upper-body, core, lower-body)
    Log { category: String, minutes: u64 },
    /// Undo the most recent training entry
    Undo,
}

pub fn run(action: TrainAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut session = Session::load(&db)?;

    match action {
        TrainAction::Log { category, minutes } => {
            let category = super::parse_category(&category)
                .ok_or_else(|| format!("unknown category: {category}"))?;
            session.log_training(category, minutes)?;
            session.persist(&db)?;

            let snap = session.snapshot();
            if let Some(line) = snap.categories.iter().find(|c| c.category == category) {
                println!(
                    "{} +{} mins -> {} / {} (level {})",
                    category, minutes, line.current, line.goal, line.level
                );
            }
            println!(
                "Overall level {} -- {} | Ki {}",
                snap.level, snap.form, snap.ki
            );
        }
        TrainAction::Undo => {
            let event = session.undo_training()?;
            session.persist(&db)?;
            println!("Undid {} - {} mins", event.category, event.minutes);
        }
    }
    Ok(())
}
