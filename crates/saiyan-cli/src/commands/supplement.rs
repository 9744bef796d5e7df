use clap::Subcommand;
use saiyan_core::{Database, Session};

#[derive(Subcommand)]
pub enum SupplementAction {
    /// Log a supplement under today's date
    Log { name: String },
    /// Undo the most recent supplement entry
    Undo,
}

pub fn run(action: SupplementAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut session = Session::load(&db)?;

    match action {
        SupplementAction::Log { name } => {
            let event = session.log_supplement(&name)?;
            session.persist(&db)?;
            println!("Logged {} on {}", event.name, event.date);
        }
        SupplementAction::Undo => {
            let event = session.undo_supplement()?;
            session.persist(&db)?;
            println!("Removed {} from {}", event.name, event.date);
        }
    }
    Ok(())
}
