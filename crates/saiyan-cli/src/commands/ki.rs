use clap::Subcommand;
use saiyan_core::{Database, Session};

#[derive(Subcommand)]
pub enum KiAction {
    /// Log a ki gain
    Log { amount: u32 },
    /// Undo the most recent ki entry
    Undo,
}

pub fn run(action: KiAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut session = Session::load(&db)?;

    match action {
        KiAction::Log { amount } => {
            session.log_ki(amount)?;
            session.persist(&db)?;
            println!("+{} Ki -> {}/100", amount, session.ki());
        }
        KiAction::Undo => {
            let event = session.undo_ki()?;
            session.persist(&db)?;
            println!("Undid +{} Ki -> {}/100", event.amount, session.ki());
        }
    }
    Ok(())
}
