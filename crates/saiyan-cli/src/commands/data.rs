use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;
use saiyan_core::{export, Database, ExportFormat, Session};

#[derive(Subcommand)]
pub enum DataAction {
    /// Write a backup file (json or csv)
    Export {
        /// Output format: json (importable) or csv (text report)
        #[arg(long, default_value = "json")]
        format: String,
        /// Output directory (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import a JSON backup, replacing all data
    Import { file: PathBuf },
    /// Erase all tracker data
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut session = Session::load(&db)?;

    match action {
        DataAction::Export { format, out } => {
            let format = ExportFormat::parse(&format)?;
            let content = export::render(&session, format)?;
            let name = export::filename(format, Local::now().date_naive());
            let path = out.unwrap_or_else(|| PathBuf::from(".")).join(name);
            std::fs::write(&path, content)?;
            println!("Exported {}", path.display());
        }
        DataAction::Import { file } => {
            let raw = std::fs::read_to_string(&file)?;
            session.import(&raw)?;
            session.persist(&db)?;
            println!("Import successful");
        }
        DataAction::Reset { yes } => {
            if !yes {
                return Err("refusing to reset all data without --yes".into());
            }
            session.reset(&db)?;
            println!("All data reset");
        }
    }
    Ok(())
}
