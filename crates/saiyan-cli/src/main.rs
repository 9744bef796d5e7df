use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "saiyan-cli", version, about = "Saiyan Life Tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Training log
    Train {
        #[command(subcommand)]
        action: commands::train::TrainAction,
    },
    /// Ki resource
    Ki {
        #[command(subcommand)]
        action: commands::ki::KiAction,
    },
    /// Supplement log
    Supplement {
        #[command(subcommand)]
        action: commands::supplement::SupplementAction,
    },
    /// Current progression snapshot
    Status {
        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Grouped-by-date history of all logs
    History,
    /// Backup, import and reset
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Ki decay scheduler
    Decay {
        #[command(subcommand)]
        action: commands::decay::DecayAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Train { action } => commands::train::run(action),
        Commands::Ki { action } => commands::ki::run(action),
        Commands::Supplement { action } => commands::supplement::run(action),
        Commands::Status { json } => commands::status::run(json),
        Commands::History => commands::history::run(),
        Commands::Data { action } => commands::data::run(action),
        Commands::Decay { action } => commands::decay::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
