//! Reservations CLI - people, recreational places and their bookings

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use reservations::config::{self, ReservationsConfig};
use reservations::{NationalId, OutputMode, SqliteStore, emit_error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "reservations")]
#[command(version)]
#[command(about = "Record people, recreational places and date-based reservations")]
#[command(long_about = r#"
Reservations keeps a small SQLite database of people, recreational places
and the dates people booked them, and answers simple reporting queries.

Example usage:
  reservations add-person --national-id 123456789 --first-name Ali --last-name Rezaei
  reservations add-place --name "Park Shahr" --phone 021-12345678 --fee 100000
  reservations reserve --national-id 123456789 --place "Park Shahr" --date 2023-04-05
  reservations fees --place "Park Shahr"
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database
    Init {
        /// Directory decoded pictures are exported to
        #[arg(long)]
        picture_dir: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Register a person
    AddPerson {
        #[arg(short, long)]
        national_id: NationalId,

        #[arg(short, long)]
        first_name: String,

        #[arg(short, long)]
        last_name: String,

        /// Image file to store as the person's picture
        #[arg(short, long)]
        picture: Option<PathBuf>,
    },

    /// Register a recreational place
    AddPlace {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        phone: String,

        /// Fee charged per reservation
        #[arg(short, long, allow_negative_numbers = true)]
        fee: f64,
    },

    /// Book a place for a person on a date (YYYY-MM-DD)
    Reserve {
        #[arg(short, long)]
        national_id: NationalId,

        #[arg(short, long)]
        place: String,

        #[arg(short = 't', long)]
        date: String,
    },

    /// Change some of a person's fields
    UpdatePerson {
        #[arg(short, long)]
        national_id: NationalId,

        #[arg(short, long)]
        first_name: Option<String>,

        #[arg(short, long)]
        last_name: Option<String>,

        /// Image file to store as the person's picture
        #[arg(short, long)]
        picture: Option<PathBuf>,
    },

    /// Change some of a place's fields
    UpdatePlace {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        phone: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        fee: Option<f64>,
    },

    /// Move a reservation to another date
    UpdateReservation {
        #[arg(short, long)]
        national_id: NationalId,

        #[arg(short, long)]
        place: String,

        #[arg(long)]
        old_date: String,

        #[arg(long)]
        new_date: String,
    },

    /// Show a person and their reservation count per place
    History {
        #[arg(short, long)]
        national_id: NationalId,

        /// Export the picture as PNG instead of summarizing it
        #[arg(long)]
        export_picture: bool,
    },

    /// Show a person's reservations between two dates (inclusive)
    Range {
        #[arg(short, long)]
        national_id: NationalId,

        #[arg(short, long)]
        start: String,

        #[arg(short, long)]
        end: String,
    },

    /// Show reservation counts and fee totals per person for a place
    Fees {
        #[arg(short, long)]
        place: String,
    },

    /// Show statistics about the database
    Stats,

    /// Show version information
    Version,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::AddPerson { .. } => "add-person",
            Commands::AddPlace { .. } => "add-place",
            Commands::Reserve { .. } => "reserve",
            Commands::UpdatePerson { .. } => "update-person",
            Commands::UpdatePlace { .. } => "update-place",
            Commands::UpdateReservation { .. } => "update-reservation",
            Commands::History { .. } => "history",
            Commands::Range { .. } => "range",
            Commands::Fees { .. } => "fees",
            Commands::Stats => "stats",
            Commands::Version => "version",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stderr keeps --json output clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = OutputMode::from_flag(cli.json);
    let name = cli.command.name();

    match run(cli, mode) {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<reservations::Error>() {
            Some(domain) if domain.is_recoverable() => {
                tracing::debug!("{} rejected: {}", name, domain);
                emit_error(mode, name, domain)?;
                std::process::exit(1);
            }
            _ => Err(err),
        },
    }
}

fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    if let Commands::Version = cli.command {
        return commands::run_version(mode);
    }

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let file_config = config::load_config(Some(&config_path))?;
    let database = config::resolve_database_path(cli.database.as_deref(), file_config.as_ref());

    if let Commands::Init { picture_dir, force } = &cli.command {
        let new_config = ReservationsConfig {
            database: Some(database.display().to_string()),
            picture_dir: picture_dir.clone(),
        };
        return commands::run_init(mode, &config_path, &new_config, &database, *force);
    }

    config::ensure_db_dir(&database)?;
    tracing::debug!("Using database {:?}", database);
    let store = SqliteStore::open(&database)?;
    let picture_dir = file_config
        .and_then(|c| c.picture_dir)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pictures"));
    let ctx = Context { store, mode, picture_dir };

    match cli.command {
        Commands::AddPerson { national_id, first_name, last_name, picture } => {
            commands::run_add_person(&ctx, national_id, first_name, last_name, picture)
        }
        Commands::AddPlace { name, phone, fee } => commands::run_add_place(&ctx, name, phone, fee),
        Commands::Reserve { national_id, place, date } => {
            commands::run_reserve(&ctx, national_id, &place, &date)
        }
        Commands::UpdatePerson { national_id, first_name, last_name, picture } => {
            commands::run_update_person(&ctx, national_id, first_name, last_name, picture)
        }
        Commands::UpdatePlace { name, phone, fee } => commands::run_update_place(&ctx, &name, phone, fee),
        Commands::UpdateReservation { national_id, place, old_date, new_date } => {
            commands::run_update_reservation(&ctx, national_id, &place, &old_date, &new_date)
        }
        Commands::History { national_id, export_picture } => {
            commands::run_history(&ctx, national_id, export_picture)
        }
        Commands::Range { national_id, start, end } => commands::run_range(&ctx, national_id, &start, &end),
        Commands::Fees { place } => commands::run_fees(&ctx, &place),
        Commands::Stats => commands::run_stats(&ctx, &database),
        Commands::Init { .. } | Commands::Version => Ok(()),
    }
}
