use clap::{Parser, Subcommand};
use std::path::Path;

use golftracker::cli::commands;
use golftracker::config::AppConfig;
use golftracker::geo::Position;
use golftracker::logging;

#[derive(Parser)]
#[command(name = "golftracker")]
#[command(about = "Shot-by-shot golf round tracker with GPS distances and round history")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List archived rounds, newest first
    History,

    /// Show an archived round's scorecard and one hole's shots
    Show {
        /// Round id, as printed by `history`
        round_id: String,

        /// Hole to show in detail
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=18))]
        hole: u8,

        /// Print the map drawing plan for the hole as JSON
        #[arg(long)]
        plan: bool,
    },

    /// Search the course directory
    Search {
        /// Free-text query, e.g. a club name or city
        query: String,
    },

    /// Distance between two coordinates
    Distance {
        #[arg(allow_hyphen_values = true)]
        lat1: f64,
        #[arg(allow_hyphen_values = true)]
        lon1: f64,
        #[arg(allow_hyphen_values = true)]
        lat2: f64,
        #[arg(allow_hyphen_values = true)]
        lon2: f64,
    },

    /// Record a round from line commands on stdin or in a script file
    Record {
        /// Course name for the new round
        #[arg(long)]
        course: String,

        /// Read commands from this file instead of stdin
        #[arg(long)]
        script: Option<String>,

        /// Device location used to center the map
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_hyphen_values = true)]
        location: Option<Vec<f64>>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::from_file_or_default(Path::new(&cli.config)) {
        Ok(c) => c.with_env_overrides(),
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&config);

    let result = match cli.command {
        Commands::History => commands::history(&config),
        Commands::Show {
            round_id,
            hole,
            plan,
        } => commands::show(&config, &round_id, hole, plan),
        Commands::Search { query } => commands::search(&config, &query).await,
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => commands::distance(
            config.distance_unit(),
            Position::new(lat1, lon1),
            Position::new(lat2, lon2),
        ),
        Commands::Record {
            course,
            script,
            location,
        } => {
            let location = location.and_then(|l| match l[..] {
                [lat, lon] => Some(Position::new(lat, lon)),
                _ => None,
            });
            commands::record(&config, &course, script.as_deref(), location)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
