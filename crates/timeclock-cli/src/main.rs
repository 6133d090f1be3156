mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "timeclock",
    about = "Volunteer timeclock: kiosk server and attendance tools",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ~/.config/volunteer_hours/config.yaml)
    #[arg(long, global = true, env = "TIMECLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the kiosk web server
    Serve {
        /// Port to listen on (default: server.port from the config)
        #[arg(long)]
        port: Option<u16>,

        /// Open the kiosk page in a browser
        #[arg(long)]
        open: bool,

        /// Use an in-memory store seeded with a demo member instead of Ragic
        #[arg(long)]
        demo: bool,
    },

    /// Clock a member in or out of an event
    LogHours {
        member_id: String,

        /// Numeric event id
        #[arg(long)]
        event: i64,
    },

    /// List a member's open event signups
    Events { member_id: String },

    /// Look up a member's name
    Member { member_id: String },

    /// Print a member id as a terminal QR code for badge printing
    Qr { member_id: String },

    /// Show, validate or create the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve { port, open, demo } => cmd::serve::run(config, port, open, demo),
        Commands::LogHours { member_id, event } => {
            cmd::log_hours::run(config, &member_id, event, cli.json)
        }
        Commands::Events { member_id } => cmd::events::run(config, &member_id, cli.json),
        Commands::Member { member_id } => cmd::member::run(config, &member_id, cli.json),
        Commands::Qr { member_id } => cmd::qr::run(config, &member_id),
        Commands::Config { subcommand } => cmd::config::run(config, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
