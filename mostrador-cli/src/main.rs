//! Mostrador CLI: inspect the back-office policy and manage the local session.
//!
//! ```bash
//! mostrador nav --roles ventas
//! mostrador access dashboards.cajas --roles cajero
//! mostrador login ana --password secreto
//! mostrador guard /dashboards/configuraciones/usuarios
//! ```
//!
//! Settings come from `mostrador.toml` and `MOSTRADOR_*` environment variables.

mod commands;

use clap::{Parser, Subcommand};
use mostrador_core::config::{MostradorConfig, DEFAULT_CONFIG_FILE};
use mostrador_core::logging::{init_logging, LogLevel};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mostrador", about = "Mostrador back-office access control", version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the navigation menu visible to a role set
    Nav {
        /// Comma-separated roles; the signed-in identity when omitted
        #[arg(long, value_delimiter = ',')]
        roles: Option<Vec<String>>,

        /// Print the filtered tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a role set grants a module
    Access {
        /// Module path, e.g. dashboards.ventas
        module: String,

        #[arg(long, value_delimiter = ',')]
        roles: Option<Vec<String>>,
    },
    /// Evaluate the route guard for a location
    Guard {
        /// Location, e.g. /dashboards/cajas?turno=2
        href: String,

        #[arg(long, value_delimiter = ',')]
        roles: Option<Vec<String>>,
    },
    /// Sign in and persist the session
    Login {
        username: String,

        /// Password (read from MOSTRADOR_PASSWORD when omitted)
        #[arg(long, env = "MOSTRADOR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and erase the persisted session
    Logout,
    /// Show the persisted identity
    Whoami {
        /// Confirm the session with the server
        #[arg(long)]
        check: bool,
    },
}

fn load_config(path: &PathBuf, verbose: bool) -> anyhow::Result<MostradorConfig> {
    let config = MostradorConfig::load_from(path)?;

    // RUST_LOG takes over when set, as with any env_logger binary
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
    } else {
        let mut logging = config.logging.to_logging()?;
        if verbose {
            logging = logging.with_level(LogLevel::Debug);
        }
        init_logging(&logging)?;
    }

    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.config, cli.verbose)?;

    match cli.command {
        Commands::Nav { roles, json } => commands::inspect::nav(config, roles, json).await,
        Commands::Access { module, roles } => commands::inspect::access(config, &module, roles).await,
        Commands::Guard { href, roles } => commands::inspect::guard(config, &href, roles).await,
        Commands::Login { username, password } => {
            commands::session::login(config, &username, &password).await
        }
        Commands::Logout => commands::session::logout(config).await,
        Commands::Whoami { check } => commands::session::whoami(config, check).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
