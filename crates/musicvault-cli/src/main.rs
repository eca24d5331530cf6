use anyhow::{Context, Result};
use clap::Parser;
use musicvault_core::{AccessGate, Config, Session, SqliteGateway};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod tui;

#[derive(Debug, Parser)]
#[command(name = "musicvault", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/musicvault/musicvault.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Unlock the archive with the shared access code
    ///
    /// The code is read from standard input when not given. A successful login
    /// is remembered in a session file next to the database until `logout`.
    Login {
        /// The access code
        code: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show database location and record counts
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Ragas: melodic frameworks with their aroha, avroha and pakad
    Raga {
        #[command(subcommand)]
        action: commands::raga::RagaAction,
    },
    /// Bandishes: compositions, usually set in a raga
    Bandish {
        #[command(subcommand)]
        action: commands::bandish::BandishAction,
    },
    /// Riyaz diary
    Diary {
        #[command(subcommand)]
        action: commands::diary::DiaryAction,
    },
    /// Karyakrams: planned performances
    Karyakram {
        #[command(subcommand)]
        action: commands::karyakram::KaryakramAction,
    },
    /// Show or edit the setlist of a karyakram
    ///
    /// Positions are 1-based as shown by `setlist <event>`. Every edit is
    /// applied locally first and then saved; if saving fails the command
    /// reports it and the next `setlist` shows the stored state.
    Setlist {
        /// Karyakram id
        event: musicvault_core::model::KaryakramId,

        #[command(subcommand)]
        action: Option<commands::setlist::SetlistAction>,
    },
    /// Search raga names and bandish titles
    ///
    /// Shows up to three ragas and `--limit` bandishes. Terms shorter than
    /// two characters are ignored.
    Search {
        term: String,
        /// Maximum number of bandishes
        #[arg(long, default_value_t = musicvault_core::catalog::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Step through a karyakram's setlist, one bandish at a time
    ///
    /// Keys: →/l/space next, ←/h previous, q quit.
    Perform {
        /// Karyakram id
        event: musicvault_core::model::KaryakramId,
    },
}

fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.db {
        Some(db_path) => Config::load_with_db_path(db_path)?,
        None => Config::load()?,
    };
    init_logging(&config.log_level);

    match cli.command {
        Commands::Login { code } => commands::session::login(&config, code)?,
        Commands::Logout => commands::session::logout(&config)?,
        Commands::Config { action } => commands::config::run(action)?,
        command => run_guarded(command, &config).await?,
    }

    Ok(())
}

async fn run_guarded(command: Commands, config: &Config) -> Result<()> {
    let session = Session::load(&config.data_dir());
    AccessGate::guard(session.as_ref())
        .map_err(|_| anyhow::anyhow!("Not logged in. Run 'musicvault login' first."))?;

    std::fs::create_dir_all(config.data_dir()).context("Failed to create data directory")?;
    tracing::debug!("Opening database at {}", config.database_path.display());
    let gateway = Arc::new(
        SqliteGateway::open(&config.database_path).context("Failed to open database")?,
    );

    match command {
        Commands::Status => commands::status::show_status(config, &gateway, session.as_ref()).await,
        Commands::Raga { action } => commands::raga::run(action, gateway).await,
        Commands::Bandish { action } => commands::bandish::run(action, gateway).await,
        Commands::Diary { action } => commands::diary::run(action, gateway).await,
        Commands::Karyakram { action } => commands::karyakram::run(action, gateway).await,
        Commands::Search { term, limit } => commands::search::run(&term, limit, gateway).await,
        Commands::Setlist { event, action } => {
            let action = action.unwrap_or(commands::setlist::SetlistAction::Show);
            commands::setlist::run(event, action, gateway).await
        }
        Commands::Perform { event } => commands::perform::run(event, gateway).await,
        Commands::Login { .. } | Commands::Logout | Commands::Config { .. } => Ok(()),
    }
}
