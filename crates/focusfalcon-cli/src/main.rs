use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod runtime;

#[derive(Parser)]
#[command(name = "focusfalcon-cli", version, about = "FocusFalcon CLI")]
struct Cli {
    /// Evaluate as of this instant (RFC 3339) instead of the local clock
    #[arg(long, global = true, value_name = "RFC3339")]
    at: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default state for every missing key
    Init,
    /// Decide whether a URL would be blocked right now
    Check {
        url: String,
        /// Print the full verdict as JSON
        #[arg(long)]
        json: bool,
    },
    /// Focus session control
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Pause schedule blocking
    Pause {
        /// Confirm without prompting
        #[arg(long)]
        yes: bool,
    },
    /// Resume schedule blocking
    Resume,
    /// Print session, pause and schedule state as JSON
    Status,
    /// Blocked-site list management
    Sites {
        #[command(subcommand)]
        action: commands::sites::SitesAction,
    },
    /// Blocking schedule management
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Show the network block rules for the current site list
    Rules {
        #[arg(long)]
        json: bool,
    },
    /// Send a control message, e.g. '{"type":"DISABLE_BLOCKING"}'
    Message { json: String },
    /// Companion avatar
    Avatar {
        #[command(subcommand)]
        action: commands::avatar::AvatarAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions { shell: clap_complete::Shell },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOCUSFALCON_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let now = match runtime::parse_now(cli.at.as_deref()) {
        Ok(now) => now,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    let result = match cli.command {
        Commands::Init => commands::state::init(),
        Commands::Check { url, json } => commands::state::check(&url, json, &now),
        Commands::Focus { action } => commands::focus::run(action, &now),
        Commands::Pause { yes } => commands::focus::pause(yes, &now),
        Commands::Resume => commands::focus::resume(&now),
        Commands::Status => commands::state::status(&now),
        Commands::Sites { action } => commands::sites::run(action, &now),
        Commands::Schedule { action } => commands::schedule::run(action, &now),
        Commands::Rules { json } => commands::state::rules(json),
        Commands::Message { json } => commands::state::message(&json, &now),
        Commands::Avatar { action } => commands::avatar::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "focusfalcon-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
