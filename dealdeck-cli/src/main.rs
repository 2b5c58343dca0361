//! dealdeck - browse discounted games from the command line
//!
//! One-shot commands print a table (or JSON) and exit; `browse` opens the
//! interactive browser.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use dealdeck_core::catalog::{SortKey, INITIAL_STORE_ID};
use dealdeck_core::gateway::DEFAULT_API_BASE;

mod deals_cli;
#[cfg(feature = "tui")]
mod tui;

use deals_cli::Settings;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "dealdeck",
    about = "Browse discounted games across storefronts via the CheapShark API",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level (defaults to warn, or off while browsing)
    #[clap(long, global = true)]
    log_level: Option<LogLevel>,

    /// Emit logs as JSON
    #[clap(long, global = true)]
    log_json: bool,

    /// Deals API root
    #[clap(long, global = true, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Storefront used for the initial listing
    #[clap(long, global = true, default_value = INITIAL_STORE_ID)]
    initial_store: String,

    /// Request timeout in seconds
    #[clap(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Parser, Debug)]
enum Command {
    /// List current deals from the initial storefront
    List {
        /// Only show deals from this store id
        #[clap(long)]
        store: Option<String>,

        /// Sort order (sale-price-asc, sale-price-desc, normal-price-asc,
        /// normal-price-desc, savings-desc, title-asc)
        #[clap(long)]
        sort: Option<SortKey>,

        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Search games by title
    Search {
        /// Title to search for; blank lists the initial storefront
        term: String,

        /// Only show deals from this store id
        #[clap(long)]
        store: Option<String>,

        /// Sort order
        #[clap(long)]
        sort: Option<SortKey>,

        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show details for one game
    Show {
        /// Game id as shown by `list` or `search`
        game_id: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// List the known storefronts
    Stores,

    /// Open the interactive browser
    #[cfg(feature = "tui")]
    Browse,
}

impl Command {
    fn is_interactive(&self) -> bool {
        match self {
            #[cfg(feature = "tui")]
            Command::Browse => true,
            _ => false,
        }
    }
}

fn initialize_tracing(log_level: Option<&LogLevel>, json: bool, interactive: bool) {
    let directive = match log_level {
        Some(level) => level.to_filter_directive(),
        // Anything written while the browser owns the screen corrupts it
        None if interactive => "off",
        None => "warn",
    };
    let filter = EnvFilter::new(directive);

    if json {
        // JSON output for structured logs - MUST go to stderr
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(
        cli.log_level.as_ref(),
        cli.log_json,
        cli.command.is_interactive(),
    );

    let settings = Settings::new(
        cli.api_base,
        cli.initial_store,
        cli.timeout_secs,
    )?;

    match cli.command {
        Command::List { store, sort, json } => {
            deals_cli::execute_list(&settings, store, sort, json).await
        }
        Command::Search {
            term,
            store,
            sort,
            json,
        } => deals_cli::execute_search(&settings, &term, store, sort, json).await,
        Command::Show { game_id, json } => deals_cli::execute_show(&settings, &game_id, json).await,
        Command::Stores => deals_cli::execute_stores(),
        #[cfg(feature = "tui")]
        Command::Browse => tui::run(&settings).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sort_accepts_kebab_and_camel_case() {
        let cli = Cli::try_parse_from(["dealdeck", "list", "--sort", "sale-price-desc"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::List {
                sort: Some(SortKey::SalePriceDesc),
                ..
            }
        ));

        let cli = Cli::try_parse_from(["dealdeck", "list", "--sort", "titleAsc"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::List {
                sort: Some(SortKey::TitleAsc),
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_sort_rejected() {
        assert!(Cli::try_parse_from(["dealdeck", "list", "--sort", "popularity"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dealdeck",
            "search",
            "portal",
            "--api-base",
            "http://localhost:9000",
            "--initial-store",
            "7",
        ])
        .unwrap();
        assert_eq!(cli.api_base, "http://localhost:9000");
        assert_eq!(cli.initial_store, "7");
        assert!(!cli.command.is_interactive());
    }
}
