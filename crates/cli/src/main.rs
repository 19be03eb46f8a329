// regscreen CLI - screen people against a registry and a sanctions blacklist

mod exit_codes;
mod screen;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;
use screen::{ConfigCommands, SourceArgs};

#[derive(Parser)]
#[command(name = "regscreen")]
#[command(about = "Screen people against a registry and a sanctions blacklist")]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a name and/or birth date; prints one JSON value
    #[command(after_help = "\
Examples:
  regscreen search --name Ivanov
  regscreen search --name 'Ivanov Ivan' --birth-date 01/01/1980
  regscreen search --name Ivanov --date1 01/05/2023 --date2 '31/05/2023 23:59'
  regscreen search --name Ivanov --registry-file reg.json --blacklist-file bl.json
  regscreen search                      # registry listing, no screening")]
    Search {
        #[command(flatten)]
        source: SourceArgs,

        /// Free-text name criteria
        #[arg(long)]
        name: Option<String>,

        /// Birth date criteria (DD/MM/YYYY)
        #[arg(long)]
        birth_date: Option<String>,

        /// Created-at range start: DD/MM/YYYY or 'DD/MM/YYYY HH:MM'
        #[arg(long)]
        date1: Option<String>,

        /// Created-at range end, inclusive (same formats as --date1)
        #[arg(long)]
        date2: Option<String>,

        /// Write JSON to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List registry records newest first, optionally by sanction level
    #[command(after_help = "\
Examples:
  regscreen list
  regscreen list --risk 2 --registry-file reg.json")]
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Only records with this sanction level
        #[arg(long)]
        risk: Option<i32>,

        /// Write JSON to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the identity fingerprint for name + birth date
    #[command(after_help = "\
Examples:
  regscreen fingerprint Ivanov Ivan --birth-date 01/01/1980
  regscreen fingerprint Petrov Petr Petrovich --json")]
    Fingerprint {
        last_name: String,
        first_name: String,
        #[arg(default_value = "")]
        middle_name: String,

        /// DD/MM/YYYY
        #[arg(long)]
        birth_date: Option<String>,

        /// Print {"hash": "..."} instead of the bare digest
        #[arg(long)]
        json: bool,
    },

    /// Client config commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Search { source, name, birth_date, date1, date2, output } => {
            screen::cmd_search(source, name, birth_date, date1, date2, output)
        }
        Commands::List { source, risk, output } => screen::cmd_list(source, risk, output),
        Commands::Fingerprint { last_name, first_name, middle_name, birth_date, json } => {
            screen::cmd_fingerprint(last_name, first_name, middle_name, birth_date, json)
        }
        Commands::Config(cmd) => screen::cmd_config(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
