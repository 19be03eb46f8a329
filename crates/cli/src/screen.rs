//! `regscreen search` / `list` / `fingerprint`: screening from the shell.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use regscreen_client::{ClientConfig, ClientError, RegistryClient};
use regscreen_screen::response::{error_body, into_http};
use regscreen_screen::{MemorySearchClient, SearchClient, SearchCriteria, SearchRequest};

use crate::exit_codes::{screen_exit_code, EXIT_ERROR, EXIT_SCREEN_CONFIG, EXIT_SCREEN_SOURCE, EXIT_USAGE};
use crate::CliError;

/// Where records come from: a live record store or local JSON fixtures.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Client config (default: <config dir>/regscreen/config.toml)
    #[arg(long, env = "REGSCREEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read registry records from a JSON file instead of the record store
    #[arg(long)]
    pub registry_file: Option<PathBuf>,

    /// Read blacklist records from a JSON file (requires --registry-file)
    #[arg(long, requires = "registry_file")]
    pub blacklist_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a client config file without searching
    #[command(after_help = "\
Examples:
  regscreen config check
  regscreen config check ./regscreen.toml")]
    Check {
        /// Config path (default: <config dir>/regscreen/config.toml)
        path: Option<PathBuf>,
    },
}

fn screen_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn config_err(err: ClientError) -> CliError {
    let hint = match &err {
        ClientError::MissingToken(var) => Some(format!("export {var}=<token>")),
        _ => None,
    };
    CliError { code: EXIT_SCREEN_CONFIG, message: err.to_string(), hint }
}

fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    explicit.or_else(ClientConfig::default_path).ok_or_else(|| {
        screen_err(EXIT_SCREEN_CONFIG, "cannot determine config directory")
            .with_hint("pass --config <path>")
    })
}

/// Build the search client the flags ask for.
pub fn open_source(args: &SourceArgs) -> Result<Box<dyn SearchClient>, CliError> {
    if let Some(registry_path) = &args.registry_file {
        let registry = read_fixture(registry_path)?;
        let blacklist = match &args.blacklist_file {
            Some(path) => read_fixture(path)?,
            None => "[]".to_string(),
        };
        let client = MemorySearchClient::from_json(&registry, &blacklist)
            .map_err(|e| screen_err(EXIT_SCREEN_SOURCE, e.to_string()))?;
        log::debug!("using fixture records from {}", registry_path.display());
        return Ok(Box::new(client));
    }

    let path = resolve_config_path(args.config.clone())?;
    let config = ClientConfig::load(&path).map_err(|e| {
        config_err(e).with_hint(format!(
            "create {} or use --registry-file for offline screening",
            path.display()
        ))
    })?;
    log::debug!("record store at {}", config.api_base);
    let client = RegistryClient::new(config).map_err(config_err)?;
    Ok(Box::new(client))
}

fn read_fixture(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| screen_err(EXIT_SCREEN_SOURCE, format!("cannot read {}: {e}", path.display())))
}

fn emit_json(value: &serde_json::Value, output: Option<&Path>) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| screen_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .map_err(|e| screen_err(EXIT_ERROR, format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

// ============================================================================
// search
// ============================================================================

/// Runs the pipeline and writes exactly one JSON value: the record array on
/// success, `{"error": "..."}` on failure.
pub fn cmd_search(
    source: SourceArgs,
    name: Option<String>,
    birth_date: Option<String>,
    date1: Option<String>,
    date2: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let client = match open_source(&source) {
        Ok(client) => client,
        Err(err) => {
            let (_, body) = error_body(&err.message);
            emit_json(&body, output.as_deref())?;
            return Err(err);
        }
    };

    let request = SearchRequest {
        criteria: SearchCriteria { name, birth_date },
        date1,
        date2,
    };

    let result = regscreen_screen::search(client.as_ref(), &request);
    let failure = result
        .as_ref()
        .err()
        .map(|e| screen_err(screen_exit_code(e), e.to_string()));
    if let Ok(outcome) = &result {
        if !outcome.is_screened() {
            eprintln!("no name or birth date given: registry listing, not screened");
        }
    }

    let (_, body) = into_http(result);
    emit_json(&body, output.as_deref())?;

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// ============================================================================
// list
// ============================================================================

pub fn cmd_list(source: SourceArgs, risk: Option<i32>, output: Option<PathBuf>) -> Result<(), CliError> {
    let client = open_source(&source)?;
    let records = regscreen_screen::list_registry(client.as_ref(), risk)
        .map_err(|e| screen_err(screen_exit_code(&e), e.to_string()))?;
    let body = serde_json::to_value(&records)
        .map_err(|e| screen_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
    emit_json(&body, output.as_deref())
}

// ============================================================================
// fingerprint
// ============================================================================

pub fn cmd_fingerprint(
    last_name: String,
    first_name: String,
    middle_name: String,
    birth_date: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let dob = birth_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| {
            chrono::NaiveDate::parse_from_str(d, regscreen_screen::fingerprint::BIRTH_DATE_FORMAT)
                .map_err(|_| {
                    screen_err(EXIT_USAGE, format!("invalid --birth-date '{d}'"))
                        .with_hint("use DD/MM/YYYY, e.g. 01/01/1980")
                })
        })
        .transpose()?;

    let hash = regscreen_screen::fingerprint(&last_name, &first_name, &middle_name, dob);
    if json {
        emit_json(&serde_json::json!({ "hash": hash }), None)
    } else {
        println!("{hash}");
        Ok(())
    }
}

// ============================================================================
// config
// ============================================================================

pub fn cmd_config(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Check { path } => {
            let path = resolve_config_path(path)?;
            let config = ClientConfig::load(&path).map_err(config_err)?;
            config.resolve_token().map_err(config_err)?;
            eprintln!(
                "ok: {} (registry: {}, blacklist: {}, timeout {}s)",
                config.api_base,
                config.sources.registry,
                config.sources.blacklist,
                config.timeout_secs
            );
            Ok(())
        }
    }
}
