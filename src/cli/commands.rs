//! Command dispatch

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, CredentialArgs, IdentityArgs, OutputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::{output, render};
use crate::config::{expand_path, global_config_path, Settings, SettingsOverrides};
use crate::domain::{CredentialEntry, DomainError, IdentityQuery};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Run the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Identity(args)) => {
            let query = identity_query(args)?;
            let container = build_container(cli)?;
            emit(&run_identity(&container, &query, &args.output)?);
            Ok(())
        }
        Some(Commands::Credential(args)) => {
            let container = build_container(cli)?;
            emit(&run_credential(&container, args)?);
            Ok(())
        }
        Some(Commands::Config { command }) => run_config(cli, command),
        Some(Commands::Completion { shell }) => {
            print_completions(*shell);
            Ok(())
        }
        None => Err(CliError::Usage("no command given".into())),
    }
}

/// Effective settings: config file and environment, then command-line flags.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let overrides = SettingsOverrides::from(&cli.connection);
    let settings = Settings::load(cli.config.as_deref())?.apply_overrides(&overrides)?;
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?)?)
}

/// Validate identity arguments before anything touches the network.
pub fn identity_query(args: &IdentityArgs) -> CliResult<IdentityQuery> {
    IdentityQuery::new(args.user_term(), args.domain_term()).map_err(|e| match e {
        DomainError::EmptyQuery => {
            CliError::InvalidArgs("both domain and user cannot be empty".into())
        }
        other => CliError::from(crate::application::ApplicationError::from(other)),
    })
}

/// Search by identity and render the result.
#[instrument(level = "debug", skip(container))]
pub fn run_identity(
    container: &ServiceContainer,
    query: &IdentityQuery,
    opts: &OutputArgs,
) -> CliResult<Rendered> {
    let entries = container.search_service()?.search_identity(query)?;
    render_entries(entries, opts, &container.settings.placeholder_user)
}

/// Search every password and render the union of the results.
#[instrument(level = "debug", skip_all, fields(passwords = args.passwords.len()))]
pub fn run_credential(container: &ServiceContainer, args: &CredentialArgs) -> CliResult<Rendered> {
    let entries = container
        .search_service()?
        .search_passwords(&args.passwords)?;
    render_entries(entries, &args.output, &container.settings.placeholder_user)
}

/// Output of a search, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Entries found, placeholder records included
    pub total: usize,
    /// Text for stdout; empty when a table has no rows
    pub text: String,
}

/// Order and format entries according to the output flags.
pub fn render_entries(
    entries: HashSet<CredentialEntry>,
    opts: &OutputArgs,
    placeholder_user: &str,
) -> CliResult<Rendered> {
    let total = entries.len();
    let ordered = render::order_entries(entries, opts);
    let text = if opts.json {
        render::render_json(&ordered, opts)?
    } else {
        render::render_table(&ordered, opts, placeholder_user)
    };
    Ok(Rendered { total, text })
}

fn emit(rendered: &Rendered) {
    if rendered.text.is_empty() {
        output::note(&format!("no entries found ({} total)", rendered.total));
    } else {
        output::info(&rendered.text);
    }
}

fn config_file_path(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config {
        Some(path) => Ok(expand_path(path)),
        None => global_config_path()
            .ok_or_else(|| CliError::InvalidArgs("cannot determine config directory".into())),
    }
}

fn run_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::info(&config_file_path(cli)?.display());
        }
        ConfigCommands::Init { force } => {
            let path = config_file_path(cli)?;
            if path.exists() {
                if !force {
                    return Err(CliError::InvalidArgs(format!(
                        "config file already exists: {} (use --force to overwrite)",
                        path.display()
                    )));
                }
                output::warning(&format!("overwriting {}", path.display()));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    InfraError::io(format!("create {}", parent.display()), e)
                })?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
