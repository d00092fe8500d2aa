//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::SettingsOverrides;
use crate::domain::MatchTerm;

/// Search a leaked-credential index for accounts by e-mail parts or password
#[derive(Parser, Debug)]
#[command(name = "pwnlook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ~/.config/pwnlook/pwnlook.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Overrides for the search connection and parser
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Search form URL
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Proxy URL, e.g. socks5h://127.0.0.1:9050
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Accept invalid TLS certificates from the endpoint
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Skip malformed records instead of failing the search
    #[arg(long, global = true)]
    pub lenient: bool,
}

impl From<&ConnectionArgs> for SettingsOverrides {
    fn from(args: &ConnectionArgs) -> Self {
        Self {
            endpoint: args.endpoint.clone(),
            timeout_secs: args.timeout,
            proxy: args.proxy.clone(),
            accept_invalid_certs: args.insecure,
            lenient: args.lenient,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search by e-mail user and/or domain
    Identity(IdentityArgs),

    /// Search accounts using the given passwords
    Credential(CredentialArgs),

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug)]
pub struct IdentityArgs {
    /// Exact-match user name
    #[arg(short = 'u', long = "user", value_name = "USER", conflicts_with = "user_like")]
    pub user: Option<String>,

    /// User name pattern for a LIKE query
    #[arg(short = 'U', long = "user-like", value_name = "USER")]
    pub user_like: Option<String>,

    /// Exact-match domain name
    #[arg(short = 'd', long = "domain", value_name = "DOMAIN", conflicts_with = "domain_like")]
    pub domain: Option<String>,

    /// Domain name pattern for a LIKE query
    #[arg(short = 'D', long = "domain-like", value_name = "DOMAIN")]
    pub domain_like: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl IdentityArgs {
    pub fn user_term(&self) -> Option<MatchTerm> {
        term(&self.user, &self.user_like)
    }

    pub fn domain_term(&self) -> Option<MatchTerm> {
        term(&self.domain, &self.domain_like)
    }
}

fn term(exact: &Option<String>, like: &Option<String>) -> Option<MatchTerm> {
    match (exact, like) {
        (Some(v), _) => Some(MatchTerm::Exact(v.clone())),
        (None, Some(v)) => Some(MatchTerm::Like(v.clone())),
        (None, None) => None,
    }
}

#[derive(Args, Debug)]
pub struct CredentialArgs {
    /// Passwords to search for
    #[arg(value_name = "PASSWORD", required = true, num_args = 1..)]
    pub passwords: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Output shaping shared by both searches
#[derive(Args, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OutputArgs {
    /// Output the entries as JSON
    #[arg(short = 'j', long = "json")]
    pub json: bool,

    /// Do not output entry IDs
    #[arg(short = 'r', long = "remove-ids")]
    pub remove_ids: bool,

    /// Merge user and domain into one user@domain field
    #[arg(short = 'm', long = "merged-username")]
    pub merged_username: bool,

    /// Sort the entries by user
    #[arg(short = 's', long = "sort")]
    pub sort: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config
    Show,

    /// Show config path
    Path,

    /// Create config template
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}
