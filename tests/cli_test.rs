//! Tests for argument parsing and command handling

mod common;

use std::sync::Arc;

use clap::Parser;

use common::{record_block, result_page, status_error, ScriptedTransport};
use pwnlook::cli::args::{Cli, Commands, IdentityArgs};
use pwnlook::cli::commands::{identity_query, run_credential, run_identity};
use pwnlook::cli::CliError;
use pwnlook::config::Settings;
use pwnlook::domain::MatchTerm;
use pwnlook::exitcode;
use pwnlook::infrastructure::di::ServiceContainer;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("valid arguments")
}

fn identity_args(cli: &Cli) -> &IdentityArgs {
    match &cli.command {
        Some(Commands::Identity(args)) => args,
        other => panic!("expected identity command, got {other:?}"),
    }
}

fn container(transport: &Arc<ScriptedTransport>) -> ServiceContainer {
    ServiceContainer::with_deps(Settings::default(), transport.clone())
}

// ============================================================
// Argument parsing
// ============================================================

// Exit codes of the binary itself are checked in binary_test.rs.
#[test]
fn given_no_subcommand_when_parse_then_command_is_none() {
    let cli = parse(&["pwnlook"]);
    assert!(cli.command.is_none());
}

#[test]
fn given_exact_and_like_user_when_parse_then_rejected() {
    let result = Cli::try_parse_from(["pwnlook", "identity", "-u", "alice", "-U", "ali%"]);
    assert!(result.is_err());
}

#[test]
fn given_exact_and_like_domain_when_parse_then_rejected() {
    let result = Cli::try_parse_from(["pwnlook", "identity", "-d", "a.com", "-D", "%.com"]);
    assert!(result.is_err());
}

#[test]
fn given_credential_without_password_when_parse_then_rejected() {
    let result = Cli::try_parse_from(["pwnlook", "credential", "--json"]);
    assert!(result.is_err());
}

#[test]
fn given_like_user_and_exact_domain_when_parse_then_terms_match() {
    let cli = parse(&["pwnlook", "identity", "-U", "ali%", "-d", "example.com", "-j", "-s"]);
    let args = identity_args(&cli);

    assert_eq!(args.user_term(), Some(MatchTerm::Like("ali%".into())));
    assert_eq!(args.domain_term(), Some(MatchTerm::Exact("example.com".into())));
    assert!(args.output.json);
    assert!(args.output.sort);
    assert!(!args.output.remove_ids);
}

#[test]
fn given_global_flags_after_subcommand_when_parse_then_applied() {
    let cli = parse(&[
        "pwnlook", "credential", "pw1", "pw2", "--insecure", "--lenient", "--timeout", "5", "-vv",
    ]);

    assert!(cli.connection.insecure);
    assert!(cli.connection.lenient);
    assert_eq!(cli.connection.timeout, Some(5));
    assert_eq!(cli.verbose, 2);
    match &cli.command {
        Some(Commands::Credential(args)) => assert_eq!(args.passwords, vec!["pw1", "pw2"]),
        other => panic!("expected credential command, got {other:?}"),
    }
}

// ============================================================
// Identity validation happens before any request
// ============================================================

#[test]
fn given_no_user_and_no_domain_when_identity_then_exit_one_without_request() {
    let transport = Arc::new(ScriptedTransport::new());
    let cli = parse(&["pwnlook", "identity", "--json"]);

    let err = identity_query(identity_args(&cli)).unwrap_err();

    assert!(matches!(err, CliError::InvalidArgs(_)));
    assert_eq!(err.exit_code(), exitcode::FAILURE);
    assert!(transport.calls().is_empty());
}

#[test]
fn given_domain_only_when_identity_then_search_runs() {
    let transport = Arc::new(
        ScriptedTransport::new().respond(result_page(&record_block(
            7,
            "x",
            "example.com",
            "pw",
        ))),
    );
    let cli = parse(&["pwnlook", "identity", "-d", "example.com", "-r"]);
    let args = identity_args(&cli);

    let query = identity_query(args).expect("domain alone is enough");
    let rendered = run_identity(&container(&transport), &query, &args.output).unwrap();

    assert_eq!(transport.calls().len(), 1);
    assert_eq!(rendered.total, 1);
    assert!(rendered.text.contains("example.com"));
}

// ============================================================
// Credential command
// ============================================================

#[test]
fn given_several_passwords_when_credential_then_one_request_each_and_json_union() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(result_page(&record_block(1, "alice", "a.test", "pw1")))
            .respond(result_page(&record_block(2, "bob", "b.test", "pw2"))),
    );
    let cli = parse(&["pwnlook", "credential", "pw1", "pw2", "-j", "-s", "-r"]);
    let Some(Commands::Credential(args)) = &cli.command else {
        panic!("expected credential command");
    };

    let rendered = run_credential(&container(&transport), args).unwrap();

    assert_eq!(transport.calls().len(), 2);
    assert_eq!(
        rendered.text,
        r#"[{"luser":"alice","domain":"a.test","password":"pw1"},{"luser":"bob","domain":"b.test","password":"pw2"}]"#
    );
}

#[test]
fn given_failing_request_when_credential_then_unavailable_exit_code() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(result_page(&record_block(1, "alice", "a.test", "pw1")))
            .fail(status_error(500)),
    );
    let cli = parse(&["pwnlook", "credential", "pw1", "pw2"]);
    let Some(Commands::Credential(args)) = &cli.command else {
        panic!("expected credential command");
    };

    let err = run_credential(&container(&transport), args).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
}

#[test]
fn given_invalid_results_selector_when_search_then_config_exit_code() {
    let transport = Arc::new(ScriptedTransport::new());
    let settings = Settings {
        results_selector: "pre >>> ][".into(),
        ..Settings::default()
    };
    let container = ServiceContainer::with_deps(settings, transport.clone());
    let cli = parse(&["pwnlook", "credential", "pw1"]);
    let Some(Commands::Credential(args)) = &cli.command else {
        panic!("expected credential command");
    };

    let err = run_credential(&container, args).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::CONFIG);
    assert!(transport.calls().is_empty());
}
