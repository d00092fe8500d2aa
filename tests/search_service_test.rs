//! Tests for SearchService against a scripted transport

mod common;

use std::sync::Arc;

use common::{page_without_results, record_block, result_page, status_error, ScriptedTransport};
use pwnlook::application::{ApplicationError, SearchService};
use pwnlook::domain::{
    CredentialEntry, DomainError, EntryParser, IdentityQuery, MatchTerm, ParseMode,
};
use pwnlook::infrastructure::TransportError;
use pwnlook::util::testing;

const ENDPOINT: &str = "https://search.test/";

fn service(transport: &Arc<ScriptedTransport>) -> SearchService {
    SearchService::new(transport.clone(), ENDPOINT, EntryParser::default())
}

fn form_value<'a>(form: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
    form.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

// ============================================================
// Identity search
// ============================================================

#[test]
fn given_like_user_when_search_identity_then_posts_email_form() {
    testing::init_test_setup();
    let transport = Arc::new(
        ScriptedTransport::new().respond(result_page(&record_block(
            5,
            "alice",
            "example.com",
            "hunter2",
        ))),
    );
    let query = IdentityQuery::new(
        Some(MatchTerm::Like("ali%".into())),
        Some(MatchTerm::Exact("example.com".into())),
    )
    .unwrap();

    let entries = service(&transport).search_identity(&query).unwrap();

    assert!(entries.contains(&CredentialEntry::new(5, "alice", "example.com", "hunter2")));
    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let (url, form) = &calls[0];
    assert_eq!(url, ENDPOINT);
    assert_eq!(form_value(form, "luser"), Some("ali%"));
    assert_eq!(form_value(form, "domain"), Some("example.com"));
    assert_eq!(form_value(form, "luseropr"), Some("1"));
    assert_eq!(form_value(form, "domainopr"), Some("0"));
    assert_eq!(form_value(form, "submitform"), Some("em"));
}

#[test]
fn given_no_results_block_when_search_identity_then_empty_not_error() {
    let transport = Arc::new(ScriptedTransport::new().respond(page_without_results()));
    let query = IdentityQuery::new(None, Some(MatchTerm::Exact("example.com".into()))).unwrap();

    let entries = service(&transport).search_identity(&query).unwrap();

    assert!(entries.is_empty());
}

#[test]
fn given_error_status_when_search_identity_then_transport_error_propagates() {
    let transport = Arc::new(ScriptedTransport::new().fail(status_error(502)));
    let query = IdentityQuery::new(Some(MatchTerm::Exact("alice".into())), None).unwrap();

    let err = service(&transport).search_identity(&query).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Transport(TransportError::Status { status: 502, .. })
    ));
}

#[test]
fn given_malformed_record_when_strict_search_then_malformed_results_error() {
    let page = result_page("    [id] => x\n    [luser] => a\n    [domain] => b\n    [password] => c\n)\n");
    let transport = Arc::new(ScriptedTransport::new().respond(page));
    let query = IdentityQuery::new(Some(MatchTerm::Exact("a".into())), None).unwrap();

    let err = service(&transport).search_identity(&query).unwrap_err();

    match err {
        ApplicationError::MalformedResults { query, source } => {
            assert!(query.contains("identity search"));
            assert!(matches!(source, DomainError::InvalidId { .. }));
        }
        other => panic!("expected MalformedResults, got {other:?}"),
    }
}

// ============================================================
// Password search
// ============================================================

#[test]
fn given_password_when_search_password_then_posts_password_form() {
    let transport = Arc::new(ScriptedTransport::new().respond(result_page("")));

    service(&transport).search_password("hunter2").unwrap();

    let calls = transport.calls();
    let (_, form) = &calls[0];
    assert_eq!(form_value(form, "password"), Some("hunter2"));
    assert_eq!(form_value(form, "submitform"), Some("pw"));
    assert_eq!(form_value(form, "luser"), None);
}

#[test]
fn given_overlapping_results_when_search_passwords_then_union_without_duplicates() {
    let shared = record_block(1, "alice", "example.com", "hunter2");
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(result_page(&shared))
            .respond(result_page(
                &[shared.clone(), record_block(2, "bob", "example.org", "letmein")].concat(),
            )),
    );

    let entries = service(&transport)
        .search_passwords(&["hunter2", "letmein"])
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(transport.calls().len(), 2);
}

#[test]
fn given_second_request_fails_when_search_passwords_then_whole_search_fails() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(result_page(&record_block(1, "alice", "example.com", "hunter2")))
            .fail(TransportError::Timeout {
                url: ENDPOINT.into(),
            }),
    );

    let err = service(&transport)
        .search_passwords(&["hunter2", "letmein"])
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Transport(TransportError::Timeout { .. })
    ));
}

#[test]
fn given_lenient_parser_when_search_password_then_malformed_block_skipped() {
    let page = result_page(
        &[
            "    [id] => 1\n    [luser] => a\n)\n".to_string(),
            record_block(2, "b", "c.test", "d"),
        ]
        .concat(),
    );
    let transport = Arc::new(ScriptedTransport::new().respond(page));
    let service = SearchService::new(
        transport.clone(),
        ENDPOINT,
        EntryParser::new("pre", ParseMode::Lenient).unwrap(),
    );

    let entries = service.search_password("d").unwrap();

    assert_eq!(entries.len(), 1);
    assert!(entries.contains(&CredentialEntry::new(2, "b", "c.test", "d")));
}
