//! Credential search service
//!
//! Submits the service's search forms and turns result pages into entries.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{CredentialEntry, EntryParser, IdentityQuery, MatchTerm};
use crate::infrastructure::traits::{FormFields, FormTransport};

/// `submitform` value selecting the e-mail (user/domain) search.
pub const EMAIL_SEARCH_MODE: &str = "em";

/// `submitform` value selecting the password search.
pub const PASSWORD_SEARCH_MODE: &str = "pw";

/// Service for searching leaked credentials.
pub struct SearchService {
    transport: Arc<dyn FormTransport>,
    endpoint: String,
    parser: EntryParser,
}

impl SearchService {
    /// Create a new search service.
    pub fn new(
        transport: Arc<dyn FormTransport>,
        endpoint: impl Into<String>,
        parser: EntryParser,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            parser,
        }
    }

    /// Search by user and/or domain.
    #[instrument(level = "debug", skip(self))]
    pub fn search_identity(
        &self,
        query: &IdentityQuery,
    ) -> ApplicationResult<HashSet<CredentialEntry>> {
        let label = describe_identity(query);
        self.submit(&Self::identity_form(query), &label)
    }

    /// Search by a single password.
    #[instrument(level = "debug", skip_all)]
    pub fn search_password(&self, password: &str) -> ApplicationResult<HashSet<CredentialEntry>> {
        self.submit(&Self::password_form(password), "password search")
    }

    /// Search each password in turn and union the results.
    ///
    /// The first failing search aborts the whole operation.
    pub fn search_passwords<S: AsRef<str>>(
        &self,
        passwords: &[S],
    ) -> ApplicationResult<HashSet<CredentialEntry>> {
        let mut entries = HashSet::new();
        for (n, password) in passwords.iter().enumerate() {
            debug!("password search {}/{}", n + 1, passwords.len());
            entries.extend(self.search_password(password.as_ref())?);
        }
        Ok(entries)
    }

    /// Form fields of an identity search. Absent terms are left out.
    pub fn identity_form(query: &IdentityQuery) -> FormFields {
        let mut form = FormFields::new();
        if let Some(user) = query.user() {
            form.push(("luser", user.value().to_string()));
        }
        if let Some(domain) = query.domain() {
            form.push(("domain", domain.value().to_string()));
        }
        form.push(("luseropr", like_flag(query.user())));
        form.push(("domainopr", like_flag(query.domain())));
        form.push(("submitform", EMAIL_SEARCH_MODE.to_string()));
        form
    }

    /// Form fields of a password search.
    pub fn password_form(password: &str) -> FormFields {
        vec![
            ("password", password.to_string()),
            ("submitform", PASSWORD_SEARCH_MODE.to_string()),
        ]
    }

    fn submit(
        &self,
        form: &[(&'static str, String)],
        label: &str,
    ) -> ApplicationResult<HashSet<CredentialEntry>> {
        let body = self.transport.post_form(&self.endpoint, form)?;
        debug!("{label}: received {} bytes", body.len());

        let entries =
            self.parser
                .parse(&body)
                .map_err(|source| ApplicationError::MalformedResults {
                    query: label.to_string(),
                    source,
                })?;
        info!("{label}: {} entries", entries.len());
        Ok(entries)
    }
}

fn like_flag(term: Option<&MatchTerm>) -> String {
    match term {
        Some(t) if t.is_like() => "1".into(),
        _ => "0".into(),
    }
}

fn describe_identity(query: &IdentityQuery) -> String {
    let side = |term: Option<&MatchTerm>| match term {
        Some(MatchTerm::Exact(v)) => v.clone(),
        Some(MatchTerm::Like(v)) => format!("LIKE {v}"),
        None => "*".into(),
    };
    format!(
        "identity search (user: {}, domain: {})",
        side(query.user()),
        side(query.domain())
    )
}
