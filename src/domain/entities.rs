//! Domain entities: core data structures

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Field names a record block must carry, in output order.
pub const REQUIRED_FIELDS: [&str; 4] = ["id", "luser", "domain", "password"];

/// One leaked credential as reported by the search service.
///
/// Equality and hashing cover all four fields, so a `HashSet` of entries
/// collapses blocks that were emitted more than once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CredentialEntry {
    id: i64,
    luser: String,
    domain: String,
    password: String,
}

impl CredentialEntry {
    pub fn new(
        id: i64,
        luser: impl Into<String>,
        domain: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            luser: luser.into(),
            domain: domain.into(),
            password: password.into(),
        }
    }

    /// Build an entry from the fields collected for one record block.
    ///
    /// The block must hold exactly `id`, `luser`, `domain` and `password`.
    /// A missing field is reported in [`REQUIRED_FIELDS`] order.
    /// The `id` value is parsed as a base-10 `i64`; surrounding whitespace is ignored.
    pub fn from_fields(mut fields: HashMap<String, String>) -> DomainResult<Self> {
        let [raw_id, luser, domain, password] = REQUIRED_FIELDS
            .map(|name| fields.remove(name).ok_or(DomainError::MissingField(name)));
        let (raw_id, luser, domain, password) = (raw_id?, luser?, domain?, password?);

        if let Some(extra) = fields.into_keys().min() {
            return Err(DomainError::UnexpectedField(extra));
        }

        let id = raw_id
            .trim()
            .parse::<i64>()
            .map_err(|source| DomainError::InvalidId {
                value: raw_id.clone(),
                source,
            })?;

        Ok(Self::new(id, luser, domain, password))
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn luser(&self) -> &str {
        &self.luser
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// `luser@domain`
    pub fn merged_username(&self) -> String {
        format!("{}@{}", self.luser, self.domain)
    }
}

/// One side of an identity search: exact match or a `LIKE` pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchTerm {
    Exact(String),
    Like(String),
}

impl MatchTerm {
    pub fn value(&self) -> &str {
        match self {
            MatchTerm::Exact(v) | MatchTerm::Like(v) => v,
        }
    }

    pub fn is_like(&self) -> bool {
        matches!(self, MatchTerm::Like(_))
    }
}

/// Validated search by user and/or domain. At least one side is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityQuery {
    user: Option<MatchTerm>,
    domain: Option<MatchTerm>,
}

impl IdentityQuery {
    pub fn new(user: Option<MatchTerm>, domain: Option<MatchTerm>) -> DomainResult<Self> {
        // Empty strings count as absent: the service treats them the same way.
        let user = user.filter(|t| !t.value().is_empty());
        let domain = domain.filter(|t| !t.value().is_empty());
        if user.is_none() && domain.is_none() {
            return Err(DomainError::EmptyQuery);
        }
        Ok(Self { user, domain })
    }

    pub fn user(&self) -> Option<&MatchTerm> {
        self.user.as_ref()
    }

    pub fn domain(&self) -> Option<&MatchTerm> {
        self.domain.as_ref()
    }
}

/// What to do with a terminated block that cannot be turned into an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Abort the whole parse with the construction error.
    #[default]
    Strict,
    /// Drop the block, log a warning and keep scanning.
    Lenient,
}
