//! Result-page parser
//!
//! A result page embeds its records in a preformatted block, one record per
//! bracketed field list:
//!
//! ```text
//! Array
//! (
//!     [id] => 1
//!     [luser] => alice
//!     [domain] => example.com
//!     [password] => hunter2
//! )
//! ```
//!
//! Locating the block and rebuilding records from its text are kept apart:
//! [`EntryParser::extract_region`] only deals with markup, [`EntryParser::parse_payload`]
//! only with lines.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, instrument, trace, warn};

use crate::domain::entities::{CredentialEntry, ParseMode};
use crate::domain::error::{DomainError, DomainResult};

/// Tag-driven selector: the first `<pre>` element on the page.
pub const DEFAULT_RESULTS_SELECTOR: &str = "pre";

/// Structural selector matching the results block of the current page layout.
pub const STRUCTURAL_RESULTS_SELECTOR: &str = "#container > section:nth-child(5) > pre";

const FIELD_LINE_PATTERN: &str = r"^\s*\[(?P<field_name>[^\]]+)\] => (?P<field_value>.*)$";

/// Extracts [`CredentialEntry`] records from a result page.
///
/// Holds no per-document state, so one instance can parse any number of pages.
#[derive(Debug, Clone)]
pub struct EntryParser {
    region: Selector,
    field_line: Regex,
    mode: ParseMode,
}

impl Default for EntryParser {
    fn default() -> Self {
        Self {
            region: Selector::parse(DEFAULT_RESULTS_SELECTOR).expect("valid default selector"),
            field_line: Regex::new(FIELD_LINE_PATTERN).expect("valid field line pattern"),
            mode: ParseMode::default(),
        }
    }
}

impl EntryParser {
    /// Create a parser locating the results block with a CSS selector.
    pub fn new(results_selector: &str, mode: ParseMode) -> DomainResult<Self> {
        let region =
            Selector::parse(results_selector).map_err(|e| DomainError::InvalidSelector {
                selector: results_selector.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            region,
            mode,
            ..Self::default()
        })
    }

    /// Parse a full result page.
    ///
    /// A page without a results block yields an empty set.
    #[instrument(level = "debug", skip_all, fields(bytes = html.len()))]
    pub fn parse(&self, html: &str) -> DomainResult<HashSet<CredentialEntry>> {
        match self.extract_region(html) {
            Some(payload) => self.parse_payload(&payload),
            None => {
                debug!("no results block found, treating page as empty");
                Ok(HashSet::new())
            }
        }
    }

    /// Text content of the first element matching the results selector.
    pub fn extract_region(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.region)
            .next()
            .map(|element| element.text().collect::<String>())
    }

    /// Rebuild records from the text of a results block.
    ///
    /// Field lines accumulate into the current block, a line starting with `)`
    /// closes it. A block still open at the end of the text is discarded.
    pub fn parse_payload(&self, payload: &str) -> DomainResult<HashSet<CredentialEntry>> {
        let mut entries = HashSet::new();
        let mut fields: HashMap<String, String> = HashMap::new();

        for (line_no, line) in payload.lines().enumerate() {
            if let Some(caps) = self.field_line.captures(line) {
                fields.insert(
                    caps["field_name"].to_string(),
                    caps["field_value"].to_string(),
                );
            } else if line.starts_with(')') {
                match CredentialEntry::from_fields(std::mem::take(&mut fields)) {
                    Ok(entry) => {
                        trace!(id = entry.id(), "record closed");
                        entries.insert(entry);
                    }
                    Err(e) => match self.mode {
                        ParseMode::Strict => return Err(e),
                        ParseMode::Lenient => {
                            warn!(line = line_no + 1, "dropping malformed record: {e}");
                        }
                    },
                }
            }
        }

        if !fields.is_empty() {
            debug!(
                fields = fields.len(),
                "discarding unterminated record at end of results"
            );
        }

        Ok(entries)
    }
}
