//! Rendering of search results as JSON or as an aligned text table

use std::collections::HashSet;

use itertools::Itertools;
use serde::Serialize;

use crate::cli::args::OutputArgs;
use crate::domain::CredentialEntry;

/// A column of the text table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    User,
    Domain,
    Password,
}

impl Column {
    /// Header text; also the JSON key for the same field.
    pub fn header(self, opts: &OutputArgs) -> &'static str {
        match self {
            Column::Id => "id",
            Column::User if opts.merged_username => "user",
            Column::User => "luser",
            Column::Domain => "domain",
            Column::Password => "password",
        }
    }

    fn cell(self, entry: &CredentialEntry, opts: &OutputArgs) -> String {
        match self {
            Column::Id => entry.id().to_string(),
            Column::User if opts.merged_username => entry.merged_username(),
            Column::User => entry.luser().to_string(),
            Column::Domain => entry.domain().to_string(),
            Column::Password => entry.password().to_string(),
        }
    }
}

/// Columns selected by the output flags.
pub fn columns(opts: &OutputArgs) -> Vec<Column> {
    let mut cols = Vec::with_capacity(4);
    if !opts.remove_ids {
        cols.push(Column::Id);
    }
    cols.push(Column::User);
    if !opts.merged_username {
        cols.push(Column::Domain);
    }
    cols.push(Column::Password);
    cols
}

/// Put entries in output order: sorted by user if requested, otherwise as collected.
pub fn order_entries(entries: HashSet<CredentialEntry>, opts: &OutputArgs) -> Vec<CredentialEntry> {
    if opts.sort {
        entries
            .into_iter()
            .sorted_by(|a, b| a.luser().cmp(b.luser()).then_with(|| a.cmp(b)))
            .collect()
    } else {
        entries.into_iter().collect()
    }
}

#[derive(Serialize)]
struct EntryView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    luser: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<&'a str>,
    password: &'a str,
}

impl<'a> EntryView<'a> {
    fn new(entry: &'a CredentialEntry, opts: &OutputArgs) -> Self {
        let merged = opts.merged_username;
        Self {
            id: (!opts.remove_ids).then(|| entry.id()),
            luser: (!merged).then(|| entry.luser()),
            user: merged.then(|| entry.merged_username()),
            domain: (!merged).then(|| entry.domain()),
            password: entry.password(),
        }
    }
}

/// JSON array of entry objects. Placeholder records are kept.
pub fn render_json(entries: &[CredentialEntry], opts: &OutputArgs) -> serde_json::Result<String> {
    let views: Vec<EntryView> = entries.iter().map(|e| EntryView::new(e, opts)).collect();
    serde_json::to_string(&views)
}

/// Header and cell values of the text table.
///
/// Records whose user equals `placeholder_user` are left out.
pub fn table_rows(
    entries: &[CredentialEntry],
    opts: &OutputArgs,
    placeholder_user: &str,
) -> (Vec<&'static str>, Vec<Vec<String>>) {
    let cols = columns(opts);
    let headers = cols.iter().map(|c| c.header(opts)).collect();
    let rows = entries
        .iter()
        .filter(|e| e.luser() != placeholder_user)
        .map(|e| cols.iter().map(|c| c.cell(e, opts)).collect())
        .collect();
    (headers, rows)
}

/// Aligned text table. Empty when no rows remain after filtering.
pub fn render_table(entries: &[CredentialEntry], opts: &OutputArgs, placeholder_user: &str) -> String {
    let (headers, rows) = table_rows(entries, opts, placeholder_user);
    if rows.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .join("  ")
            .trim_end()
            .to_string()
    };

    std::iter::once(format_row(headers))
        .chain(
            rows.iter()
                .map(|row| format_row(row.iter().map(String::as_str).collect())),
        )
        .join("\n")
}
