//! pwnlook: search a leaked-credential index and extract structured records
//!
//! Layers, innermost first:
//! - [`domain`]: records, queries and the result-page parser
//! - [`application`]: the search service
//! - [`infrastructure`]: HTTP transport and service wiring
//! - [`cli`]: arguments, dispatch and rendering

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
