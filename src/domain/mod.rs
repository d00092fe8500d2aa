//! Domain layer: records, queries and the result-page parser
//!
//! This layer is independent of external concerns (no network, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod parser;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use parser::{EntryParser, DEFAULT_RESULTS_SELECTOR, STRUCTURAL_RESULTS_SELECTOR};
