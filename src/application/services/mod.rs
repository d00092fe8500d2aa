//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FormTransport)
//! but are themselves concrete structs, not traits.

mod search;

pub use search::{SearchService, EMAIL_SEARCH_MODE, PASSWORD_SEARCH_MODE};
