//! Shared helpers

pub mod testing;

/// Log targets of dependencies too chatty to be useful, even at trace level.
pub const NOISY_MODULES: [&str; 5] = ["html5ever", "selectors", "hyper", "reqwest", "rustls"];
