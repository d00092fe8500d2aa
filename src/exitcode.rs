//! Process exit codes
//!
//! 0, 1 and 2 follow the usual CLI convention; the rest are BSD sysexits.h compatible.

/// Successful termination, including searches without results
pub const OK: i32 = 0;

/// User or logic error (e.g. no search criteria)
pub const FAILURE: i32 = 1;

/// Command line usage error (no subcommand, malformed arguments)
pub const USAGE: i32 = 2;

/// Data format error (malformed result page)
pub const DATAERR: i32 = 65;

/// Service unavailable (HTTP status, timeout, connection failure)
pub const UNAVAILABLE: i32 = 69;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
