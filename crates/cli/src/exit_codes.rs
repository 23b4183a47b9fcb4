//! CLI Exit Code Registry
//!
//! Single source of truth for `shipmatch` exit codes.
//! Exit codes are part of the shell contract; schedulers key off them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad args, unreadable file argument)     |
//! | 3    | Invalid config (TOML parse or validation failure)    |
//! | 4    | Required input files missing                         |
//! | 5    | Runtime failure (read, write, serialization)         |
//! | 6    | Unreconciled orders (only with `--fail-on-unmatched`) |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown encoding label, unreadable file argument.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Batch (3-9)
// =============================================================================

/// Config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input folder unreadable, order report absent, or manifests missing (validate).
pub const EXIT_MISSING_INPUTS: u8 = 4;

/// Reading inputs or writing output failed mid-run.
pub const EXIT_RUNTIME: u8 = 5;

/// At least one order had no carrier match and `--fail-on-unmatched` was set.
pub const EXIT_UNMATCHED: u8 = 6;
