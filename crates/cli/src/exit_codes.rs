//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 60-69   | screen           | Search pipeline and record store codes   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use regscreen_screen::ScreenError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (e.g. cannot write output).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, malformed fingerprint input.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Screen (60-69)
// =============================================================================

/// A `--date1`/`--date2` bound matched neither accepted format.
pub const EXIT_SCREEN_DATE: u8 = 60;

/// The registry or blacklist lookup failed (network, HTTP, bad response,
/// unreadable fixture file).
pub const EXIT_SCREEN_SOURCE: u8 = 61;

/// Client config missing or invalid, or its token variable is unset.
pub const EXIT_SCREEN_CONFIG: u8 = 62;

/// Exit code for a failed search.
pub fn screen_exit_code(err: &ScreenError) -> u8 {
    match err {
        ScreenError::DateFormat { .. } => EXIT_SCREEN_DATE,
        ScreenError::Collaborator(_) => EXIT_SCREEN_SOURCE,
    }
}
