//! Stable exit codes for sitekeep CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid invocation or config, missing site directory or other fatal errors.
pub const INVALID: i32 = 1;
/// `audit` or `check-links` found issues.
pub const ISSUES: i32 = 2;
