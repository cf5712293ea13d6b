//! Maintenance passes for a hand-edited static HTML site.
//!
//! Every pass is a small, re-runnable transformation (or a read-only audit)
//! over the files of one site directory. The crate is split the same way as
//! each pass:
//!
//! - **[`core`]**: Pure string and markup transforms. No I/O.
//! - **[`io`]**: Configuration, filesystem walking, encodings, backups and git.
//! - **[`commands`]**: One module per subcommand, wiring `core` to `io`.

pub mod commands;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
