//! I/O helpers for sitekeep commands.

pub mod backup;
pub mod config;
pub mod encoding;
pub mod git;
pub mod site;
