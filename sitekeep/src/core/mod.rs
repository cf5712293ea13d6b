//! Deterministic text transforms behind every maintenance pass.
//!
//! Core modules must be free of I/O side effects. They take page text (and
//! probes for filesystem facts) and return the rewritten text, or `None` when
//! the page already satisfies the transform.

pub mod audit;
pub mod backfill;
pub mod blog_nav;
pub mod conflicts;
pub mod enhance;
pub mod hash_links;
pub mod headings;
pub mod link_check;
pub mod links;
pub mod markup;
pub mod nav;
pub mod placeholders;
pub mod rules;
