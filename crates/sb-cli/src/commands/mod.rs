//! CLI subcommand implementations.

pub mod categories;
pub mod list;
pub mod summary;
