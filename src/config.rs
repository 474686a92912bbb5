//! Settings for the console: audio defaults, screen and spectrum geometry,
//! which files count as music, and optional desktop integration.
//!
//! Everything has a default, so a missing or partial config file is fine.

mod load;
mod schema;

pub use load::{InvalidSetting, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
