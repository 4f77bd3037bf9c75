//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/sprintzero/config.toml)
//! 3. Project config (.sprintzero/config.toml)
//! 4. Environment variables (SPRINTZERO_*)
//! 5. Explicit `--config` file (replaces 2-4)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
