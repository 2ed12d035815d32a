//! Configuration management.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → semantic checks
//!     → Config (validated, immutable)
//!     → cloned into the lifecycle runner
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload. The store
//!   watch, not the config file, is the dynamic input of this process
//! - All fields have defaults to allow minimal configs

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{Config, HooksConfig, OrchestratorConfig, ServerConfig, StoreConfig};
