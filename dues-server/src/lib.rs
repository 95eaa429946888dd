//! Dues Server - membership dues management backend
//!
//! # Module structure
//!
//! ```text
//! dues-server/src/
//! ├── core/          # Config, state, server startup
//! ├── api/           # HTTP routes and handlers
//! ├── store/         # Storage contract + PostgreSQL / JSON-file backends
//! └── utils/         # Errors, logging, validation helpers
//! ```

pub mod api;
pub mod core;
pub mod store;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load dotenv and initialize logging from the environment.
///
/// Must be called before [`Config::from_env`] so `.env` values are visible.
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(level.as_deref(), log_dir.as_deref());
}
