//! Franchise HQ Server - back-office for a delivery-franchise network
//!
//! # Architecture overview
//!
//! The server owns the monthly financial closing and reconciliation engine
//! for the franchise network:
//!
//! - **Database** (`db`): embedded SurrealDB storage; one repository per
//!   table (financial records, monthly summaries, franchises, notifications)
//! - **Finance** (`finance`): pure domain logic — tariff revenue derivation,
//!   trend series, advisory engine, break-even, expense reports
//! - **Services** (`services`): in-process message bus, live record feed,
//!   fire-and-forget notification emitter
//! - **HTTP API** (`api`): RESTful routes consumed by the SPA
//!
//! # Module structure
//!
//! ```text
//! hq-server/src/
//! ├── core/          # configuration, state, server bootstrap
//! ├── db/            # models + repositories (SurrealDB)
//! ├── finance/       # pure financial calculations
//! ├── services/      # bus, record feed, notifications
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # errors, logging, time helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod finance;
pub mod services;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::db::repository::{FinanceError, FinanceResult};
pub use crate::services::{MessageBus, NotificationService, RecordFeed};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging. Call once at process start.
pub fn setup_environment() -> anyhow::Result<()> {
    // Missing .env is fine; env vars may come from the shell
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ______                      __    _           __  ______
   / ____/________ _____  _____/ /_  (_)_______  / / / / __ \
  / /_  / ___/ __ `/ __ \/ ___/ __ \/ / ___/ _ \/ /_/ / / / /
 / __/ / /  / /_/ / / / / /__/ / / / (__  )  __/ __  / /_/ /
/_/   /_/   \__,_/_/ /_/\___/_/ /_/_/____/\___/_/ /_/\___\_\
    "#
    );
}
