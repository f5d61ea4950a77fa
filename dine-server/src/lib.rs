//! QR Dine server - Order Lifecycle Coordinator
//!
//! Customers check out from a table, the kitchen moves the order through
//! its lifecycle, and the tracker follows along. Every change is a command
//! turned into events in a redb-backed Order Ledger.
//!
//! # Module structure
//!
//! ```text
//! dine-server/src/
//! ├── core/          # config, state, server, errors
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # event-sourced ledger, sync, replica
//! └── utils/         # logging, input validation
//! ```

pub mod api;
pub mod core;
pub mod orders;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use orders::{LedgerReplica, ManagerError, OrderStorage, OrdersManager, SyncService};
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Load `.env`, create the work directory and start logging
///
/// Must run inside a Tokio runtime when file logging is enabled.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, config.log_json, log_dir.to_str())?;

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ____  ____    ____  _
 / __ \|  _ \  |  _ \(_)_ __   ___
| |  | | |_) | | | | | | '_ \ / _ \
| |__| |  _ <  | |_| | | | | |  __/
 \___\_\_| \_\ |____/|_|_| |_|\___|
    "#
    );
}
