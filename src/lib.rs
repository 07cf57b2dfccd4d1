pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, MigrationConfig};
pub use core::{engine::MigrationEngine, list_copy::ListCopier, workflow_copy::WorkflowCopier};
pub use utils::error::{MigrateError, Result};
pub use utils::run_log::FileJournal;
