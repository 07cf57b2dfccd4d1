pub mod client;
pub mod engine;
pub mod inputs;
pub mod list_copy;
pub mod workflow_copy;

pub use crate::domain::model::{CopyAction, CopyOutcome, CopySummary, IdMappings, List, Workflow};
pub use crate::domain::ports::{ConfigProvider, CopyStep, Journal, Storage};
pub use crate::utils::error::Result;
