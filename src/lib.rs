pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::slot_pipeline::SlotPipeline;
pub use config::{WatchConfig, WatchSettings};
pub use crate::core::engine::WatchEngine;
pub use utils::error::{FetchError, Result, WatchError};
