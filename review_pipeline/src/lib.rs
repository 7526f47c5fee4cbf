//! Review pipeline: configuration loading and the collect/analyze commands.

pub mod config;
pub mod run;

pub use config::{PipelineConfig, load_config_path, load_config_str};
pub use run::{CollectSummary, run_analyze, run_collect};
