pub mod config;
pub mod core;
pub mod domain;
pub mod export;
pub mod llm;
pub mod utils;

pub use config::{cli::LocalStorage, AppCommand, Cli, GenerateConfig, LaunchConfig};
pub use core::{
    engine::GenerationEngine,
    launcher::{Launcher, SystemRunner},
    pipeline::TestCasePipeline,
};
pub use domain::model::{Priority, TestCase, TestKind, TestSuite};
pub use llm::LlmClient;
pub use utils::error::{Result, Story2TestError};
