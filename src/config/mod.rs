pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::llm::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::utils::error::{Result, Story2TestError};
use crate::utils::validation::{
    validate_non_empty_string, validate_output_formats, validate_positive_number, validate_range,
    validate_url, Validate,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "story2test")]
#[command(about = "Generate test cases from acceptance criteria with an LLM")]
pub struct Cli {
    #[command(subcommand)]
    pub command: AppCommand,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AppCommand {
    /// Generate test cases from acceptance criteria and export them
    Generate(GenerateConfig),
    /// Provision the Python environment and start the web UI
    Launch(LaunchConfig),
}

#[derive(Debug, Clone, Args)]
pub struct GenerateConfig {
    /// File with the acceptance criteria; reads stdin when omitted
    #[arg(long)]
    pub criteria_file: Option<PathBuf>,

    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv,xlsx")]
    pub formats: Vec<String>,

    #[arg(long, default_value_t = 0.0)]
    pub temperature: f64,

    #[arg(long, default_value_t = 1000)]
    pub max_tokens: u32,

    #[arg(long, default_value_t = 120)]
    pub timeout_seconds: u64,

    /// Optional TOML file; its values take precedence over flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Log process resource usage per stage")]
    pub monitor: bool,
}

impl GenerateConfig {
    /// CLI flag first, then the environment variable the original UI read.
    pub fn resolved_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            if !key.trim().is_empty() {
                return Ok(key.clone());
            }
        }
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Story2TestError::MissingConfigError {
                field: "api_key (--api-key or OPENAI_API_KEY)".to_string(),
            }),
        }
    }
}

impl ConfigProvider for GenerateConfig {
    fn model(&self) -> &str {
        &self.model
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

impl Validate for GenerateConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base", &self.api_base)?;
        validate_non_empty_string("model", &self.model)?;
        validate_non_empty_string("output_path", &self.output_path)?;
        validate_output_formats("formats", &self.formats)?;
        validate_range("temperature", self.temperature, 0.0, 2.0)?;
        validate_positive_number("max_tokens", self.max_tokens as usize, 1)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds as usize, 1)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
pub struct LaunchConfig {
    /// Environment directory; created on first run, reused afterwards
    #[arg(long, default_value = ".venv")]
    pub env_dir: PathBuf,

    /// Dependency manifest, one package specifier per line
    #[arg(long, default_value = "requirements.txt")]
    pub manifest: PathBuf,

    /// Script the UI server loads
    #[arg(long, default_value = "streamlit_app.py")]
    pub entry_point: PathBuf,

    /// Interpreter used to create the environment
    #[arg(long, default_value = "python3")]
    pub python: String,

    /// UI-server command resolved inside the environment
    #[arg(long, default_value = "streamlit")]
    pub server: String,

    /// Optional TOML file; its values take precedence over flags
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Validate for LaunchConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("env_dir", &self.env_dir.to_string_lossy())?;
        validate_non_empty_string("manifest", &self.manifest.to_string_lossy())?;
        validate_non_empty_string("entry_point", &self.entry_point.to_string_lossy())?;
        validate_non_empty_string("python", &self.python)?;
        validate_non_empty_string("server", &self.server)?;
        Ok(())
    }
}
