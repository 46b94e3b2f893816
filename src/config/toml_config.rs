use crate::config::{GenerateConfig, LaunchConfig};
use crate::utils::error::{Result, Story2TestError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional TOML overrides. Values present in the file take precedence over
/// command-line flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: Option<ApiSection>,
    pub output: Option<OutputSection>,
    pub launch: Option<LaunchSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub formats: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchSection {
    pub env_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub entry_point: Option<PathBuf>,
    pub python: Option<String>,
    pub server: Option<String>,
}

impl TomlConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Story2TestError::ConfigError {
            message: format!("cannot parse {}: {}", path.display(), e),
        })
    }

    pub fn apply_to_generate(&self, config: &mut GenerateConfig) {
        if let Some(api) = &self.api {
            if let Some(base_url) = &api.base_url {
                config.api_base = base_url.clone();
            }
            if let Some(model) = &api.model {
                config.model = model.clone();
            }
            if let Some(temperature) = api.temperature {
                config.temperature = temperature;
            }
            if let Some(max_tokens) = api.max_tokens {
                config.max_tokens = max_tokens;
            }
            if let Some(timeout_seconds) = api.timeout_seconds {
                config.timeout_seconds = timeout_seconds;
            }
        }
        if let Some(output) = &self.output {
            if let Some(path) = &output.path {
                config.output_path = path.clone();
            }
            if let Some(formats) = &output.formats {
                config.formats = formats.clone();
            }
        }
    }

    pub fn apply_to_launch(&self, config: &mut LaunchConfig) {
        if let Some(launch) = &self.launch {
            if let Some(env_dir) = &launch.env_dir {
                config.env_dir = env_dir.clone();
            }
            if let Some(manifest) = &launch.manifest {
                config.manifest = manifest.clone();
            }
            if let Some(entry_point) = &launch.entry_point {
                config.entry_point = entry_point.clone();
            }
            if let Some(python) = &launch.python {
                config.python = python.clone();
            }
            if let Some(server) = &launch.server {
                config.server = server.clone();
            }
        }
    }
}
