//! Bootstrap launcher for the UI server.
//!
//! Provisions an isolated Python environment, installs the dependency
//! manifest into it and hands control to the UI-server command. The
//! sequence is strictly linear and fail-fast: no retries, no rollback.

use crate::config::LaunchConfig;
use crate::domain::ports::{CommandRunner, CommandStatus};
use crate::utils::error::{Result, Story2TestError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs commands through `std::process`, inheriting stdio and environment.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandStatus> {
        let status = Command::new(program).args(args).status()?;
        Ok(CommandStatus {
            code: status.code(),
        })
    }
}

/// Package specifiers from a requirements-style manifest, ignoring blank
/// lines and `#` comments.
pub fn manifest_specs(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

pub struct Launcher<R: CommandRunner> {
    config: LaunchConfig,
    runner: R,
}

impl<R: CommandRunner> Launcher<R> {
    pub fn new(config: LaunchConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Runs the full bootstrap sequence and blocks until the server exits.
    /// Returns the server's exit code.
    pub fn run(&self) -> Result<i32> {
        self.ensure_environment()?;
        let bin_dir = self.activate()?;
        self.install_dependencies(&bin_dir)?;
        self.launch_server(&bin_dir)
    }

    /// Creates the environment directory once; an existing directory is
    /// reused as-is, never re-validated.
    fn ensure_environment(&self) -> Result<()> {
        if self.config.env_dir.exists() {
            tracing::debug!("Reusing existing environment: {}", self.config.env_dir.display());
            return Ok(());
        }

        which::which(&self.config.python).map_err(|_| Story2TestError::EnvCreationError {
            message: format!("Python interpreter '{}' not found in PATH", self.config.python),
        })?;

        println!("Creating environment at {}...", self.config.env_dir.display());
        let args = vec![
            "-m".to_string(),
            "venv".to_string(),
            self.config.env_dir.display().to_string(),
        ];
        let status = self
            .runner
            .run(&self.config.python, &args)
            .map_err(|e| Story2TestError::EnvCreationError {
                message: format!("failed to run '{} -m venv': {}", self.config.python, e),
            })?;

        if !status.success() {
            return Err(Story2TestError::EnvCreationError {
                message: format!(
                    "'{} -m venv' exited with code {:?}",
                    self.config.python, status.code
                ),
            });
        }

        Ok(())
    }

    /// Resolves the environment's executable directory. Invoking tools from
    /// here replaces interactive shell activation.
    fn activate(&self) -> Result<PathBuf> {
        let bin_name = if cfg!(windows) { "Scripts" } else { "bin" };
        let bin_dir = self.config.env_dir.join(bin_name);

        if !bin_dir.is_dir() {
            return Err(Story2TestError::EnvCreationError {
                message: format!(
                    "Environment at {} has no {} directory",
                    self.config.env_dir.display(),
                    bin_name
                ),
            });
        }

        Ok(bin_dir)
    }

    fn install_dependencies(&self, bin_dir: &Path) -> Result<()> {
        let manifest = &self.config.manifest;
        let content = std::fs::read_to_string(manifest).map_err(|e| {
            Story2TestError::DependencyInstallError {
                message: format!("cannot read manifest {}: {}", manifest.display(), e),
            }
        })?;

        let specs = manifest_specs(&content);
        if specs.is_empty() {
            tracing::info!("Manifest {} lists no packages, skipping install", manifest.display());
            return Ok(());
        }

        println!("Installing {} packages from {}...", specs.len(), manifest.display());
        let pip = env_command(bin_dir, "pip");
        let args = vec![
            "install".to_string(),
            "-r".to_string(),
            manifest.display().to_string(),
        ];
        let status =
            self.runner
                .run(&pip, &args)
                .map_err(|e| Story2TestError::DependencyInstallError {
                    message: format!("failed to run pip install: {}", e),
                })?;

        if !status.success() {
            return Err(Story2TestError::DependencyInstallError {
                message: format!("pip install exited with code {:?}", status.code),
            });
        }

        Ok(())
    }

    /// Blocking handoff: the launcher's lifetime becomes the server's.
    fn launch_server(&self, bin_dir: &Path) -> Result<i32> {
        let entry_point = &self.config.entry_point;
        if !entry_point.exists() {
            return Err(Story2TestError::LaunchError {
                message: format!("entry-point script {} not found", entry_point.display()),
            });
        }

        let server = env_command(bin_dir, &self.config.server);
        let args = vec!["run".to_string(), entry_point.display().to_string()];

        println!("Launching {} run {}...", self.config.server, entry_point.display());
        let status = self
            .runner
            .run(&server, &args)
            .map_err(|e| Story2TestError::LaunchError {
                message: format!("failed to run '{}': {}", self.config.server, e),
            })?;

        // 伺服器的退出碼原樣往外傳，訊號終止時視為 1
        Ok(status.code.unwrap_or(1))
    }
}

/// Prefers the environment-local executable, falling back to PATH lookup
/// when the environment does not provide the command.
fn env_command(bin_dir: &Path, name: &str) -> String {
    let candidate = bin_dir.join(name);
    if candidate.exists() {
        candidate.display().to_string()
    } else {
        name.to_string()
    }
}
