use std::path::{Path, PathBuf};
use std::sync::Mutex;
use story2test::domain::ports::{CommandRunner, CommandStatus};
use story2test::{LaunchConfig, Launcher, Story2TestError};
use tempfile::TempDir;

/// Records invocations and simulates the venv tool by creating the
/// environment's bin directory.
struct RecordingRunner {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    env_bin: PathBuf,
}

impl RecordingRunner {
    fn new(env_dir: &Path) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            env_bin: env_dir.join("bin"),
        }
    }
}

impl CommandRunner for &RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> story2test::Result<CommandStatus> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        if args.iter().any(|a| a == "venv") {
            std::fs::create_dir_all(&self.env_bin)?;
        }
        Ok(CommandStatus { code: Some(0) })
    }
}

fn workspace(manifest: &str) -> (TempDir, LaunchConfig) {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    std::fs::write(root.join("requirements.txt"), manifest).unwrap();
    std::fs::write(root.join("streamlit_app.py"), "print('ui')\n").unwrap();

    let config = LaunchConfig {
        env_dir: root.join(".venv"),
        manifest: root.join("requirements.txt"),
        entry_point: root.join("streamlit_app.py"),
        python: "sh".to_string(),
        server: "streamlit".to_string(),
        config: None,
    };

    (temp, config)
}

#[test]
fn test_fresh_checkout_runs_full_sequence() {
    let (_temp, config) = workspace("streamlit\npandas\nopenai\n");
    let runner = RecordingRunner::new(&config.env_dir);

    let code = Launcher::new(config.clone(), &runner).run().unwrap();
    assert_eq!(code, 0);

    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 3);

    // 1. environment creation
    assert_eq!(calls[0].0, "sh");
    assert_eq!(
        calls[0].1,
        vec![
            "-m".to_string(),
            "venv".to_string(),
            config.env_dir.display().to_string()
        ]
    );

    // 2. dependency install against the manifest
    assert!(calls[1].1.contains(&"install".to_string()));
    assert_eq!(calls[1].1.last().unwrap(), &config.manifest.display().to_string());

    // 3. server launch is last and receives the entry point as final arg
    let (_, server_args) = calls.last().unwrap();
    assert_eq!(server_args[0], "run");
    assert_eq!(
        server_args.last().unwrap(),
        &config.entry_point.display().to_string()
    );
}

#[test]
fn test_second_run_reuses_environment() {
    let (_temp, config) = workspace("streamlit\n");
    let runner = RecordingRunner::new(&config.env_dir);

    Launcher::new(config.clone(), &runner).run().unwrap();
    Launcher::new(config.clone(), &runner).run().unwrap();

    let calls = runner.calls.lock().unwrap();
    let venv_calls = calls
        .iter()
        .filter(|(_, args)| args.iter().any(|a| a == "venv"))
        .count();
    assert_eq!(venv_calls, 1);
}

#[test]
fn test_missing_entry_point_fails_without_server() {
    let (temp, config) = workspace("streamlit\n");
    std::fs::remove_file(temp.path().join("streamlit_app.py")).unwrap();
    let runner = RecordingRunner::new(&config.env_dir);

    let err = Launcher::new(config, &runner).run().unwrap_err();
    assert!(matches!(err, Story2TestError::LaunchError { .. }));

    let calls = runner.calls.lock().unwrap();
    assert!(calls.iter().all(|(_, args)| args.first().map(String::as_str) != Some("run")));
}
