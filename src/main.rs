use clap::Parser;
use std::io::Read;
use story2test::config::toml_config::TomlConfig;
use story2test::core::launcher::SystemRunner;
use story2test::utils::error::ErrorSeverity;
use story2test::utils::{logger, validation::Validate};
use story2test::{
    AppCommand, Cli, GenerateConfig, GenerationEngine, LaunchConfig, Launcher, LlmClient,
    LocalStorage, Story2TestError, TestCasePipeline,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    match cli.command {
        AppCommand::Generate(config) => run_generate(config, cli.verbose).await,
        AppCommand::Launch(config) => run_launch(config),
    }
}

async fn run_generate(
    mut config: GenerateConfig,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting story2test generation");
    if verbose {
        tracing::debug!("Generate config: {:?}", config);
    }

    // 套用 TOML 覆寫後再驗證
    if let Some(path) = config.config.clone() {
        let toml_config = TomlConfig::from_file(&path)?;
        toml_config.apply_to_generate(&mut config);
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let api_key = match config.resolved_api_key() {
        Ok(key) => key,
        Err(e) => fail(&e),
    };

    let criteria = match read_criteria(&config) {
        Ok(text) => text,
        Err(e) => fail(&e),
    };

    let client = LlmClient::new(&config.api_base, &api_key, config.timeout_seconds)?;
    let storage = LocalStorage::new(config.output_path.clone());
    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = TestCasePipeline::new(storage, config, client, criteria);
    let engine = GenerationEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Test case generation completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Test case generation completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn run_launch(mut config: LaunchConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = config.config.clone() {
        let toml_config = TomlConfig::from_file(&path)?;
        toml_config.apply_to_launch(&mut config);
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    match Launcher::new(config, SystemRunner).run() {
        Ok(code) => {
            // 把伺服器自身的退出碼往外傳
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(e) => fail(&e),
    }
}

fn read_criteria(config: &GenerateConfig) -> story2test::Result<String> {
    match &config.criteria_file {
        Some(path) => {
            tracing::debug!("Reading acceptance criteria from {}", path.display());
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            tracing::debug!("Reading acceptance criteria from stdin");
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn fail(e: &Story2TestError) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}
