use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct GenerationEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> GenerationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting test case generation...");

        // Extract
        println!("Requesting completion from the model...");
        let raw = self.pipeline.extract().await?;
        println!("Received {} characters of model output", raw.content.len());
        self.monitor.log_stage("extract");

        // Transform
        println!("Parsing test cases...");
        let suite = self.pipeline.transform(raw).await?;
        println!(
            "Parsed {} test cases ({} positive / {} negative)",
            suite.len(),
            suite.positive_count(),
            suite.negative_count()
        );
        self.monitor.log_stage("transform");

        // Load
        println!("Exporting test cases...");
        let output_path = self.pipeline.load(suite).await?;
        println!("Output saved to: {}", output_path);
        self.monitor.log_stage("load");

        Ok(output_path)
    }
}
