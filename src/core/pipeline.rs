use crate::core::{ConfigProvider, Pipeline, RawCompletion, Storage, TestSuite};
use crate::domain::model::GenerationPayload;
use crate::export::{self, xlsx};
use crate::llm::{build_prompt, extract_json, LlmClient};
use crate::utils::error::{Result, Story2TestError};
use std::path::Path;

fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

pub struct TestCasePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: LlmClient,
    acceptance_criteria: String,
}

impl<S: Storage, C: ConfigProvider> TestCasePipeline<S, C> {
    pub fn new(storage: S, config: C, client: LlmClient, acceptance_criteria: String) -> Self {
        Self {
            storage,
            config,
            client,
            acceptance_criteria,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TestCasePipeline<S, C> {
    async fn extract(&self) -> Result<RawCompletion> {
        if self.acceptance_criteria.trim().is_empty() {
            return Err(Story2TestError::ConfigError {
                message: "Acceptance criteria text is empty".to_string(),
            });
        }

        let prompt = build_prompt(&self.acceptance_criteria);
        tracing::debug!(
            "Requesting completion from model {} ({} chars of criteria)",
            self.config.model(),
            self.acceptance_criteria.len()
        );

        let content = self
            .client
            .chat_completion(
                self.config.model(),
                &prompt,
                self.config.max_tokens(),
                self.config.temperature(),
            )
            .await?;

        Ok(RawCompletion {
            content,
            model: self.config.model().to_string(),
        })
    }

    async fn transform(&self, raw: RawCompletion) -> Result<TestSuite> {
        let value = extract_json(&raw.content).ok_or_else(|| {
            tracing::debug!("Raw model output: {}", raw.content);
            Story2TestError::ProcessingError {
                message: format!(
                    "Could not parse JSON output: {}",
                    truncate_for_log(&raw.content, 200)
                ),
            }
        })?;

        // 模型偶爾會漏掉其中一個分類，但兩個都沒有就視為失敗
        let has_expected_keys = value
            .as_object()
            .map(|obj| obj.contains_key("positive") || obj.contains_key("negative"))
            .unwrap_or(false);
        if !has_expected_keys {
            tracing::debug!("Raw model output: {}", raw.content);
            return Err(Story2TestError::ProcessingError {
                message: format!(
                    "Model output has neither 'positive' nor 'negative' tests: {}",
                    truncate_for_log(&raw.content, 200)
                ),
            });
        }

        let payload: GenerationPayload = serde_json::from_value(value)?;
        let suite = TestSuite::from_payload(payload);

        if suite.is_empty() {
            tracing::warn!("Model {} returned zero test cases", raw.model);
        }

        Ok(suite)
    }

    async fn load(&self, suite: TestSuite) -> Result<String> {
        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => {
                    let csv_output = export::suite_to_csv(&suite)?;
                    tracing::debug!("Writing CSV ({} bytes)", csv_output.len());
                    self.storage
                        .write_file(export::CSV_FILENAME, csv_output.as_bytes())
                        .await?;
                }
                "xlsx" => {
                    let workbook = xlsx::suite_to_xlsx(&suite)?;
                    tracing::debug!("Writing XLSX ({} bytes)", workbook.len());
                    self.storage
                        .write_file(export::XLSX_FILENAME, &workbook)
                        .await?;
                }
                other => {
                    // 配置驗證應該已擋下，保險起見仍回報
                    return Err(Story2TestError::ConfigError {
                        message: format!("Unknown output format: {}", other),
                    });
                }
            }
        }

        let output_path = Path::new(self.config.output_path())
            .display()
            .to_string();
        Ok(output_path)
    }
}
