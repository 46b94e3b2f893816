use crate::domain::model::{RawCompletion, TestSuite};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn model(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn temperature(&self) -> f64;
    fn max_tokens(&self) -> u32;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawCompletion>;
    async fn transform(&self, raw: RawCompletion) -> Result<TestSuite>;
    async fn load(&self, suite: TestSuite) -> Result<String>;
}

/// Exit status of an external command, decoupled from `std::process` so
/// launcher tests can fabricate outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner: Send + Sync {
    /// Runs a command to completion, inheriting stdio and environment.
    fn run(&self, program: &str, args: &[String]) -> Result<CommandStatus>;
}
