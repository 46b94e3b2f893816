pub mod engine;
pub mod launcher;
pub mod pipeline;

pub use crate::domain::model::{RawCompletion, TestSuite};
pub use crate::domain::ports::{CommandRunner, CommandStatus, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
