//! Read-side seams over the three services the tracker talks to.
//!
//! `lens_aws` implements these on top of the AWS SDK; tests use the generated mocks.

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::types::{BuildLogsConfig, LogPage, LogQuery, PipelineDefinition, PipelineState};

#[automock]
#[async_trait]
pub trait PipelineApi: Send + Sync {
    async fn get_pipeline(&self, name: &str) -> Result<PipelineDefinition>;

    async fn get_pipeline_state(&self, name: &str) -> Result<PipelineState>;

    /// Id of the most recent execution of the pipeline.
    async fn latest_execution_id(&self, name: &str) -> Result<String>;

    /// Starts a new execution and returns its id.
    async fn start_execution(&self, name: &str) -> Result<String>;
}

#[automock]
#[async_trait]
pub trait BuildApi: Send + Sync {
    /// `None` when the project does not carry a logs configuration.
    async fn logs_config(&self, project: &str) -> Result<Option<BuildLogsConfig>>;
}

#[automock]
#[async_trait]
pub trait LogApi: Send + Sync {
    async fn filter_log_events(&self, query: &LogQuery) -> Result<LogPage>;
}
