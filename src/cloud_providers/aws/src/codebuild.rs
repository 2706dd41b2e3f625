use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_codebuild as codebuild;
use aws_sdk_codebuild::error::DisplayErrorContext;
use aws_sdk_codebuild::types::{CloudWatchLogsConfig, LogsConfigStatusType};

use lens_common::api::BuildApi;
use lens_common::types::BuildLogsConfig;

pub struct CodeBuildClient {
    pub client: codebuild::Client,
}

impl CodeBuildClient {
    pub fn new_with_config(config: &SdkConfig) -> Self {
        Self {
            client: codebuild::Client::new(config),
        }
    }
}

#[async_trait]
impl BuildApi for CodeBuildClient {
    async fn logs_config(&self, project: &str) -> Result<Option<BuildLogsConfig>> {
        let output = self
            .client
            .batch_get_projects()
            .names(project)
            .send()
            .await
            .map_err(|err| anyhow::anyhow!("{}", DisplayErrorContext(&err)))
            .with_context(|| format!("BatchGetProjects failed for '{project}'"))?;
        tracing::debug!(?output, "BatchGetProjects response");

        if output.projects_not_found().iter().any(|name| name == project) {
            tracing::warn!(project, "CodeBuild project not found, using the default log group");
            return Ok(None);
        }

        Ok(output
            .projects()
            .iter()
            .find_map(|found| found.logs_config())
            .and_then(|logs| logs.cloud_watch_logs())
            .map(logs_config_from_sdk))
    }
}

fn logs_config_from_sdk(cloud_watch: &CloudWatchLogsConfig) -> BuildLogsConfig {
    BuildLogsConfig {
        cloud_watch_enabled: *cloud_watch.status() != LogsConfigStatusType::Disabled,
        group_name: cloud_watch.group_name().map(str::to_string),
        stream_name: cloud_watch.stream_name().map(str::to_string),
    }
}
