pub mod codebuild;
pub mod codepipeline;
pub mod config;
pub mod logs;

pub use codebuild::CodeBuildClient;
pub use codepipeline::CodePipelineClient;
pub use config::{resolve_available_aws_config, AwsConfig};
pub use logs::CloudWatchLogsClient;

use aws_config::SdkConfig;
use lens_common::LensError;

/// SDK-backed clients for the three services, sharing one resolved configuration.
pub struct AwsClients {
    pub pipelines: CodePipelineClient,
    pub builds: CodeBuildClient,
    pub logs: CloudWatchLogsClient,
}

impl AwsClients {
    pub fn new_with_config(config: &SdkConfig) -> Self {
        Self {
            pipelines: CodePipelineClient::new_with_config(config),
            builds: CodeBuildClient::new_with_config(config),
            logs: CloudWatchLogsClient::new_with_config(config),
        }
    }

    pub async fn resolve(
        initialization_conf: AwsConfig,
        region: Option<&str>,
    ) -> Result<Self, LensError> {
        let config = resolve_available_aws_config(initialization_conf, region)
            .await
            .ok_or(LensError::CredentialsUnavailable)?;
        Ok(Self::new_with_config(&config))
    }
}
