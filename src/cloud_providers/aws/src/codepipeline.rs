use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_codepipeline as codepipeline;
use aws_sdk_codepipeline::error::DisplayErrorContext;
use aws_sdk_codepipeline::primitives::DateTime as SdkDateTime;
use chrono::{DateTime, Utc};

use lens_common::api::PipelineApi;
use lens_common::types::{
    ActionCategory, ActionDefinition, ActionExecution, ActionState, ExecutionStatus,
    PipelineDefinition, PipelineState, StageDefinition, StageExecution, StageState,
};
use lens_common::LensError;

const SERVICE: &str = "CodePipeline";

pub struct CodePipelineClient {
    pub client: codepipeline::Client,
}

impl CodePipelineClient {
    pub fn new_with_config(config: &SdkConfig) -> Self {
        Self {
            client: codepipeline::Client::new(config),
        }
    }
}

#[async_trait]
impl PipelineApi for CodePipelineClient {
    async fn get_pipeline(&self, name: &str) -> Result<PipelineDefinition> {
        let output = match self.client.get_pipeline().name(name).send().await {
            Ok(output) => output,
            Err(err) => {
                if let Some(service_error) = err.as_service_error() {
                    if service_error.is_pipeline_not_found_exception() {
                        return Err(LensError::PipelineNotFound(name.to_string()).into());
                    }
                }
                return Err(anyhow::anyhow!("{}", DisplayErrorContext(&err)))
                    .with_context(|| format!("GetPipeline failed for '{name}'"));
            }
        };
        tracing::debug!(?output, "GetPipeline response");

        let declaration = output.pipeline().ok_or(LensError::MissingField {
            service: SERVICE,
            field: "pipeline",
        })?;
        Ok(definition_from_sdk(declaration))
    }

    async fn get_pipeline_state(&self, name: &str) -> Result<PipelineState> {
        let output = self
            .client
            .get_pipeline_state()
            .name(name)
            .send()
            .await
            .map_err(|err| anyhow::anyhow!("{}", DisplayErrorContext(&err)))
            .with_context(|| format!("GetPipelineState failed for '{name}'"))?;
        tracing::debug!(?output, "GetPipelineState response");

        Ok(PipelineState {
            pipeline_name: output.pipeline_name().unwrap_or(name).to_string(),
            stages: output.stage_states().iter().map(stage_state_from_sdk).collect(),
        })
    }

    async fn latest_execution_id(&self, name: &str) -> Result<String> {
        let output = self
            .client
            .list_pipeline_executions()
            .pipeline_name(name)
            .max_results(1)
            .send()
            .await
            .map_err(|err| anyhow::anyhow!("{}", DisplayErrorContext(&err)))
            .with_context(|| format!("ListPipelineExecutions failed for '{name}'"))?;
        tracing::debug!(?output, "ListPipelineExecutions response");

        let summary = output
            .pipeline_execution_summaries()
            .first()
            .ok_or_else(|| LensError::NoExecutions(name.to_string()))?;

        summary
            .pipeline_execution_id()
            .map(str::to_string)
            .ok_or_else(|| {
                LensError::MissingField {
                    service: SERVICE,
                    field: "pipelineExecutionId",
                }
                .into()
            })
    }

    async fn start_execution(&self, name: &str) -> Result<String> {
        let output = self
            .client
            .start_pipeline_execution()
            .name(name)
            .send()
            .await
            .map_err(|err| anyhow::anyhow!("{}", DisplayErrorContext(&err)))
            .with_context(|| format!("StartPipelineExecution failed for '{name}'"))?;
        tracing::debug!(?output, "StartPipelineExecution response");

        output
            .pipeline_execution_id()
            .map(str::to_string)
            .ok_or_else(|| {
                LensError::MissingField {
                    service: SERVICE,
                    field: "pipelineExecutionId",
                }
                .into()
            })
    }
}

pub(crate) fn definition_from_sdk(
    declaration: &codepipeline::types::PipelineDeclaration,
) -> PipelineDefinition {
    let stages = declaration
        .stages()
        .iter()
        .map(|stage| StageDefinition {
            name: stage.name().to_string(),
            actions: stage.actions().iter().map(action_definition_from_sdk).collect(),
        })
        .collect();

    PipelineDefinition {
        name: declaration.name().to_string(),
        stages,
    }
}

fn action_definition_from_sdk(action: &codepipeline::types::ActionDeclaration) -> ActionDefinition {
    let (category, provider) = match action.action_type_id() {
        Some(type_id) => (
            ActionCategory::from(type_id.category().as_str()),
            type_id.provider().to_string(),
        ),
        None => (ActionCategory::Other(String::new()), String::new()),
    };

    ActionDefinition {
        name: action.name().to_string(),
        category,
        provider,
        configuration: action.configuration().cloned().unwrap_or_default(),
    }
}

pub(crate) fn stage_state_from_sdk(stage: &codepipeline::types::StageState) -> StageState {
    StageState {
        name: stage.stage_name().unwrap_or_default().to_string(),
        inbound_execution: stage.inbound_execution().map(stage_execution_from_sdk),
        latest_execution: stage.latest_execution().map(stage_execution_from_sdk),
        actions: stage
            .action_states()
            .iter()
            .map(|action| ActionState {
                name: action.action_name().unwrap_or_default().to_string(),
                latest_execution: action.latest_execution().map(action_execution_from_sdk),
            })
            .collect(),
    }
}

fn stage_execution_from_sdk(execution: &codepipeline::types::StageExecution) -> StageExecution {
    StageExecution {
        pipeline_execution_id: execution.pipeline_execution_id().to_string(),
        status: ExecutionStatus::from(execution.status().as_str()),
    }
}

fn action_execution_from_sdk(execution: &codepipeline::types::ActionExecution) -> ActionExecution {
    ActionExecution {
        status: execution
            .status()
            .map(|status| ExecutionStatus::from(status.as_str()))
            .unwrap_or_else(|| ExecutionStatus::Unknown("Unknown".to_string())),
        last_status_change: execution.last_status_change().and_then(to_chrono),
        summary: execution.summary().map(str::to_string),
        error_message: execution
            .error_details()
            .and_then(|details| details.message())
            .map(str::to_string),
        external_url: execution.external_execution_url().map(str::to_string),
    }
}

fn to_chrono(timestamp: &SdkDateTime) -> Option<DateTime<Utc>> {
    let millis = timestamp.to_millis().ok()?;
    DateTime::from_timestamp_millis(millis)
}
