//! SDK-independent mirror of the CodePipeline shapes the tracker reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::constants::{CODEBUILD_PROVIDER, PROJECT_NAME_CONFIGURATION_KEY};

/// Status shared by stage and action executions.
///
/// CodePipeline reports stages with `Cancelled | InProgress | Failed | Stopped | Stopping |
/// Succeeded` and actions with `Abandoned | InProgress | Succeeded | Failed`; both parse into
/// this enum. Anything else is kept verbatim in `Unknown`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionStatus {
    InProgress,
    Succeeded,
    Failed,
    Abandoned,
    Stopped,
    Stopping,
    Cancelled,
    Unknown(String),
}

impl ExecutionStatus {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, ExecutionStatus::Succeeded)
    }

    /// Terminal states that end a trace as a failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Failed
                | ExecutionStatus::Abandoned
                | ExecutionStatus::Stopped
                | ExecutionStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::InProgress => "InProgress",
            ExecutionStatus::Succeeded => "Succeeded",
            ExecutionStatus::Failed => "Failed",
            ExecutionStatus::Abandoned => "Abandoned",
            ExecutionStatus::Stopped => "Stopped",
            ExecutionStatus::Stopping => "Stopping",
            ExecutionStatus::Cancelled => "Cancelled",
            ExecutionStatus::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for ExecutionStatus {
    fn from(value: &str) -> Self {
        match value {
            "InProgress" => ExecutionStatus::InProgress,
            "Succeeded" => ExecutionStatus::Succeeded,
            "Failed" => ExecutionStatus::Failed,
            "Abandoned" => ExecutionStatus::Abandoned,
            "Stopped" => ExecutionStatus::Stopped,
            "Stopping" => ExecutionStatus::Stopping,
            "Cancelled" => ExecutionStatus::Cancelled,
            other => ExecutionStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionCategory {
    Source,
    Build,
    Test,
    Deploy,
    Approval,
    Invoke,
    Compute,
    Other(String),
}

impl From<&str> for ActionCategory {
    fn from(value: &str) -> Self {
        match value {
            "Source" => ActionCategory::Source,
            "Build" => ActionCategory::Build,
            "Test" => ActionCategory::Test,
            "Deploy" => ActionCategory::Deploy,
            "Approval" => ActionCategory::Approval,
            "Invoke" => ActionCategory::Invoke,
            "Compute" => ActionCategory::Compute,
            other => ActionCategory::Other(other.to_string()),
        }
    }
}

/// Static structure of a pipeline, as returned by `GetPipeline`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub name: String,
    pub stages: Vec<StageDefinition>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub name: String,
    pub actions: Vec<ActionDefinition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    pub category: ActionCategory,
    pub provider: String,
    pub configuration: HashMap<String, String>,
}

impl ActionDefinition {
    /// The CodeBuild project this action runs, if it is a CodeBuild action.
    pub fn codebuild_project(&self) -> Option<&str> {
        if self.provider != CODEBUILD_PROVIDER {
            return None;
        }
        self.configuration
            .get(PROJECT_NAME_CONFIGURATION_KEY)
            .map(String::as_str)
    }
}

impl PipelineDefinition {
    pub fn actions(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.stages.iter().flat_map(|stage| stage.actions.iter())
    }
}

/// Runtime snapshot of a pipeline, as returned by `GetPipelineState`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub pipeline_name: String,
    pub stages: Vec<StageState>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StageState {
    pub name: String,
    pub inbound_execution: Option<StageExecution>,
    pub latest_execution: Option<StageExecution>,
    pub actions: Vec<ActionState>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageExecution {
    pub pipeline_execution_id: String,
    pub status: ExecutionStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionState {
    pub name: String,
    pub latest_execution: Option<ActionExecution>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionExecution {
    pub status: ExecutionStatus,
    pub last_status_change: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub error_message: Option<String>,
    pub external_url: Option<String>,
}

impl ActionExecution {
    pub fn with_status(status: ExecutionStatus) -> Self {
        Self {
            status,
            last_status_change: None,
            summary: None,
            error_message: None,
            external_url: None,
        }
    }
}

impl StageState {
    /// Whether either the inbound or the latest execution of this stage belongs to `execution_id`.
    pub fn belongs_to(&self, execution_id: &str) -> bool {
        [&self.inbound_execution, &self.latest_execution]
            .into_iter()
            .flatten()
            .any(|execution| execution.pipeline_execution_id == execution_id)
    }

    pub fn is_succeeded(&self) -> bool {
        [&self.inbound_execution, &self.latest_execution]
            .into_iter()
            .flatten()
            .any(|execution| execution.status.is_succeeded())
    }
}
