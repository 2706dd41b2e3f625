use chrono::{DateTime, Utc};
use lens_common::types::{ExecutionStatus, PipelineState};

/// The action an execution is currently sitting on.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivePosition {
    pub stage: String,
    pub action: String,
    pub status: ExecutionStatus,
    pub last_status_change: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub external_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CurrentState {
    /// Between two actions or two stages. `stage` is set when a stage is running but none of
    /// its actions has started yet.
    InTransition { stage: Option<String> },
    Completed,
    /// The stage itself ended in a failure status while none of its actions did, e.g. an
    /// execution stopped after its in-flight actions finished.
    Halted { stage: String, status: ExecutionStatus },
    Active(ActivePosition),
}

impl CurrentState {
    /// `(stage, action)` when an action is current.
    pub fn position(&self) -> Option<(&str, &str)> {
        match self {
            CurrentState::Active(active) => Some((&active.stage, &active.action)),
            _ => None,
        }
    }
}

/// Finds where `execution_id` currently is within `state`.
pub fn current_state(state: &PipelineState, execution_id: &str) -> CurrentState {
    for stage in &state.stages {
        if !stage.belongs_to(execution_id) || stage.is_succeeded() {
            continue;
        }

        for action in &stage.actions {
            let Some(execution) = &action.latest_execution else {
                continue;
            };
            if execution.status.is_succeeded() {
                continue;
            }

            return CurrentState::Active(ActivePosition {
                stage: stage.name.clone(),
                action: action.name.clone(),
                status: execution.status.clone(),
                last_status_change: execution.last_status_change,
                error_message: execution.error_message.clone(),
                external_url: execution.external_url.clone(),
            });
        }

        if let Some(latest) = &stage.latest_execution {
            if latest.pipeline_execution_id == execution_id && latest.status.is_failure() {
                return CurrentState::Halted {
                    stage: stage.name.clone(),
                    status: latest.status.clone(),
                };
            }
        }

        // The stage is marked as running before any of its actions is.
        return CurrentState::InTransition {
            stage: Some(stage.name.clone()),
        };
    }

    let completed = state
        .stages
        .last()
        .and_then(|stage| stage.latest_execution.as_ref())
        .is_some_and(|latest| {
            latest.pipeline_execution_id == execution_id && latest.status.is_succeeded()
        });

    if completed {
        CurrentState::Completed
    } else {
        CurrentState::InTransition { stage: None }
    }
}
