use anyhow::Result;
use chrono::Utc;
use std::io::Write;
use std::time::Duration;

use lens_common::api::{BuildApi, LogApi, PipelineApi};
use lens_common::types::{ExecutionStatus, LogTarget, PipelineDefinition};

use super::current_state::{current_state, ActivePosition, CurrentState};
use super::log_follower::LogFollower;
use super::log_group::resolve_log_target;
use super::project::{codebuild_project, is_approval};

/// Which execution of the pipeline to trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionSelector {
    Latest,
    Start,
    Id(String),
}

pub async fn resolve_execution<P>(
    pipelines: &P,
    pipeline_name: &str,
    selector: &ExecutionSelector,
) -> Result<String>
where
    P: PipelineApi + ?Sized,
{
    let execution_id = match selector {
        ExecutionSelector::Latest => pipelines.latest_execution_id(pipeline_name).await?,
        ExecutionSelector::Start => pipelines.start_execution(pipeline_name).await?,
        ExecutionSelector::Id(id) => id.clone(),
    };
    tracing::info!(pipeline = pipeline_name, execution_id = %execution_id, "Tracing execution");
    Ok(execution_id)
}

#[derive(Clone, Debug)]
pub struct TraceSettings {
    pub pipeline_name: String,
    pub poll_interval: Duration,
    /// Keep polling until the execution ends; otherwise report after one pass.
    pub follow: bool,
    pub log_group_prefix: String,
    pub resolve_build_logs_config: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TraceOutcome {
    Completed,
    Failed {
        stage: String,
        /// Unset when the stage itself ended, e.g. a stopped execution.
        action: Option<String>,
        status: ExecutionStatus,
        error_message: Option<String>,
        external_url: Option<String>,
    },
    WaitingForApproval {
        stage: String,
        action: String,
    },
    /// Single-pass result while the execution is still running.
    Running {
        stage: Option<String>,
        action: Option<String>,
    },
}

impl TraceOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            TraceOutcome::Failed { .. } => 1,
            _ => 0,
        }
    }
}

pub struct TraceSession<'a, P: ?Sized, B: ?Sized, L: ?Sized, W> {
    pipelines: &'a P,
    builds: &'a B,
    logs: &'a L,
    settings: TraceSettings,
    out: W,
}

impl<'a, P, B, L, W> TraceSession<'a, P, B, L, W>
where
    P: PipelineApi + ?Sized,
    B: BuildApi + ?Sized,
    L: LogApi + ?Sized,
    W: Write,
{
    pub fn new(
        pipelines: &'a P,
        builds: &'a B,
        logs: &'a L,
        settings: TraceSettings,
        out: W,
    ) -> Self {
        Self {
            pipelines,
            builds,
            logs,
            settings,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub async fn run(
        &mut self,
        definition: &PipelineDefinition,
        execution_id: &str,
    ) -> Result<TraceOutcome> {
        // (stage, action), empty when unknown
        let mut position = (String::new(), String::new());
        let mut follower: Option<LogFollower> = None;
        let mut log_target: Option<LogTarget> = None;

        loop {
            let state = self
                .pipelines
                .get_pipeline_state(&self.settings.pipeline_name)
                .await?;
            let current = current_state(&state, execution_id);
            tracing::debug!(?current, "Current pipeline position");

            let new_position = match &current {
                CurrentState::Active(active) => (active.stage.clone(), active.action.clone()),
                CurrentState::InTransition { stage } => {
                    (stage.clone().unwrap_or_default(), String::new())
                }
                CurrentState::Halted { stage, .. } => (stage.clone(), String::new()),
                CurrentState::Completed => (String::new(), String::new()),
            };
            if new_position != position {
                position = new_position;
                follower = None;
                log_target = None;
                if !position.0.is_empty() && !position.1.is_empty() {
                    self.announce(&position.0, &position.1)?;
                }
            }

            match current {
                CurrentState::Completed => return Ok(TraceOutcome::Completed),
                CurrentState::Halted { stage, status } => {
                    return Ok(TraceOutcome::Failed {
                        stage,
                        action: None,
                        status,
                        error_message: None,
                        external_url: None,
                    });
                }
                CurrentState::InTransition { stage } => {
                    if !self.settings.follow {
                        return Ok(TraceOutcome::Running {
                            stage,
                            action: None,
                        });
                    }
                }
                CurrentState::Active(active) if active.status.is_failure() => {
                    return Ok(TraceOutcome::Failed {
                        stage: active.stage,
                        action: Some(active.action),
                        status: active.status,
                        error_message: active.error_message,
                        external_url: active.external_url,
                    });
                }
                CurrentState::Active(active)
                    if active.status == ExecutionStatus::InProgress
                        && is_approval(definition, &active.action) =>
                {
                    return Ok(TraceOutcome::WaitingForApproval {
                        stage: active.stage,
                        action: active.action,
                    });
                }
                CurrentState::Active(active) => {
                    tracing::debug!(
                        stage = %active.stage,
                        action = %active.action,
                        status = %active.status,
                        "In progress"
                    );

                    match codebuild_project(definition, &active.action) {
                        Some(project) => {
                            let target = match &log_target {
                                Some(target) => target.clone(),
                                None => {
                                    let target = self.resolve_target(project).await?;
                                    log_target = Some(target.clone());
                                    target
                                }
                            };
                            let reader = follower.get_or_insert_with(|| {
                                LogFollower::starting_at(start_time_ms(&active))
                            });
                            reader
                                .drain(
                                    self.logs,
                                    &target,
                                    &active.stage,
                                    &active.action,
                                    &mut self.out,
                                )
                                .await?;
                        }
                        None => {
                            tracing::debug!(
                                action = %active.action,
                                "Action has no CodeBuild project, nothing to follow"
                            );
                        }
                    }

                    if !self.settings.follow {
                        return Ok(TraceOutcome::Running {
                            stage: Some(active.stage),
                            action: Some(active.action),
                        });
                    }
                }
            }

            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    async fn resolve_target(&self, project: &str) -> Result<LogTarget> {
        let logs_config = if self.settings.resolve_build_logs_config {
            self.builds.logs_config(project).await?
        } else {
            None
        };
        let target = resolve_log_target(
            &self.settings.log_group_prefix,
            project,
            logs_config.as_ref(),
        )?;
        tracing::info!(project, log_group = %target.log_group_name, "Following build logs");
        Ok(target)
    }

    fn announce(&mut self, stage: &str, action: &str) -> Result<()> {
        writeln!(self.out, "🏁 ")?;
        writeln!(
            self.out,
            "🏁 Pipeline has entered to: stage - {stage}, action - {action}"
        )?;
        writeln!(self.out, "🏁 ")?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Logs are read from the moment the action last changed status, or from now when unknown.
fn start_time_ms(active: &ActivePosition) -> i64 {
    active
        .last_status_change
        .unwrap_or_else(Utc::now)
        .timestamp_millis()
}
