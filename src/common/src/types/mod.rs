pub mod logs;
pub mod pipeline;

pub use logs::{BuildLogsConfig, LogEvent, LogPage, LogQuery, LogTarget};
pub use pipeline::{
    ActionCategory, ActionDefinition, ActionExecution, ActionState, ExecutionStatus,
    PipelineDefinition, PipelineState, StageDefinition, StageExecution, StageState,
};
