use serde::{Deserialize, Serialize};

/// Logs settings of a CodeBuild project, reduced to the CloudWatch part.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildLogsConfig {
    pub cloud_watch_enabled: bool,
    pub group_name: Option<String>,
    pub stream_name: Option<String>,
}

/// Where the logs of one build project end up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogTarget {
    pub log_group_name: String,
    pub log_stream_name_prefix: Option<String>,
}

/// One `FilterLogEvents` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogQuery {
    pub log_group_name: String,
    pub log_stream_name_prefix: Option<String>,
    pub start_time_ms: i64,
    pub next_token: Option<String>,
}

impl LogQuery {
    pub fn starting_at(target: &LogTarget, start_time_ms: i64) -> Self {
        Self {
            log_group_name: target.log_group_name.clone(),
            log_stream_name_prefix: target.log_stream_name_prefix.clone(),
            start_time_ms,
            next_token: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp_ms: i64,
    pub message: String,
    pub log_stream_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogPage {
    pub events: Vec<LogEvent>,
    pub next_token: Option<String>,
}
