use lens_common::types::{BuildLogsConfig, LogTarget};
use lens_common::LensError;

/// Log group CodeBuild writes to when the project does not name one.
pub fn default_log_group(prefix: &str, project: &str) -> String {
    format!("{prefix}{project}")
}

/// Picks the log group of `project`, honouring the project's own CloudWatch settings.
pub fn resolve_log_target(
    prefix: &str,
    project: &str,
    logs_config: Option<&BuildLogsConfig>,
) -> Result<LogTarget, LensError> {
    match logs_config {
        Some(config) if !config.cloud_watch_enabled => {
            Err(LensError::LogsDisabled(project.to_string()))
        }
        Some(BuildLogsConfig {
            group_name: Some(group_name),
            stream_name,
            ..
        }) => Ok(LogTarget {
            log_group_name: group_name.clone(),
            log_stream_name_prefix: stream_name.clone(),
        }),
        _ => Ok(LogTarget {
            log_group_name: default_log_group(prefix, project),
            log_stream_name_prefix: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_common::constants::DEFAULT_LOG_GROUP_PREFIX;

    #[test]
    fn default_group_follows_codebuild_convention() {
        assert_eq!(
            default_log_group(DEFAULT_LOG_GROUP_PREFIX, "api-build"),
            "/aws/codebuild/api-build"
        );
    }

    #[test]
    fn no_logs_config_uses_convention() {
        let target = resolve_log_target(DEFAULT_LOG_GROUP_PREFIX, "api-build", None).unwrap();
        assert_eq!(target.log_group_name, "/aws/codebuild/api-build");
        assert_eq!(target.log_stream_name_prefix, None);
    }

    #[test]
    fn enabled_without_group_uses_convention() {
        let config = BuildLogsConfig {
            cloud_watch_enabled: true,
            group_name: None,
            stream_name: Some("ignored-without-group".into()),
        };
        let target =
            resolve_log_target(DEFAULT_LOG_GROUP_PREFIX, "api-build", Some(&config)).unwrap();
        assert_eq!(target.log_group_name, "/aws/codebuild/api-build");
        assert_eq!(target.log_stream_name_prefix, None);
    }

    #[test]
    fn custom_group_and_stream_win() {
        let config = BuildLogsConfig {
            cloud_watch_enabled: true,
            group_name: Some("/teams/api".into()),
            stream_name: Some("compile".into()),
        };
        let target =
            resolve_log_target(DEFAULT_LOG_GROUP_PREFIX, "api-build", Some(&config)).unwrap();
        assert_eq!(
            target,
            LogTarget {
                log_group_name: "/teams/api".into(),
                log_stream_name_prefix: Some("compile".into()),
            }
        );
    }

    #[test]
    fn disabled_logs_are_an_error() {
        let config = BuildLogsConfig {
            cloud_watch_enabled: false,
            group_name: Some("/teams/api".into()),
            stream_name: None,
        };
        assert_eq!(
            resolve_log_target(DEFAULT_LOG_GROUP_PREFIX, "api-build", Some(&config)),
            Err(LensError::LogsDisabled("api-build".into()))
        );
    }
}
