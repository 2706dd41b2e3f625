use thiserror::Error;

/// Failures the tracker recognises on its own, as opposed to raw service errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LensError {
    #[error("pipeline '{0}' was not found")]
    PipelineNotFound(String),

    #[error("pipeline '{0}' has no executions yet")]
    NoExecutions(String),

    #[error("no log group found: {0} (has the build project run at least once?)")]
    LogGroupNotFound(String),

    #[error("CloudWatch logging is disabled for build project '{0}'")]
    LogsDisabled(String),

    #[error("response from {service} is missing '{field}'")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },

    #[error("could not resolve AWS credentials from profile, role or environment")]
    CredentialsUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_group_error_names_the_group() {
        let err = LensError::LogGroupNotFound("/aws/codebuild/api".into());
        assert!(err.to_string().contains("/aws/codebuild/api"));
    }

    #[test]
    fn missing_field_mentions_service() {
        let err = LensError::MissingField {
            service: "CodePipeline",
            field: "pipelineExecutionId",
        };
        assert_eq!(
            err.to_string(),
            "response from CodePipeline is missing 'pipelineExecutionId'"
        );
    }
}
