/// Provider name CodePipeline uses for CodeBuild actions.
pub const CODEBUILD_PROVIDER: &str = "CodeBuild";

/// Configuration key holding the CodeBuild project of an action.
pub const PROJECT_NAME_CONFIGURATION_KEY: &str = "ProjectName";

/// Action name the pipelines conventionally give to their manual approval step.
pub const APPROVAL_ACTION_NAME: &str = "Approval";

/// CodeBuild writes to `/aws/codebuild/<project>` unless the project overrides it.
pub const DEFAULT_LOG_GROUP_PREFIX: &str = "/aws/codebuild/";
