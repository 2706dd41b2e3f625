use lens_common::constants::APPROVAL_ACTION_NAME;
use lens_common::types::{ActionCategory, PipelineDefinition};

/// CodeBuild project run by the action called `action_name`, searching every stage.
pub fn codebuild_project<'a>(
    definition: &'a PipelineDefinition,
    action_name: &str,
) -> Option<&'a str> {
    definition
        .actions()
        .filter(|action| action.name == action_name)
        .find_map(|action| action.codebuild_project())
}

/// Manual approval actions block the execution until someone acts on them.
pub fn is_approval(definition: &PipelineDefinition, action_name: &str) -> bool {
    action_name == APPROVAL_ACTION_NAME
        || definition.actions().any(|action| {
            action.name == action_name && action.category == ActionCategory::Approval
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_common::types::{ActionDefinition, StageDefinition};
    use std::collections::HashMap;

    fn action(
        name: &str,
        category: ActionCategory,
        provider: &str,
        project: Option<&str>,
    ) -> ActionDefinition {
        ActionDefinition {
            name: name.into(),
            category,
            provider: provider.into(),
            configuration: project
                .map(|project| HashMap::from([("ProjectName".to_string(), project.to_string())]))
                .unwrap_or_default(),
        }
    }

    fn definition() -> PipelineDefinition {
        PipelineDefinition {
            name: "api".into(),
            stages: vec![
                StageDefinition {
                    name: "Source".into(),
                    actions: vec![action(
                        "Checkout",
                        ActionCategory::Source,
                        "CodeStarSourceConnection",
                        None,
                    )],
                },
                StageDefinition {
                    name: "Build".into(),
                    actions: vec![
                        action("Compile", ActionCategory::Build, "CodeBuild", Some("api-compile")),
                        action("Notify", ActionCategory::Invoke, "Lambda", None),
                    ],
                },
                StageDefinition {
                    name: "Release".into(),
                    actions: vec![
                        action("Sign-off", ActionCategory::Approval, "Manual", None),
                        action("Smoke", ActionCategory::Test, "CodeBuild", Some("api-smoke")),
                    ],
                },
            ],
        }
    }

    #[test]
    fn finds_project_in_any_stage() {
        let definition = definition();
        assert_eq!(codebuild_project(&definition, "Compile"), Some("api-compile"));
        assert_eq!(codebuild_project(&definition, "Smoke"), Some("api-smoke"));
    }

    #[test]
    fn non_codebuild_or_unknown_action_has_no_project() {
        let definition = definition();
        assert_eq!(codebuild_project(&definition, "Notify"), None);
        assert_eq!(codebuild_project(&definition, "Missing"), None);
    }

    #[test]
    fn approval_by_category_or_conventional_name() {
        let definition = definition();
        assert!(is_approval(&definition, "Sign-off"));
        assert!(is_approval(&definition, "Approval"));
        assert!(!is_approval(&definition, "Compile"));
    }
}
