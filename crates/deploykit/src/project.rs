//! Project number lookup via `gcloud projects describe`.

use crate::error::{Error, Result};
use crate::report::{Reporter, Stage};
use crate::runner::{CommandRunner, Invocation};

/// JSON field carrying the project number.
pub const PROJECT_NUMBER_FIELD: &str = "projectNumber";

/// Build the describe command for a project.
pub fn describe_invocation(gcloud: &str, project_id: &str) -> Invocation {
    Invocation::new(gcloud, "Failed to fetch project details.")
        .args(["projects", "describe", project_id, "--format=json"])
}

/// Extract the project number from `gcloud projects describe --format=json` output.
///
/// gcloud emits the number as a string; a bare JSON number is accepted too.
pub fn parse_project_number(json: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    match &value[PROJECT_NUMBER_FIELD] {
        serde_json::Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(Error::MissingField(PROJECT_NUMBER_FIELD)),
    }
}

/// Look up the numeric project number for `project_id`.
///
/// Returns `None` if the command fails or its output lacks a project number.
pub fn resolve_project_number(
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
    gcloud: &str,
    project_id: &str,
) -> Option<String> {
    reporter.stage(
        Stage::Fetch,
        &format!("Fetching project number for: {project_id}..."),
    );

    let outcome = runner.run(&describe_invocation(gcloud, project_id), reporter)?;
    let output = outcome.stdout().unwrap_or_default();

    match parse_project_number(output) {
        Ok(number) => {
            log::debug!("project {project_id} has number {number}");
            Some(number)
        }
        Err(e @ Error::MissingField(_)) => {
            log::debug!("describe output for {project_id}: {output}");
            reporter.error(&format!("Project details for {project_id} have no project number."));
            reporter.detail(&format!("Error details: {e}"));
            None
        }
        Err(e) => {
            reporter.error("Failed to parse project details.");
            reporter.detail(&format!("Error details: {e}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Event, RecordingReporter};
    use crate::runner::MockRunner;

    #[test]
    fn test_parse_string_number() {
        assert_eq!(
            parse_project_number(r#"{"projectNumber": "123456"}"#).unwrap(),
            "123456"
        );
    }

    #[test]
    fn test_parse_numeric_number() {
        assert_eq!(
            parse_project_number(r#"{"projectNumber": 42}"#).unwrap(),
            "42"
        );
    }

    #[test]
    fn test_parse_missing_field() {
        let err = parse_project_number(r#"{"projectId": "demo-proj"}"#).unwrap_err();
        assert!(matches!(err, Error::MissingField("projectNumber")));

        let err = parse_project_number(r#"{"projectNumber": ""}"#).unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_project_number("not json").unwrap_err(),
            Error::Json(_)
        ));
    }

    #[test]
    fn test_describe_invocation() {
        let inv = describe_invocation("gcloud", "demo-proj");
        assert_eq!(
            inv.to_string(),
            "gcloud projects describe demo-proj --format=json"
        );
        assert!(inv.captures());
    }

    #[test]
    fn test_resolve_success() {
        let mock = MockRunner::new();
        mock.succeed_with(
            "projects describe",
            r#"{"projectId": "demo-proj", "projectNumber": "123456"}"#,
        );
        let reporter = RecordingReporter::new();

        let number = resolve_project_number(&mock, &reporter, "gcloud", "demo-proj");

        assert_eq!(number.as_deref(), Some("123456"));
        assert_eq!(
            reporter.events(),
            vec![Event::Stage(
                Stage::Fetch,
                "Fetching project number for: demo-proj...".to_string()
            )]
        );
    }

    #[test]
    fn test_resolve_missing_field_is_none() {
        let mock = MockRunner::new();
        mock.succeed_with("projects describe", r#"{"projectId": "demo-proj"}"#);
        let reporter = RecordingReporter::new();

        assert_eq!(
            resolve_project_number(&mock, &reporter, "gcloud", "demo-proj"),
            None
        );
        assert_eq!(reporter.errors().len(), 1);
    }

    #[test]
    fn test_resolve_command_failure_is_none() {
        let mock = MockRunner::new();
        mock.fail("projects describe", "ERROR: project not found");
        let reporter = RecordingReporter::new();

        assert_eq!(
            resolve_project_number(&mock, &reporter, "gcloud", "missing"),
            None
        );
        assert_eq!(
            reporter.errors(),
            vec!["Failed to fetch project details.".to_string()]
        );
    }

    #[test]
    fn test_resolve_garbage_output_is_none() {
        let mock = MockRunner::new();
        mock.succeed_with("projects describe", "Updates are available");
        let reporter = RecordingReporter::new();

        assert_eq!(
            resolve_project_number(&mock, &reporter, "gcloud", "demo-proj"),
            None
        );
        assert_eq!(
            reporter.errors(),
            vec!["Failed to parse project details.".to_string()]
        );
    }
}
