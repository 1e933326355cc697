//! Deterministic rendering of the two coverage documents.
//!
//! Output is compact JSON built from the ordered sets of the model, so the
//! same logical tree always yields byte-identical text. When a document has
//! nothing to report its array payload is dropped entirely, leaving only the
//! key: `{"application_coverage"}`.

use serde::Serialize;

use crate::Result;
use crate::merge_set::MergeSet;
use crate::requirement::RequirementCoverage;
use crate::subject::SubjectCoverage;

/// Top-level key of the subject coverage document.
pub const SUBJECT_REPORT_KEY: &str = "application_coverage";
/// Top-level key of the requirement coverage document.
pub const REQUIREMENT_REPORT_KEY: &str = "requirements_coverage";

/// Render `{"application_coverage":[<root>]}` for the subject tree.
pub fn render_subject_report(root: &SubjectCoverage) -> Result<String> {
    let payload = if root.is_empty() {
        None
    } else {
        Some(std::slice::from_ref(root))
    };
    render_document(SUBJECT_REPORT_KEY, payload)
}

/// Render `{"requirements_coverage":[...]}` for the requirement forest.
pub fn render_requirement_report(requirements: &MergeSet<RequirementCoverage>) -> Result<String> {
    let payload = if requirements.is_empty() {
        None
    } else {
        Some(requirements)
    };
    render_document(REQUIREMENT_REPORT_KEY, payload)
}

fn render_document<T: Serialize + ?Sized>(key: &str, payload: Option<&T>) -> Result<String> {
    let mut out = String::from("{");
    out.push_str(&serde_json::to_string(key)?);
    if let Some(payload) = payload {
        out.push(':');
        out.push_str(&serde_json::to_string(payload)?);
    }
    out.push('}');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScenarioValue, TestRecord};
    use serde_json::json;

    #[test]
    fn empty_subject_report_drops_payload() {
        let root = SubjectCoverage::new("application", None).expect("valid");
        assert_eq!(
            render_subject_report(&root).expect("render"),
            r#"{"application_coverage"}"#
        );
    }

    #[test]
    fn empty_requirement_report_drops_payload() {
        let forest = MergeSet::<RequirementCoverage>::new();
        assert_eq!(
            render_requirement_report(&forest).expect("render"),
            r#"{"requirements_coverage"}"#
        );
    }

    #[test]
    fn subject_report_wraps_root_in_array() {
        let mut root = SubjectCoverage::new("application", None).expect("valid");
        let mut login = TestRecord::new("login").expect("valid");
        login.add_scenario(ScenarioValue::new(json!({"user": "x"})));
        root.add_test(login);
        root.add_test(TestRecord::new("logout").expect("valid"));

        assert_eq!(
            render_subject_report(&root).expect("render"),
            concat!(
                r#"{"application_coverage":[{"subject":"application","tests":["#,
                r#"{"test":"login","scenarios":[{"user":"x"}]},{"test":"logout"}]}]}"#
            )
        );
    }

    #[test]
    fn requirement_report_lists_requirements_in_id_order() {
        let app = |test: &str| {
            SubjectCoverage::new("application", Some(TestRecord::new(test).expect("valid")))
                .expect("valid")
        };
        let forest: MergeSet<RequirementCoverage> = vec![
            RequirementCoverage::new("REQ-2", Some(app("t2"))).expect("valid"),
            RequirementCoverage::new("REQ-1", Some(app("t1"))).expect("valid"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            render_requirement_report(&forest).expect("render"),
            concat!(
                r#"{"requirements_coverage":["#,
                r#"{"id":"REQ-1","subjects":[{"subject":"application","tests":[{"test":"t1"}]}]},"#,
                r#"{"id":"REQ-2","subjects":[{"subject":"application","tests":[{"test":"t2"}]}]}"#,
                r#"]}"#
            )
        );
    }

    #[test]
    fn rendered_documents_parse_as_json() {
        let mut root = SubjectCoverage::new("app \"quoted\"", None).expect("valid");
        root.add_test(TestRecord::with_scenario("t", Some(ScenarioValue::from(1.5))).expect("valid"));
        let text = render_subject_report(&root).expect("render");
        let parsed: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(
            parsed["application_coverage"][0]["subject"],
            json!("app \"quoted\"")
        );
        assert_eq!(
            parsed["application_coverage"][0]["tests"][0]["scenarios"][0],
            json!(1.5)
        );
    }
}
