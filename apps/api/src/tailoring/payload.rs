//! Tailoring payload: the loosely structured suggestions returned by the tailoring service.
//!
//! Decoding is permissive: a field of an unexpected type is treated as absent, map entries
//! with the wrong shape are dropped, and non-string elements of string lists are skipped.
//! Decoding therefore never fails once the body is valid JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rewrite of one project, keyed by project id in [`TailoringPayload::updated_projects`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRewrite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_bullets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills_used: Option<Vec<String>>,
}

/// Advisory: a skill category the service suggests adding. Never auto-applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedSkillCategory {
    pub category: String,
    pub skills: Vec<String>,
}

/// Advisory: a project the service suggests adding. Never auto-applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedProject {
    pub title: String,
    pub skills_used: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", rename_all = "camelCase")]
pub struct TailoringPayload {
    // Consumed by the merge transform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_experience_bullets: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_projects: Option<BTreeMap<String, ProjectRewrite>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_other: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_skills: Option<Vec<String>>,

    // Presentation only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_list: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_visibility: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_visibility: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_visibility: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_skill_categories: Option<Vec<SuggestedSkillCategory>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_projects: Option<Vec<SuggestedProject>>,
}

impl From<Value> for TailoringPayload {
    fn from(value: Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            parsed_job_title: string_field(obj, "parsedJobTitle"),
            updated_objective: string_field(obj, "updatedObjective"),
            updated_experience_bullets: id_map(obj, "updatedExperienceBullets", string_list),
            updated_projects: id_map(obj, "updatedProjects", project_rewrite),
            updated_other: id_map(obj, "updatedOther", string_value),
            company_name: string_field(obj, "companyName").filter(|name| !name.trim().is_empty()),
            missing_skills: obj.get("missingSkills").and_then(string_list),
            cover_letter: string_field(obj, "coverLetter"),
            keyword_list: obj.get("keywordList").and_then(string_list),
            experience_visibility: id_map(obj, "experienceVisibility", Value::as_bool),
            education_visibility: id_map(obj, "educationVisibility", Value::as_bool),
            project_visibility: id_map(obj, "projectVisibility", Value::as_bool),
            new_skill_categories: object_list(obj, "newSkillCategories", suggested_category),
            new_projects: object_list(obj, "newProjects", suggested_project),
        }
    }
}

fn string_value(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(string_value)
}

/// `None` unless `value` is an array; non-string elements are skipped.
fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(string_value).collect())
}

fn id_map<T>(
    obj: &Map<String, Value>,
    key: &str,
    decode: impl Fn(&Value) -> Option<T>,
) -> Option<BTreeMap<String, T>> {
    let entries = obj.get(key)?.as_object()?;
    Some(
        entries
            .iter()
            .filter_map(|(id, value)| decode(value).map(|decoded| (id.clone(), decoded)))
            .collect(),
    )
}

fn object_list<T>(
    obj: &Map<String, Value>,
    key: &str,
    decode: impl Fn(&Map<String, Value>) -> Option<T>,
) -> Option<Vec<T>> {
    let items = obj.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(decode)
            .collect(),
    )
}

fn project_rewrite(value: &Value) -> Option<ProjectRewrite> {
    let obj = value.as_object()?;
    Some(ProjectRewrite {
        description_bullets: obj.get("descriptionBullets").and_then(string_list),
        skills_used: obj.get("skillsUsed").and_then(string_list),
    })
}

fn suggested_category(obj: &Map<String, Value>) -> Option<SuggestedSkillCategory> {
    Some(SuggestedSkillCategory {
        category: string_field(obj, "category")?,
        skills: obj.get("skills").and_then(string_list).unwrap_or_default(),
    })
}

fn suggested_project(obj: &Map<String, Value>) -> Option<SuggestedProject> {
    Some(SuggestedProject {
        title: string_field(obj, "title")?,
        skills_used: obj.get("skillsUsed").and_then(string_list).unwrap_or_default(),
        description: string_field(obj, "description"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_payload_decodes() {
        let payload: TailoringPayload = serde_json::from_value(json!({
            "parsedJobTitle": "Backend Engineer",
            "updatedObjective": "Build services",
            "updatedExperienceBullets": { "e1": ["one", "two"] },
            "updatedProjects": { "p1": { "descriptionBullets": ["did x"], "skillsUsed": ["Rust"] } },
            "updatedOther": { "o1": "new content" },
            "companyName": "Acme",
            "missingSkills": ["go"],
            "coverLetter": "Dear Acme",
            "keywordList": ["rust", "go"],
            "experienceVisibility": { "e1": true, "e2": false },
            "newSkillCategories": [{ "category": "Cloud", "skills": ["AWS"] }],
            "newProjects": [{ "title": "CLI", "skillsUsed": ["Rust"] }]
        }))
        .unwrap();

        assert_eq!(payload.parsed_job_title.as_deref(), Some("Backend Engineer"));
        assert_eq!(payload.updated_experience_bullets.unwrap()["e1"], vec!["one", "two"]);
        let project = &payload.updated_projects.unwrap()["p1"];
        assert_eq!(project.description_bullets.as_deref(), Some(&["did x".to_string()][..]));
        assert_eq!(payload.updated_other.unwrap()["o1"], "new content");
        assert_eq!(payload.company_name.as_deref(), Some("Acme"));
        assert_eq!(payload.experience_visibility.unwrap()["e2"], false);
        assert_eq!(payload.new_skill_categories.unwrap()[0].category, "Cloud");
        assert_eq!(payload.new_projects.unwrap()[0].description, None);
    }

    #[test]
    fn test_wrong_types_are_treated_as_absent() {
        let payload: TailoringPayload = serde_json::from_value(json!({
            "parsedJobTitle": 42,
            "updatedExperienceBullets": "not a map",
            "missingSkills": "go",
            "updatedOther": ["o1"],
            "keywordList": null
        }))
        .unwrap();
        assert_eq!(payload, TailoringPayload::default());
    }

    #[test]
    fn test_malformed_map_entries_are_dropped() {
        let payload: TailoringPayload = serde_json::from_value(json!({
            "updatedExperienceBullets": { "e1": ["ok"], "e2": "bad", "e3": null },
            "updatedOther": { "o1": "fine", "o2": 7 },
            "updatedProjects": { "p1": { "descriptionBullets": "bad", "skillsUsed": ["Go"] }, "p2": 3 }
        }))
        .unwrap();

        let bullets = payload.updated_experience_bullets.unwrap();
        assert_eq!(bullets.len(), 1);
        assert!(bullets.contains_key("e1"));

        let other = payload.updated_other.unwrap();
        assert_eq!(other.len(), 1);

        let projects = payload.updated_projects.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects["p1"].description_bullets, None);
        assert_eq!(projects["p1"].skills_used, Some(vec!["Go".to_string()]));
    }

    #[test]
    fn test_non_string_list_elements_are_skipped() {
        let payload: TailoringPayload =
            serde_json::from_value(json!({ "missingSkills": ["go", 1, null, "rust"] })).unwrap();
        assert_eq!(
            payload.missing_skills,
            Some(vec!["go".to_string(), "rust".to_string()])
        );
    }

    #[test]
    fn test_empty_list_is_present_not_absent() {
        let payload: TailoringPayload =
            serde_json::from_value(json!({ "updatedExperienceBullets": { "e1": [] } })).unwrap();
        assert_eq!(payload.updated_experience_bullets.unwrap()["e1"], Vec::<String>::new());
    }

    #[test]
    fn test_blank_company_name_is_absent() {
        let payload: TailoringPayload =
            serde_json::from_value(json!({ "companyName": "   " })).unwrap();
        assert_eq!(payload.company_name, None);
    }

    #[test]
    fn test_non_object_body_is_empty_payload() {
        let payload: TailoringPayload = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(payload, TailoringPayload::default());
    }

    #[test]
    fn test_serializes_camel_case_without_absent_fields() {
        let payload = TailoringPayload {
            company_name: Some("Acme".to_string()),
            missing_skills: Some(vec!["Go".to_string()]),
            ..Default::default()
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({ "companyName": "Acme", "missingSkills": ["Go"] }));
    }
}
