//! Optimization merge: folds a tailoring payload into the Document.
//!
//! Each payload field drives one independent step. Every step reads the same input
//! snapshot and yields at most one section patch; the patches are then applied together
//! through the reducer, so observers only ever see the input or the fully merged result.
//!
//! Policy per step:
//! - objective: prepend a new tailored objective and make it active (existing ones are kept)
//! - experience: replace bullets of matched items, reusing bullet ids by position
//! - projects: rewrite description as a Markdown dash-list and replace skills
//! - other: replace content of matched items
//! - skills: append one new category built from `missingSkills`
//!
//! Unknown ids are ignored. An absent field leaves its part of the document untouched,
//! while a present-but-empty list clears.

use std::collections::BTreeMap;

use tracing::info;

use crate::document::reducer::{apply_data_patches, ObjectivePatch, SectionDataPatch};
use crate::document::schema::{
    new_id, Bullet, Document, ExperienceItem, Objective, ObjectiveData, OtherItem, Project,
    SkillCategory,
};
use crate::tailoring::payload::{ProjectRewrite, TailoringPayload};

/// Job title used when neither the payload nor the active objective provides one.
pub const FALLBACK_OBJECTIVE_TITLE: &str = "Tailored Objective";
/// Stands in for the company in the new skills category label.
pub const DEFAULT_COMPANY_LABEL: &str = "Target Company";

/// Returns a new Document with `payload` merged in. `document` is not modified.
pub fn merge_tailoring(document: &Document, payload: &TailoringPayload) -> Document {
    let patches: Vec<SectionDataPatch> = [
        merge_objective(&document.objective.data, payload),
        merge_experience_bullets(&document.experience.data, payload.updated_experience_bullets.as_ref()),
        merge_projects(&document.projects.data, payload.updated_projects.as_ref()),
        merge_other(&document.other.data, payload.updated_other.as_ref()),
        merge_skills(&document.skills.data, payload),
    ]
    .into_iter()
    .flatten()
    .collect();

    let sections: Vec<_> = patches.iter().map(|p| p.kind().as_str()).collect();
    info!("Merging tailoring payload into sections: [{}]", sections.join(", "));

    apply_data_patches(document, patches)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn merge_objective(data: &ObjectiveData, payload: &TailoringPayload) -> Option<SectionDataPatch> {
    let title = non_blank(payload.parsed_job_title.as_deref());
    let content = non_blank(payload.updated_objective.as_deref());
    if title.is_none() && content.is_none() {
        return None;
    }
    let active = data.active()?;

    let tailored = Objective {
        id: new_id(),
        job_title: title
            .or(non_blank(Some(active.job_title.as_str())))
            .unwrap_or(FALLBACK_OBJECTIVE_TITLE)
            .to_string(),
        content: content.unwrap_or(active.content.as_str()).to_string(),
    };

    let mut objectives = Vec::with_capacity(data.objectives.len() + 1);
    objectives.push(tailored);
    objectives.extend(data.objectives.iter().cloned());

    Some(SectionDataPatch::Objective(ObjectivePatch {
        active_index: Some(0),
        objectives: Some(objectives),
    }))
}

fn merge_experience_bullets(
    items: &[ExperienceItem],
    rewrites: Option<&BTreeMap<String, Vec<String>>>,
) -> Option<SectionDataPatch> {
    let rewrites = rewrites?;
    let merged = items
        .iter()
        .map(|item| match rewrites.get(&item.id) {
            Some(texts) => ExperienceItem {
                bullets: rebuild_bullets(&item.bullets, texts),
                ..item.clone()
            },
            None => item.clone(),
        })
        .collect();
    Some(SectionDataPatch::Experience(merged))
}

/// One enabled bullet per text. The bullet id at each existing position is kept;
/// positions past the old list get fresh ids.
fn rebuild_bullets(existing: &[Bullet], texts: &[String]) -> Vec<Bullet> {
    texts
        .iter()
        .enumerate()
        .map(|(position, text)| Bullet {
            id: existing
                .get(position)
                .map(|bullet| bullet.id.clone())
                .unwrap_or_else(new_id),
            enabled: true,
            text: text.clone(),
        })
        .collect()
}

fn merge_projects(
    projects: &[Project],
    rewrites: Option<&BTreeMap<String, ProjectRewrite>>,
) -> Option<SectionDataPatch> {
    let rewrites = rewrites?;
    let merged = projects
        .iter()
        .map(|project| match rewrites.get(&project.id) {
            Some(rewrite) => Project {
                description: rewrite
                    .description_bullets
                    .as_deref()
                    .map(markdown_dash_list)
                    .unwrap_or_else(|| project.description.clone()),
                skills_used: rewrite
                    .skills_used
                    .clone()
                    .unwrap_or_else(|| project.skills_used.clone()),
                ..project.clone()
            },
            None => project.clone(),
        })
        .collect();
    Some(SectionDataPatch::Projects(merged))
}

fn markdown_dash_list(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn merge_other(
    items: &[OtherItem],
    rewrites: Option<&BTreeMap<String, String>>,
) -> Option<SectionDataPatch> {
    let rewrites = rewrites?;
    let merged = items
        .iter()
        .map(|item| match rewrites.get(&item.id) {
            Some(content) => OtherItem {
                content: content.clone(),
                ..item.clone()
            },
            None => item.clone(),
        })
        .collect();
    Some(SectionDataPatch::Other(merged))
}

fn merge_skills(
    categories: &[SkillCategory],
    payload: &TailoringPayload,
) -> Option<SectionDataPatch> {
    let missing = payload
        .missing_skills
        .as_deref()
        .filter(|skills| !skills.is_empty())?;
    // A non-empty list always yields a category, even if every entry is blank
    let skills: Vec<String> = missing
        .iter()
        .map(|skill| skill.trim())
        .filter(|skill| !skill.is_empty())
        .map(title_case)
        .collect();

    let company = payload
        .company_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_COMPANY_LABEL);

    let mut merged = categories.to_vec();
    merged.push(SkillCategory {
        id: new_id(),
        enabled: true,
        category: format!("Skills for {company}"),
        skills,
    });
    Some(SectionDataPatch::Skills(merged))
}

/// Capitalizes the first character of each whitespace-separated word and leaves the rest
/// of the word as is ("machine learning" -> "Machine Learning", "gRPC" -> "GRPC").
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
