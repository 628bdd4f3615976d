//! Document schema: the closed set of section kinds, their payload shapes, and the
//! built-in default document.
//!
//! The wire shape mirrors the persisted snapshot: a JSON object keyed by section id, each
//! value `{ id, type, enabled, order, data }` with camelCase payload fields.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::document::DocumentError;

/// Number of section kinds. Section orders always form a permutation of `0..SECTION_COUNT`.
pub const SECTION_COUNT: usize = 7;

// ────────────────────────────────────────────────────────────────────────────
// Section kinds
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Personal,
    Objective,
    Experience,
    Skills,
    Education,
    Projects,
    Other,
}

impl SectionKind {
    /// Canonical order, also the order of the default document.
    pub const ALL: [SectionKind; SECTION_COUNT] = [
        SectionKind::Personal,
        SectionKind::Objective,
        SectionKind::Experience,
        SectionKind::Skills,
        SectionKind::Education,
        SectionKind::Projects,
        SectionKind::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Personal => "personal",
            SectionKind::Objective => "objective",
            SectionKind::Experience => "experience",
            SectionKind::Skills => "skills",
            SectionKind::Education => "education",
            SectionKind::Projects => "projects",
            SectionKind::Other => "other",
        }
    }

    /// Human-readable section heading.
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Personal => "Personal Information",
            SectionKind::Objective => "Objective",
            SectionKind::Experience => "Experience",
            SectionKind::Skills => "Skills",
            SectionKind::Education => "Education",
            SectionKind::Projects => "Projects",
            SectionKind::Other => "Other",
        }
    }

    pub fn canonical_index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DocumentError::UnknownSection(s.to_string()))
    }
}

/// Returns true if `t` names one of the fixed section kinds.
pub fn is_known_section_type(t: &str) -> bool {
    t.parse::<SectionKind>().is_ok()
}

/// Mints a collision-resistant identifier for a new list item.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Sections and payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section<T> {
    pub id: SectionKind,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub enabled: bool,
    pub order: u32,
    pub data: T,
}

impl<T> Section<T> {
    pub fn new(kind: SectionKind, order: u32, data: T) -> Self {
        Self {
            id: kind,
            kind,
            enabled: true,
            order,
            data,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_site: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Objective {
    pub id: String,
    pub job_title: String,
    pub content: String,
}

impl Default for Objective {
    fn default() -> Self {
        Self {
            id: new_id(),
            job_title: String::new(),
            content: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectiveData {
    pub active_index: usize,
    pub objectives: Vec<Objective>,
}

impl ObjectiveData {
    /// The objective shown on the resume. An out-of-range index falls back to the first entry.
    pub fn active(&self) -> Option<&Objective> {
        self.objectives
            .get(self.active_index)
            .or_else(|| self.objectives.first())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bullet {
    pub id: String,
    pub enabled: bool,
    pub text: String,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            id: new_id(),
            enabled: true,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceItem {
    pub id: String,
    pub enabled: bool,
    pub job: String,
    pub company: String,
    pub link: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub bullets: Vec<Bullet>,
}

impl Default for ExperienceItem {
    fn default() -> Self {
        Self {
            id: new_id(),
            enabled: true,
            job: String::new(),
            company: String::new(),
            link: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            location: String::new(),
            bullets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillCategory {
    pub id: String,
    pub enabled: bool,
    pub category: String,
    pub skills: Vec<String>,
}

impl Default for SkillCategory {
    fn default() -> Self {
        Self {
            id: new_id(),
            enabled: true,
            category: String::new(),
            skills: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationItem {
    pub id: String,
    pub enabled: bool,
    pub school: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: String,
    pub location: String,
}

impl Default for EducationItem {
    fn default() -> Self {
        Self {
            id: new_id(),
            enabled: true,
            school: String::new(),
            degree: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            gpa: String::new(),
            location: String::new(),
        }
    }
}

/// A project entry. `description` is Markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub enabled: bool,
    pub title: String,
    pub skills_used: Vec<String>,
    pub description: String,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: new_id(),
            enabled: true,
            title: String::new(),
            skills_used: Vec::new(),
            description: String::new(),
        }
    }
}

/// A free-form entry. `content` is Markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherItem {
    pub id: String,
    pub enabled: bool,
    pub title: String,
    pub content: String,
}

impl Default for OtherItem {
    fn default() -> Self {
        Self {
            id: new_id(),
            enabled: true,
            title: String::new(),
            content: String::new(),
        }
    }
}

/// Identity and visibility shared by every toggleable list item.
/// `Default` yields a blank, enabled item with a freshly minted id.
pub trait ListItem: Default {
    fn id(&self) -> &str;
    fn enabled_mut(&mut self) -> &mut bool;
}

macro_rules! list_item {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ListItem for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn enabled_mut(&mut self) -> &mut bool {
                    &mut self.enabled
                }
            }
        )+
    };
}

list_item!(Bullet, ExperienceItem, SkillCategory, EducationItem, Project, OtherItem);

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub personal: Section<PersonalInfo>,
    pub objective: Section<ObjectiveData>,
    pub experience: Section<Vec<ExperienceItem>>,
    pub skills: Section<Vec<SkillCategory>>,
    pub education: Section<Vec<EducationItem>>,
    pub projects: Section<Vec<Project>>,
    pub other: Section<Vec<OtherItem>>,
}

/// One row of the section index, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub id: SectionKind,
    pub title: &'static str,
    pub enabled: bool,
    pub order: u32,
}

impl Document {
    pub fn enabled(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Personal => self.personal.enabled,
            SectionKind::Objective => self.objective.enabled,
            SectionKind::Experience => self.experience.enabled,
            SectionKind::Skills => self.skills.enabled,
            SectionKind::Education => self.education.enabled,
            SectionKind::Projects => self.projects.enabled,
            SectionKind::Other => self.other.enabled,
        }
    }

    pub fn order(&self, kind: SectionKind) -> u32 {
        match kind {
            SectionKind::Personal => self.personal.order,
            SectionKind::Objective => self.objective.order,
            SectionKind::Experience => self.experience.order,
            SectionKind::Skills => self.skills.order,
            SectionKind::Education => self.education.order,
            SectionKind::Projects => self.projects.order,
            SectionKind::Other => self.other.order,
        }
    }

    pub fn set_enabled(&mut self, kind: SectionKind, enabled: bool) {
        match kind {
            SectionKind::Personal => self.personal.enabled = enabled,
            SectionKind::Objective => self.objective.enabled = enabled,
            SectionKind::Experience => self.experience.enabled = enabled,
            SectionKind::Skills => self.skills.enabled = enabled,
            SectionKind::Education => self.education.enabled = enabled,
            SectionKind::Projects => self.projects.enabled = enabled,
            SectionKind::Other => self.other.enabled = enabled,
        }
    }

    pub fn set_order(&mut self, kind: SectionKind, order: u32) {
        match kind {
            SectionKind::Personal => self.personal.order = order,
            SectionKind::Objective => self.objective.order = order,
            SectionKind::Experience => self.experience.order = order,
            SectionKind::Skills => self.skills.order = order,
            SectionKind::Education => self.education.order = order,
            SectionKind::Projects => self.projects.order = order,
            SectionKind::Other => self.other.order = order,
        }
    }

    /// Forces every section's `id`/`type` to match the field that holds it.
    pub fn normalise_section_ids(&mut self) {
        fn fix<T>(section: &mut Section<T>, kind: SectionKind) {
            section.id = kind;
            section.kind = kind;
        }
        fix(&mut self.personal, SectionKind::Personal);
        fix(&mut self.objective, SectionKind::Objective);
        fix(&mut self.experience, SectionKind::Experience);
        fix(&mut self.skills, SectionKind::Skills);
        fix(&mut self.education, SectionKind::Education);
        fix(&mut self.projects, SectionKind::Projects);
        fix(&mut self.other, SectionKind::Other);
    }

    /// Replaces one section wholesale with a decoded JSON section.
    /// The section's `id`/`type` are normalised to `kind`; on a decode error the
    /// document is left untouched.
    pub fn replace_section(&mut self, kind: SectionKind, value: Value) -> Result<(), serde_json::Error> {
        match kind {
            SectionKind::Personal => self.personal = decode_section(kind, value)?,
            SectionKind::Objective => self.objective = decode_section(kind, value)?,
            SectionKind::Experience => self.experience = decode_section(kind, value)?,
            SectionKind::Skills => self.skills = decode_section(kind, value)?,
            SectionKind::Education => self.education = decode_section(kind, value)?,
            SectionKind::Projects => self.projects = decode_section(kind, value)?,
            SectionKind::Other => self.other = decode_section(kind, value)?,
        }
        Ok(())
    }
}

fn decode_section<T: DeserializeOwned>(
    kind: SectionKind,
    value: Value,
) -> Result<Section<T>, serde_json::Error> {
    let mut section: Section<T> = serde_json::from_value(value)?;
    section.id = kind;
    section.kind = kind;
    Ok(section)
}

// ────────────────────────────────────────────────────────────────────────────
// Default document
// ────────────────────────────────────────────────────────────────────────────

static DEFAULT_DOCUMENT: OnceLock<Document> = OnceLock::new();

/// The built-in starting document.
///
/// Built once per process so its item ids are stable: resetting twice yields the same document.
pub fn default_document() -> Document {
    DEFAULT_DOCUMENT.get_or_init(build_default_document).clone()
}

fn bullets(texts: &[&str]) -> Vec<Bullet> {
    texts
        .iter()
        .map(|text| Bullet {
            text: text.to_string(),
            ..Bullet::default()
        })
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn build_default_document() -> Document {
    let personal = PersonalInfo {
        name: "Your Name".to_string(),
        location: "City, ST".to_string(),
        email: "you@example.com".to_string(),
        phone: "(555) 010-0000".to_string(),
        linkedin: Some("https://linkedin.com/in/your-profile".to_string()),
        github: Some("https://github.com/your-handle".to_string()),
        personal_site: None,
    };

    let objective = ObjectiveData {
        active_index: 0,
        objectives: vec![Objective {
            job_title: "Software Engineer".to_string(),
            content: "Engineer with a track record of shipping reliable web services, looking to \
                      bring strong fundamentals and product sense to a collaborative team."
                .to_string(),
            ..Objective::default()
        }],
    };

    let experience = vec![
        ExperienceItem {
            job: "Software Engineer".to_string(),
            company: "Example Corp".to_string(),
            link: "https://example.com".to_string(),
            start_date: "January 2022".to_string(),
            end_date: "Present".to_string(),
            location: "City, ST".to_string(),
            bullets: bullets(&[
                "Built and operated customer-facing APIs serving thousands of requests per minute",
                "Reduced deployment time by automating the release pipeline",
                "Mentored new engineers through code review and pairing",
            ]),
            ..ExperienceItem::default()
        },
        ExperienceItem {
            job: "Junior Developer".to_string(),
            company: "Sample Studio".to_string(),
            start_date: "June 2020".to_string(),
            end_date: "December 2021".to_string(),
            location: "City, ST".to_string(),
            bullets: bullets(&[
                "Implemented responsive front-end features for client websites",
                "Wrote integration tests that caught regressions before release",
            ]),
            ..ExperienceItem::default()
        },
    ];

    let skills = vec![
        SkillCategory {
            category: "Technical".to_string(),
            skills: strings(&["Rust", "TypeScript", "SQL", "Git", "Docker"]),
            ..SkillCategory::default()
        },
        SkillCategory {
            category: "Professional".to_string(),
            skills: strings(&["Communication", "Problem Solving", "Team Collaboration"]),
            ..SkillCategory::default()
        },
    ];

    let education = vec![EducationItem {
        school: "State University".to_string(),
        degree: "B.S. Computer Science".to_string(),
        start_date: "August 2016".to_string(),
        end_date: "May 2020".to_string(),
        location: "City, ST".to_string(),
        ..EducationItem::default()
    }];

    let projects = vec![Project {
        title: "Personal Portfolio".to_string(),
        skills_used: strings(&["Rust", "HTML", "CSS"]),
        description: "Designed and built a static portfolio site with a custom build step and \
                      automated deployment."
            .to_string(),
        ..Project::default()
    }];

    let other = vec![OtherItem {
        title: "Volunteering".to_string(),
        content: "Organised a monthly community coding workshop for beginners.".to_string(),
        ..OtherItem::default()
    }];

    Document {
        personal: Section::new(SectionKind::Personal, 0, personal),
        objective: Section::new(SectionKind::Objective, 1, objective),
        experience: Section::new(SectionKind::Experience, 2, experience),
        skills: Section::new(SectionKind::Skills, 3, skills),
        education: Section::new(SectionKind::Education, 4, education),
        projects: Section::new(SectionKind::Projects, 5, projects),
        other: Section::new(SectionKind::Other, 6, other),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
