//! Reducer: the single mutation surface for the resume Document.
//!
//! Every operation is a pure function `(document, args) -> new document`; the caller owns
//! propagating the result to persistence and to the rendered view.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::document::ordering;
use crate::document::schema::{
    default_document, Document, EducationItem, ExperienceItem, ListItem, Objective,
    ObjectiveData, OtherItem, PersonalInfo, Project, SectionKind, SkillCategory,
};
use crate::document::DocumentError;

// ────────────────────────────────────────────────────────────────────────────
// Patches
// ────────────────────────────────────────────────────────────────────────────

/// Partial personal record: only present fields are written.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub personal_site: Option<String>,
}

/// Partial objective record: only present fields are written.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectivePatch {
    pub active_index: Option<usize>,
    pub objectives: Option<Vec<Objective>>,
}

/// Section payload update, typed by the section it targets.
/// Record sections merge field by field; list sections are replaced wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionDataPatch {
    Personal(PersonalPatch),
    Objective(ObjectivePatch),
    Experience(Vec<ExperienceItem>),
    Skills(Vec<SkillCategory>),
    Education(Vec<EducationItem>),
    Projects(Vec<Project>),
    Other(Vec<OtherItem>),
}

impl SectionDataPatch {
    /// Decodes a JSON payload against the shape of `kind`.
    pub fn decode(kind: SectionKind, value: Value) -> Result<Self, DocumentError> {
        let invalid = |e: serde_json::Error| DocumentError::InvalidData {
            section: kind,
            message: e.to_string(),
        };
        Ok(match kind {
            SectionKind::Personal => Self::Personal(serde_json::from_value(value).map_err(invalid)?),
            SectionKind::Objective => {
                Self::Objective(serde_json::from_value(value).map_err(invalid)?)
            }
            SectionKind::Experience => {
                Self::Experience(serde_json::from_value(value).map_err(invalid)?)
            }
            SectionKind::Skills => Self::Skills(serde_json::from_value(value).map_err(invalid)?),
            SectionKind::Education => {
                Self::Education(serde_json::from_value(value).map_err(invalid)?)
            }
            SectionKind::Projects => Self::Projects(serde_json::from_value(value).map_err(invalid)?),
            SectionKind::Other => Self::Other(serde_json::from_value(value).map_err(invalid)?),
        })
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Personal(_) => SectionKind::Personal,
            Self::Objective(_) => SectionKind::Objective,
            Self::Experience(_) => SectionKind::Experience,
            Self::Skills(_) => SectionKind::Skills,
            Self::Education(_) => SectionKind::Education,
            Self::Projects(_) => SectionKind::Projects,
            Self::Other(_) => SectionKind::Other,
        }
    }
}

/// Update for one section. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPatch {
    pub data: Option<SectionDataPatch>,
    pub enabled: Option<bool>,
    pub order: Option<u32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Actions
// ────────────────────────────────────────────────────────────────────────────

/// A named reducer operation, as sent by the editor UI.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    UpdateSectionData {
        section_id: SectionKind,
        #[serde(default)]
        data: Option<Value>,
        #[serde(default)]
        enabled: Option<bool>,
        #[serde(default)]
        order: Option<u32>,
    },
    ToggleEnabled {
        section_id: SectionKind,
    },
    ReorderSections {
        from_index: usize,
        to_index: usize,
    },
    Replace {
        document: Box<Document>,
    },
    Reset,
    AddItem {
        section_id: SectionKind,
    },
    DeleteItem {
        section_id: SectionKind,
        item_id: String,
    },
    ToggleItem {
        section_id: SectionKind,
        item_id: String,
    },
    SetActiveObjective {
        index: usize,
    },
    AddBullet {
        experience_id: String,
    },
    DeleteBullet {
        experience_id: String,
        bullet_id: String,
    },
    ToggleBullet {
        experience_id: String,
        bullet_id: String,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::UpdateSectionData { .. } => "updateSectionData",
            Action::ToggleEnabled { .. } => "toggleEnabled",
            Action::ReorderSections { .. } => "reorderSections",
            Action::Replace { .. } => "replace",
            Action::Reset => "reset",
            Action::AddItem { .. } => "addItem",
            Action::DeleteItem { .. } => "deleteItem",
            Action::ToggleItem { .. } => "toggleItem",
            Action::SetActiveObjective { .. } => "setActiveObjective",
            Action::AddBullet { .. } => "addBullet",
            Action::DeleteBullet { .. } => "deleteBullet",
            Action::ToggleBullet { .. } => "toggleBullet",
        }
    }
}

/// Applies one action to `document`, returning the new document.
pub fn apply(document: &Document, action: Action) -> Result<Document, DocumentError> {
    debug!("Applying {}", action.name());
    match action {
        Action::UpdateSectionData {
            section_id,
            data,
            enabled,
            order,
        } => {
            let data = data
                .map(|value| SectionDataPatch::decode(section_id, value))
                .transpose()?;
            update_section_data(document, section_id, SectionPatch { data, enabled, order })
        }
        Action::ToggleEnabled { section_id } => Ok(toggle_enabled(document, section_id)),
        Action::ReorderSections {
            from_index,
            to_index,
        } => reorder_sections(document, from_index, to_index),
        Action::Replace { document } => replace(*document),
        Action::Reset => Ok(reset()),
        Action::AddItem { section_id } => add_item(document, section_id),
        Action::DeleteItem {
            section_id,
            item_id,
        } => delete_item(document, section_id, &item_id),
        Action::ToggleItem {
            section_id,
            item_id,
        } => toggle_item(document, section_id, &item_id),
        Action::SetActiveObjective { index } => set_active_objective(document, index),
        Action::AddBullet { experience_id } => add_bullet(document, &experience_id),
        Action::DeleteBullet {
            experience_id,
            bullet_id,
        } => delete_bullet(document, &experience_id, &bullet_id),
        Action::ToggleBullet {
            experience_id,
            bullet_id,
        } => toggle_bullet(document, &experience_id, &bullet_id),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section primitives
// ────────────────────────────────────────────────────────────────────────────

/// Merges `patch` into one section. Only the named section changes, except that an
/// explicit `order` swaps with the section currently holding that order.
pub fn update_section_data(
    document: &Document,
    kind: SectionKind,
    patch: SectionPatch,
) -> Result<Document, DocumentError> {
    let mut next = match patch.order {
        Some(order) => ordering::move_to_order(document, kind, order)?,
        None => document.clone(),
    };

    if let Some(data) = patch.data {
        if data.kind() != kind {
            return Err(DocumentError::InvalidData {
                section: kind,
                message: format!("payload is shaped for {}", data.kind()),
            });
        }
        if let SectionDataPatch::Objective(objective) = &data {
            let mut merged = next.objective.data.clone();
            merge_objective(&mut merged, objective.clone());
            validate_objectives(&merged)?;
        }
        write_data(&mut next, data);
    }

    if let Some(enabled) = patch.enabled {
        next.set_enabled(kind, enabled);
    }

    Ok(next)
}

/// Writes already-validated payload patches. Used by the tailoring merge, whose patches
/// are built from a consistent snapshot and cannot break an invariant.
pub fn apply_data_patches(
    document: &Document,
    patches: impl IntoIterator<Item = SectionDataPatch>,
) -> Document {
    let mut next = document.clone();
    for patch in patches {
        write_data(&mut next, patch);
    }
    next
}

fn write_data(document: &mut Document, patch: SectionDataPatch) {
    match patch {
        SectionDataPatch::Personal(p) => merge_personal(&mut document.personal.data, p),
        SectionDataPatch::Objective(p) => merge_objective(&mut document.objective.data, p),
        SectionDataPatch::Experience(items) => document.experience.data = items,
        SectionDataPatch::Skills(items) => document.skills.data = items,
        SectionDataPatch::Education(items) => document.education.data = items,
        SectionDataPatch::Projects(items) => document.projects.data = items,
        SectionDataPatch::Other(items) => document.other.data = items,
    }
}

fn merge_personal(info: &mut PersonalInfo, patch: PersonalPatch) {
    let PersonalPatch {
        name,
        location,
        email,
        phone,
        linkedin,
        github,
        personal_site,
    } = patch;
    if let Some(v) = name {
        info.name = v;
    }
    if let Some(v) = location {
        info.location = v;
    }
    if let Some(v) = email {
        info.email = v;
    }
    if let Some(v) = phone {
        info.phone = v;
    }
    if linkedin.is_some() {
        info.linkedin = linkedin;
    }
    if github.is_some() {
        info.github = github;
    }
    if personal_site.is_some() {
        info.personal_site = personal_site;
    }
}

fn merge_objective(data: &mut ObjectiveData, patch: ObjectivePatch) {
    if let Some(objectives) = patch.objectives {
        data.objectives = objectives;
    }
    if let Some(index) = patch.active_index {
        data.active_index = index;
    }
}

/// Flips one section's `enabled` flag.
pub fn toggle_enabled(document: &Document, kind: SectionKind) -> Document {
    let mut next = document.clone();
    next.set_enabled(kind, !document.enabled(kind));
    next
}

/// Swaps two sections by display position. See [`ordering::reorder`].
pub fn reorder_sections(
    document: &Document,
    from: usize,
    to: usize,
) -> Result<Document, DocumentError> {
    ordering::reorder(document, from, to)
}

/// The default document. The session is responsible for clearing the persisted slot.
pub fn reset() -> Document {
    default_document()
}

/// Whole-document replace, accepted only if it satisfies the document invariants.
/// Section `id`/`type` are taken from the key each section is stored under.
pub fn replace(mut document: Document) -> Result<Document, DocumentError> {
    validate(&document)?;
    document.normalise_section_ids();
    Ok(document)
}

/// Checks the ordering and objective invariants.
pub fn validate(document: &Document) -> Result<(), DocumentError> {
    if !ordering::is_permutation(document) {
        return Err(DocumentError::BrokenOrder(SectionKind::ALL.len()));
    }
    validate_objectives(&document.objective.data)
}

fn validate_objectives(data: &ObjectiveData) -> Result<(), DocumentError> {
    if data.objectives.is_empty() {
        return Err(DocumentError::EmptyObjectives);
    }
    if data.active_index >= data.objectives.len() {
        return Err(DocumentError::ObjectiveIndexOutOfRange {
            index: data.active_index,
            len: data.objectives.len(),
        });
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Item operations
// ────────────────────────────────────────────────────────────────────────────

fn position_of<T: ListItem>(
    items: &[T],
    section: SectionKind,
    item_id: &str,
) -> Result<usize, DocumentError> {
    items
        .iter()
        .position(|item| item.id() == item_id)
        .ok_or_else(|| DocumentError::ItemNotFound {
            section,
            item_id: item_id.to_string(),
        })
}

fn remove_item<T: ListItem>(
    items: &mut Vec<T>,
    section: SectionKind,
    item_id: &str,
) -> Result<(), DocumentError> {
    let index = position_of(items, section, item_id)?;
    items.remove(index);
    Ok(())
}

fn flip_item<T: ListItem>(
    items: &mut [T],
    section: SectionKind,
    item_id: &str,
) -> Result<(), DocumentError> {
    let index = position_of(items, section, item_id)?;
    let enabled = items[index].enabled_mut();
    *enabled = !*enabled;
    Ok(())
}

/// Appends a blank item (fresh id, enabled) to a list section, or a blank objective.
pub fn add_item(document: &Document, kind: SectionKind) -> Result<Document, DocumentError> {
    let mut next = document.clone();
    match kind {
        SectionKind::Personal => {
            return Err(DocumentError::Unsupported {
                section: kind,
                reason: "personal details are a single record",
            })
        }
        SectionKind::Objective => next.objective.data.objectives.push(Objective::default()),
        SectionKind::Experience => next.experience.data.push(ExperienceItem::default()),
        SectionKind::Skills => next.skills.data.push(SkillCategory::default()),
        SectionKind::Education => next.education.data.push(EducationItem::default()),
        SectionKind::Projects => next.projects.data.push(Project::default()),
        SectionKind::Other => next.other.data.push(OtherItem::default()),
    }
    Ok(next)
}

/// Removes an item by id. Deleting the last remaining objective is a no-op.
pub fn delete_item(
    document: &Document,
    kind: SectionKind,
    item_id: &str,
) -> Result<Document, DocumentError> {
    let mut next = document.clone();
    match kind {
        SectionKind::Personal => {
            return Err(DocumentError::Unsupported {
                section: kind,
                reason: "personal details are a single record",
            })
        }
        SectionKind::Objective => delete_objective(&mut next.objective.data, item_id)?,
        SectionKind::Experience => remove_item(&mut next.experience.data, kind, item_id)?,
        SectionKind::Skills => remove_item(&mut next.skills.data, kind, item_id)?,
        SectionKind::Education => remove_item(&mut next.education.data, kind, item_id)?,
        SectionKind::Projects => remove_item(&mut next.projects.data, kind, item_id)?,
        SectionKind::Other => remove_item(&mut next.other.data, kind, item_id)?,
    }
    Ok(next)
}

fn delete_objective(data: &mut ObjectiveData, item_id: &str) -> Result<(), DocumentError> {
    let index = data
        .objectives
        .iter()
        .position(|o| o.id == item_id)
        .ok_or_else(|| DocumentError::ItemNotFound {
            section: SectionKind::Objective,
            item_id: item_id.to_string(),
        })?;
    if data.objectives.len() <= 1 {
        return Ok(());
    }

    data.objectives.remove(index);
    if data.active_index >= index && data.active_index > 0 {
        data.active_index -= 1;
    }
    data.active_index = data.active_index.min(data.objectives.len() - 1);
    Ok(())
}

/// Flips one list item's `enabled` flag.
pub fn toggle_item(
    document: &Document,
    kind: SectionKind,
    item_id: &str,
) -> Result<Document, DocumentError> {
    let mut next = document.clone();
    match kind {
        SectionKind::Personal | SectionKind::Objective => {
            return Err(DocumentError::Unsupported {
                section: kind,
                reason: "entries in this section cannot be toggled",
            })
        }
        SectionKind::Experience => flip_item(&mut next.experience.data, kind, item_id)?,
        SectionKind::Skills => flip_item(&mut next.skills.data, kind, item_id)?,
        SectionKind::Education => flip_item(&mut next.education.data, kind, item_id)?,
        SectionKind::Projects => flip_item(&mut next.projects.data, kind, item_id)?,
        SectionKind::Other => flip_item(&mut next.other.data, kind, item_id)?,
    }
    Ok(next)
}

/// Chooses which objective is shown on the resume.
pub fn set_active_objective(document: &Document, index: usize) -> Result<Document, DocumentError> {
    let len = document.objective.data.objectives.len();
    if index >= len {
        return Err(DocumentError::ObjectiveIndexOutOfRange { index, len });
    }
    let mut next = document.clone();
    next.objective.data.active_index = index;
    Ok(next)
}

fn experience_mut<'a>(
    document: &'a mut Document,
    experience_id: &str,
) -> Result<&'a mut ExperienceItem, DocumentError> {
    let index = position_of(&document.experience.data, SectionKind::Experience, experience_id)?;
    Ok(&mut document.experience.data[index])
}

pub fn add_bullet(document: &Document, experience_id: &str) -> Result<Document, DocumentError> {
    let mut next = document.clone();
    experience_mut(&mut next, experience_id)?
        .bullets
        .push(Default::default());
    Ok(next)
}

pub fn delete_bullet(
    document: &Document,
    experience_id: &str,
    bullet_id: &str,
) -> Result<Document, DocumentError> {
    let mut next = document.clone();
    let item = experience_mut(&mut next, experience_id)?;
    remove_item(&mut item.bullets, SectionKind::Experience, bullet_id)?;
    Ok(next)
}

pub fn toggle_bullet(
    document: &Document,
    experience_id: &str,
    bullet_id: &str,
) -> Result<Document, DocumentError> {
    let mut next = document.clone();
    let item = experience_mut(&mut next, experience_id)?;
    flip_item(&mut item.bullets, SectionKind::Experience, bullet_id)?;
    Ok(next)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
