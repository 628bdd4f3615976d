//! Persistence adapter: bridges the Document (and the cover letter) to their durable slots.
//!
//! Storage faults are never surfaced: a failed read falls back to defaults, a failed
//! write is logged and dropped. The in-memory Document stays authoritative.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::document::ordering;
use crate::document::schema::{default_document, is_known_section_type, Document, SectionKind};
use crate::persistence::{SlotStore, COVER_LETTER_SLOT, RESUME_SLOT};

pub struct PersistenceAdapter {
    store: Arc<dyn SlotStore>,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Loads the persisted Document, merged over the default at section level.
    ///
    /// Each persisted section replaces its default wholesale; fields added to a section's
    /// schema later are not back-filled into an already-persisted section.
    pub async fn load(&self) -> Document {
        let raw = match self.store.read(RESUME_SLOT).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved resume data, starting from default document");
                return default_document();
            }
            Err(e) => {
                error!("Error loading saved resume data: {e}");
                return default_document();
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Saved resume data is not valid JSON, using default document: {e}");
                return default_document();
            }
        };
        let Some(sections) = parsed.as_object() else {
            warn!("Saved resume data is not an object, using default document");
            return default_document();
        };

        let mut document = default_document();
        for kind in SectionKind::ALL {
            let Some(section) = sections.get(kind.as_str()) else {
                continue;
            };
            if let Err(e) = document.replace_section(kind, section.clone()) {
                warn!("Saved {kind} section is malformed, keeping default: {e}");
            }
        }
        for key in sections.keys().filter(|key| !is_known_section_type(key)) {
            debug!("Ignoring unknown saved section '{key}'");
        }

        repair_objectives(&mut document);
        if !ordering::is_permutation(&document) {
            warn!("Saved section orders are inconsistent, repairing");
            document = ordering::repair_order(&document);
        }
        document
    }

    /// Overwrites the slot with a full snapshot. Failures are logged and dropped.
    pub async fn save(&self, document: &Document) {
        let raw = match serde_json::to_string(document) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error serializing resume data: {e}");
                return;
            }
        };
        if let Err(e) = self.store.write(RESUME_SLOT, &raw).await {
            error!("Error saving resume data: {e}");
        }
    }

    /// Removes the snapshot so the next `load` yields the default document.
    pub async fn clear(&self) {
        if let Err(e) = self.store.remove(RESUME_SLOT).await {
            error!("Error clearing saved resume data: {e}");
        }
    }
}

/// Restores the objective invariants on a loaded Document: an empty objective list falls
/// back to the default section, an out-of-range `activeIndex` is clamped to the last entry.
fn repair_objectives(document: &mut Document) {
    if document.objective.data.objectives.is_empty() {
        warn!("Saved objective section has no objectives, keeping default");
        document.objective = default_document().objective;
        return;
    }
    let data = &mut document.objective.data;
    if data.active_index >= data.objectives.len() {
        warn!(
            "Saved active objective {} is out of range (0..{}), clamping",
            data.active_index,
            data.objectives.len()
        );
        data.active_index = data.objectives.len() - 1;
    }
}

/// The sibling free-text cover letter, stored as raw text.
pub struct CoverLetterStore {
    store: Arc<dyn SlotStore>,
}

impl CoverLetterStore {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Absent or unreadable content loads as an empty letter.
    pub async fn load(&self) -> String {
        match self.store.read(COVER_LETTER_SLOT).await {
            Ok(content) => content.unwrap_or_default(),
            Err(e) => {
                warn!("Error loading cover letter: {e}");
                String::new()
            }
        }
    }

    pub async fn save(&self, content: &str) {
        if let Err(e) = self.store.write(COVER_LETTER_SLOT, content).await {
            error!("Error saving cover letter: {e}");
        }
    }

    pub async fn clear(&self) {
        if let Err(e) = self.store.remove(COVER_LETTER_SLOT).await {
            error!("Error clearing cover letter: {e}");
        }
    }
}
