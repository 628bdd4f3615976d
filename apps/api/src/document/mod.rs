// Resume document state engine.
// Schema and identity rules, the section ordering engine, and the reducer that is
// the only legitimate way to produce a new Document.

pub mod handlers;
pub mod ordering;
pub mod reducer;
pub mod schema;

use thiserror::Error;

use crate::document::schema::SectionKind;

/// Precondition and shape failures raised by document operations.
///
/// None of these are fatal: the caller keeps its current Document and reports the error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DocumentError {
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Display index {index} is out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Order {order} is out of range (0..{len})")]
    OrderOutOfRange { order: u32, len: usize },

    #[error("Section orders are not a permutation of 0..{0}")]
    BrokenOrder(usize),

    #[error("Item {item_id} not found in {section}")]
    ItemNotFound { section: SectionKind, item_id: String },

    #[error("Operation not supported for {section}: {reason}")]
    Unsupported {
        section: SectionKind,
        reason: &'static str,
    },

    #[error("Invalid data for {section}: {message}")]
    InvalidData {
        section: SectionKind,
        message: String,
    },

    #[error("Active objective index {index} is out of range (0..{len})")]
    ObjectiveIndexOutOfRange { index: usize, len: usize },

    #[error("At least one objective must remain")]
    EmptyObjectives,
}
