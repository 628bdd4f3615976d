//! Ordering engine: keeps section `order` values a permutation of `0..SECTION_COUNT`.
//!
//! Reordering is a pairwise swap, not a shift: dragging a section past several others
//! walks it through the list one hover event (one swap) at a time.

use tracing::debug;

use crate::document::schema::{Document, SectionKind, SectionSummary, SECTION_COUNT};
use crate::document::DocumentError;

/// Section kinds sorted by `order` ascending. Ties (only possible in a broken document)
/// fall back to canonical order so the result is deterministic.
pub fn display_order(document: &Document) -> Vec<SectionKind> {
    let mut kinds = SectionKind::ALL.to_vec();
    kinds.sort_by_key(|kind| (document.order(*kind), kind.canonical_index()));
    kinds
}

/// Returns true if the section orders form a permutation of `0..SECTION_COUNT`.
pub fn is_permutation(document: &Document) -> bool {
    let mut seen = [false; SECTION_COUNT];
    for kind in SectionKind::ALL {
        let order = document.order(kind) as usize;
        if order >= SECTION_COUNT || seen[order] {
            return false;
        }
        seen[order] = true;
    }
    true
}

/// Swaps the orders of the sections at two display positions.
///
/// `from == to` is a no-op. No section other than the two named ones changes.
pub fn reorder(document: &Document, from: usize, to: usize) -> Result<Document, DocumentError> {
    let sorted = display_order(document);
    for index in [from, to] {
        if index >= sorted.len() {
            return Err(DocumentError::IndexOutOfRange {
                index,
                len: sorted.len(),
            });
        }
    }

    let mut next = document.clone();
    if from == to {
        return Ok(next);
    }

    let (dragged, hovered) = (sorted[from], sorted[to]);
    let (dragged_order, hovered_order) = (document.order(dragged), document.order(hovered));
    next.set_order(dragged, hovered_order);
    next.set_order(hovered, dragged_order);

    debug!("Swapped {dragged} (order {dragged_order}) with {hovered} (order {hovered_order})");
    Ok(next)
}

/// Gives `kind` the order value `order` by swapping with the section that currently holds it.
pub fn move_to_order(
    document: &Document,
    kind: SectionKind,
    order: u32,
) -> Result<Document, DocumentError> {
    if order as usize >= SECTION_COUNT {
        return Err(DocumentError::OrderOutOfRange {
            order,
            len: SECTION_COUNT,
        });
    }

    let current = document.order(kind);
    let mut next = document.clone();
    if let Some(holder) = SectionKind::ALL
        .into_iter()
        .find(|other| *other != kind && document.order(*other) == order)
    {
        next.set_order(holder, current);
    }
    next.set_order(kind, order);
    Ok(next)
}

/// Reassigns orders `0..SECTION_COUNT` following the current display order.
/// A document that already satisfies the invariant is returned unchanged.
pub fn repair_order(document: &Document) -> Document {
    let mut next = document.clone();
    if is_permutation(document) {
        return next;
    }
    for (position, kind) in display_order(document).into_iter().enumerate() {
        next.set_order(kind, position as u32);
    }
    next
}

/// Section index rows in display order.
pub fn section_summaries(document: &Document) -> Vec<SectionSummary> {
    display_order(document)
        .into_iter()
        .map(|kind| SectionSummary {
            id: kind,
            title: kind.title(),
            enabled: document.enabled(kind),
            order: document.order(kind),
        })
        .collect()
}
