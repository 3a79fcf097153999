use std::fmt;

use crate::errors::{HealthGraphError, Result};
use crate::types::EntityIndex;

const DOCUMENTS_PREFIX: &str = "#/results/documents/";
const ENTITIES_SEGMENT: &str = "/entities/";

/// A parsed entity reference of the form
/// `#/results/documents/{document}/entities/{entity}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityReference {
    pub document: usize,
    pub entity: usize,
}

impl EntityReference {
    pub fn new(document: usize, entity: usize) -> Self {
        Self { document, entity }
    }

    /// Parses a reference string in a single left-to-right pass.
    ///
    /// Returns `None` if the string deviates from the grammar in any way:
    /// missing segments, empty or non-digit indices, trailing characters, or
    /// an index too large for `usize`.
    pub fn parse(reference: &str) -> Option<EntityReference> {
        let rest = reference.strip_prefix(DOCUMENTS_PREFIX)?;
        let (document, rest) = take_index(rest)?;
        let rest = rest.strip_prefix(ENTITIES_SEGMENT)?;
        let (entity, rest) = take_index(rest)?;
        if !rest.is_empty() {
            return None;
        }
        Some(EntityReference { document, entity })
    }

    pub fn entity_index(&self) -> EntityIndex {
        EntityIndex(self.entity)
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            DOCUMENTS_PREFIX, self.document, ENTITIES_SEGMENT, self.entity
        )
    }
}

/// Consumes one or more leading ASCII digits, returning their value and the
/// remaining input.
fn take_index(input: &str) -> Option<(usize, &str)> {
    let digits = input.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let mut value: usize = 0;
    for b in input[..digits].bytes() {
        value = value
            .checked_mul(10)?
            .checked_add(usize::from(b - b'0'))?;
    }
    Some((value, &input[digits..]))
}

/// Parses `reference` and checks that its entity index falls inside a
/// document holding `entity_count` entities.
///
/// Grammar failures and out-of-range indices are both reported as
/// `HealthGraphError::InvalidReference` carrying the original string.
pub fn parse_reference(reference: &str, entity_count: usize) -> Result<EntityIndex> {
    parse_reference_in(reference, entity_count, None)
}

/// Like [`parse_reference`], and additionally requires the document index to
/// equal `document` when one is given.
pub fn parse_reference_in(
    reference: &str,
    entity_count: usize,
    document: Option<usize>,
) -> Result<EntityIndex> {
    let parsed = EntityReference::parse(reference)
        .ok_or_else(|| HealthGraphError::invalid_reference(reference))?;

    if parsed.entity >= entity_count {
        return Err(HealthGraphError::invalid_reference(reference));
    }

    if let Some(expected) = document {
        if parsed.document != expected {
            return Err(HealthGraphError::invalid_reference(reference));
        }
    }

    Ok(parsed.entity_index())
}
