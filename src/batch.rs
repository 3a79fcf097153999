use std::collections::HashMap;

use tracing::{debug, warn};

use crate::errors::HealthGraphError;
use crate::resolution::RelationResolver;
use crate::types::*;

/// A document whose relation graph could not be resolved.
#[derive(Debug)]
pub struct DocumentError {
    pub id: String,
    pub error: HealthGraphError,
}

/// Outcome of resolving a batch of documents.
///
/// Successful documents and failed documents are kept apart; a failure in
/// one document never affects another.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub documents: Vec<ResolvedDocument>,
    pub errors: Vec<DocumentError>,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn error_for(&self, id: &str) -> Option<&HealthGraphError> {
        self.errors.iter().find(|e| e.id == id).map(|e| &e.error)
    }

    /// Orders documents and errors by the caller-supplied `id -> position`
    /// map. Ids missing from the map go last, keeping their current order.
    pub fn sort_by_order(&mut self, order: &HashMap<String, usize>) {
        let key = |id: &str| order.get(id).copied().unwrap_or(usize::MAX);
        self.documents.sort_by_key(|d| key(&d.id));
        self.errors.sort_by_key(|e| key(&e.id));
    }
}

/// Resolves every document in `inputs` independently.
pub fn resolve_batch(resolver: &RelationResolver, inputs: &[DocumentInput]) -> BatchResult {
    let mut result = BatchResult::default();

    for (position, input) in inputs.iter().enumerate() {
        match resolver.resolve_document(position, input) {
            Ok(document) => {
                debug!(
                    id = %document.id,
                    entities = document.len(),
                    relations = document.relation_count(),
                    "resolved document"
                );
                result.documents.push(document);
            }
            Err(error) => {
                warn!(id = %input.id, %error, "failed to resolve document");
                result.errors.push(DocumentError {
                    id: input.id.clone(),
                    error,
                });
            }
        }
    }

    result
}

/// Builds an `id -> position` map from an ordered list of document ids.
pub fn order_from_ids<S: AsRef<str>>(ids: &[S]) -> HashMap<String, usize> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| (id.as_ref().to_string(), i))
        .collect()
}
