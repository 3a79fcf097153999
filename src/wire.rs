//! Reader for the healthcare text-analytics JSON response.
//!
//! Only the parts the resolver consumes are modelled: per-document ids,
//! entities, and relations. Document-level errors, warnings, statistics and
//! the model version are ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{HealthGraphError, Result};
use crate::types::*;

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    id: String,
    #[serde(default)]
    entities: Vec<WireEntity>,
    #[serde(default)]
    relations: Vec<WireRelation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntity {
    text: String,
    category: String,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    confidence_score: f64,
    offset: u32,
    length: u32,
    #[serde(default)]
    normalized_text: Option<String>,
    #[serde(default)]
    assertion: Option<WireAssertion>,
    #[serde(default)]
    links: Vec<WireLink>,
}

#[derive(Debug, Deserialize)]
struct WireAssertion {
    #[serde(default)]
    certainty: Option<String>,
    #[serde(default)]
    conditionality: Option<String>,
    #[serde(default)]
    association: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLink {
    data_source: String,
    id: String,
}

/// A relation in either the role form (`entities: [{ref, role}, ...]`) or
/// the flat form (`source` / `target`), never both. Roles are not read; the
/// first entity is the source and the second the target.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRelation {
    relation_type: String,
    #[serde(default)]
    entities: Vec<WireRelationEntity>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireRelationEntity {
    #[serde(rename = "ref")]
    reference: String,
}

impl From<WireEntity> for Entity {
    fn from(w: WireEntity) -> Self {
        Entity {
            text: w.text,
            category: w.category,
            subcategory: w.subcategory,
            confidence_score: w.confidence_score,
            offset: w.offset,
            length: w.length,
            normalized_text: w.normalized_text,
            assertion: w.assertion.map(|a| EntityAssertion {
                certainty: a.certainty,
                conditionality: a.conditionality,
                association: a.association,
            }),
            data_sources: w
                .links
                .into_iter()
                .map(|l| EntityDataSource {
                    name: l.data_source,
                    entity_id: l.id,
                })
                .collect(),
        }
    }
}

impl WireRelation {
    fn into_relation(self, document_id: &str) -> Result<Relation> {
        let relation_type = RelationType::from(self.relation_type);

        let flat = self.source.is_some() || self.target.is_some();
        if flat && !self.entities.is_empty() {
            return Err(HealthGraphError::Wire {
                message: format!(
                    "relation '{}' in document '{}' mixes source/target with an entities list",
                    relation_type, document_id
                ),
            });
        }

        if let (Some(source), Some(target)) = (self.source, self.target) {
            return Ok(Relation {
                relation_type,
                source,
                target,
            });
        }

        let count = self.entities.len();
        let mut entities = self.entities.into_iter();
        match (entities.next(), entities.next(), count) {
            (Some(source), Some(target), 2) => Ok(Relation {
                relation_type,
                source: source.reference,
                target: target.reference,
            }),
            _ => Err(HealthGraphError::Wire {
                message: format!(
                    "relation '{}' in document '{}' must name exactly two entities, found {}",
                    relation_type, document_id, count
                ),
            }),
        }
    }
}

/// Parses a response body into per-document resolver inputs, in response
/// order.
pub fn parse_response(json: &str) -> Result<Vec<DocumentInput>> {
    let response: WireResponse = serde_json::from_str(json)?;

    response
        .documents
        .into_iter()
        .map(|doc| {
            let relations = doc
                .relations
                .into_iter()
                .map(|r| r.into_relation(&doc.id))
                .collect::<Result<Vec<_>>>()?;
            Ok(DocumentInput {
                entities: doc.entities.into_iter().map(Entity::from).collect(),
                relations,
                id: doc.id,
            })
        })
        .collect()
}

/// Reads and parses a response body stored at `path`.
pub fn read_response(path: &Path) -> Result<Vec<DocumentInput>> {
    let contents = fs::read_to_string(path)?;
    parse_response(&contents)
}
