use tracing::{debug, warn};

use crate::config::{CyclePolicy, DuplicateTargetPolicy, ResolverConfig};
use crate::errors::{HealthGraphError, Result};
use crate::graph::find_cycle;
use crate::types::*;

use super::reference::parse_reference_in;

/// Builds the relation graph of a document from its flat entity and
/// relation lists.
///
/// Every resolved entity is keyed by its position in the entity list, so the
/// result is an arena: a relation pointing at an entity refers to that
/// entity's single resolved node rather than a fresh expansion of it. This
/// keeps cyclic relation chains finite without any re-entry.
pub struct RelationResolver {
    config: ResolverConfig,
}

impl Default for RelationResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl RelationResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves one document's entities against its relations.
    ///
    /// Returns one `ResolvedEntity` per input entity, in input order. Any
    /// unparseable or out-of-range reference, and any violation of the
    /// configured duplicate or cycle policy, fails the whole document.
    pub fn resolve(&self, entities: &[Entity], relations: &[Relation]) -> Result<Vec<ResolvedEntity>> {
        self.resolve_in(entities, relations, None)
    }

    /// Resolves a document that sits at `position` in its batch.
    ///
    /// `position` is only consulted when `check_document_index` is enabled.
    pub fn resolve_document(&self, position: usize, input: &DocumentInput) -> Result<ResolvedDocument> {
        let document = self.config.check_document_index.then_some(position);
        let entities = self.resolve_in(&input.entities, &input.relations, document)?;
        Ok(ResolvedDocument {
            id: input.id.clone(),
            entities,
        })
    }

    fn resolve_in(
        &self,
        entities: &[Entity],
        relations: &[Relation],
        document: Option<usize>,
    ) -> Result<Vec<ResolvedEntity>> {
        debug!(
            entities = entities.len(),
            relations = relations.len(),
            "resolving relation graph"
        );

        if relations.is_empty() {
            return Ok(entities
                .iter()
                .enumerate()
                .map(|(i, entity)| ResolvedEntity {
                    index: EntityIndex(i),
                    entity: entity.clone(),
                    relations: RelatedEntities::new(),
                })
                .collect());
        }

        let outgoing = self.collect_outgoing(entities.len(), relations, document)?;

        if self.config.cycle_policy == CyclePolicy::Reject {
            if let Some(path) = find_cycle(outgoing.len(), |i| &outgoing[i]) {
                return Err(HealthGraphError::CyclicRelationGraph {
                    path: path.into_iter().map(EntityIndex::get).collect(),
                });
            }
        }

        Ok(entities
            .iter()
            .zip(outgoing)
            .enumerate()
            .map(|(i, (entity, relations))| ResolvedEntity {
                index: EntityIndex(i),
                entity: entity.clone(),
                relations,
            })
            .collect())
    }

    /// Parses every relation once and groups the targets by source entity,
    /// preserving relation order within each source.
    fn collect_outgoing(
        &self,
        entity_count: usize,
        relations: &[Relation],
        document: Option<usize>,
    ) -> Result<Vec<RelatedEntities>> {
        let mut outgoing = vec![RelatedEntities::new(); entity_count];

        for relation in relations {
            let source = parse_reference_in(&relation.source, entity_count, document)?;
            let target = parse_reference_in(&relation.target, entity_count, document)?;

            let previous = outgoing[source.get()].insert(target, relation.relation_type.clone());

            match previous {
                Some(prev) if prev != relation.relation_type => {
                    match self.config.duplicate_target_policy {
                        DuplicateTargetPolicy::Reject => {
                            return Err(HealthGraphError::DuplicateRelation {
                                from: source.get(),
                                to: target.get(),
                            });
                        }
                        DuplicateTargetPolicy::LastWins => {
                            warn!(
                                source = source.get(),
                                target = target.get(),
                                replaced = prev.as_str(),
                                kept = relation.relation_type.as_str(),
                                "duplicate relation target, keeping last relation type"
                            );
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(outgoing)
    }
}
