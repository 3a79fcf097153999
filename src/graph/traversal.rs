use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Direction in which relations are followed during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalDirection {
    Outgoing,
    Incoming,
    Both,
}

/// Cycle-safe navigation over a resolved document.
///
/// All walks keep a visited set keyed by entity index, so cyclic relation
/// graphs are visited once per entity.
pub struct GraphTraverser<'a> {
    document: &'a ResolvedDocument,
    /// Reverse adjacency: target index -> sources, in entity order.
    incoming: HashMap<EntityIndex, Vec<EntityIndex>>,
}

impl<'a> GraphTraverser<'a> {
    pub fn new(document: &'a ResolvedDocument) -> Self {
        let mut incoming: HashMap<EntityIndex, Vec<EntityIndex>> = HashMap::new();
        for resolved in &document.entities {
            for target in resolved.relations.targets() {
                incoming.entry(target).or_default().push(resolved.index);
            }
        }
        Self { document, incoming }
    }

    /// Returns the entities `index` points at, with the relation type of
    /// each, in relation order.
    pub fn related(&self, index: EntityIndex) -> Vec<(&'a ResolvedEntity, &'a RelationType)> {
        let Some(resolved) = self.document.get(index) else {
            return Vec::new();
        };
        resolved
            .relations
            .iter()
            .filter_map(|(target, kind)| self.document.get(target).map(|e| (e, kind)))
            .collect()
    }

    /// Returns the entities that point at `index`, with the relation type of
    /// each, in source entity order.
    pub fn incoming(&self, index: EntityIndex) -> Vec<(&'a ResolvedEntity, &'a RelationType)> {
        let Some(sources) = self.incoming.get(&index) else {
            return Vec::new();
        };
        sources
            .iter()
            .filter_map(|&source| {
                let resolved = self.document.get(source)?;
                let kind = resolved.relations.get(index)?;
                Some((resolved, kind))
            })
            .collect()
    }

    fn neighbors(&self, index: EntityIndex, direction: TraversalDirection) -> Vec<EntityIndex> {
        let mut out = Vec::new();
        if matches!(
            direction,
            TraversalDirection::Outgoing | TraversalDirection::Both
        ) {
            if let Some(resolved) = self.document.get(index) {
                out.extend(resolved.relations.targets());
            }
        }
        if matches!(
            direction,
            TraversalDirection::Incoming | TraversalDirection::Both
        ) {
            if let Some(sources) = self.incoming.get(&index) {
                out.extend(sources.iter().copied());
            }
        }
        out
    }

    /// Breadth-first transitive closure of outgoing relations from `start`,
    /// up to `max_depth` hops.
    ///
    /// The start entity is only included when a cycle leads back to it.
    pub fn reachable(&self, start: EntityIndex, max_depth: usize) -> Vec<EntityIndex> {
        self.reachable_in(start, max_depth, TraversalDirection::Outgoing)
    }

    /// Like [`reachable`](Self::reachable), following relations in the given
    /// direction.
    pub fn reachable_in(
        &self,
        start: EntityIndex,
        max_depth: usize,
        direction: TraversalDirection,
    ) -> Vec<EntityIndex> {
        if self.document.get(start).is_none() {
            return Vec::new();
        }

        let mut visited: HashSet<EntityIndex> = HashSet::new();
        let mut result: Vec<EntityIndex> = Vec::new();
        let mut queue: VecDeque<(EntityIndex, usize)> = VecDeque::new();
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for neighbor in self.neighbors(current, direction) {
                if !visited.insert(neighbor) {
                    continue;
                }
                result.push(neighbor);
                queue.push_back((neighbor, depth + 1));
            }
        }

        result
    }

    /// Finds the shortest chain of outgoing relations from `from` to `to`.
    ///
    /// Returns the entity indices along the path, both endpoints included,
    /// or `None` when `to` is unreachable.
    pub fn find_path(&self, from: EntityIndex, to: EntityIndex) -> Option<Vec<EntityIndex>> {
        self.document.get(from)?;
        self.document.get(to)?;
        if from == to {
            return Some(vec![from]);
        }

        let mut parent: HashMap<EntityIndex, EntityIndex> = HashMap::new();
        let mut visited: HashSet<EntityIndex> = HashSet::new();
        let mut queue: VecDeque<EntityIndex> = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.neighbors(current, TraversalDirection::Outgoing) {
                if !visited.insert(neighbor) {
                    continue;
                }
                parent.insert(neighbor, current);
                if neighbor == to {
                    let mut path = vec![to];
                    let mut step = to;
                    while let Some(&prev) = parent.get(&step) {
                        path.push(prev);
                        step = prev;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(neighbor);
            }
        }

        None
    }

    /// Returns the first relation cycle in the document, if any.
    ///
    /// See [`find_cycle`] for the path format.
    pub fn find_cycle(&self) -> Option<Vec<EntityIndex>> {
        find_cycle(self.document.len(), |i| &self.document.entities[i].relations)
    }

    /// Flattens the document into a list of edges in entity order, then
    /// relation order.
    pub fn to_edges(&self) -> Vec<RelationEdge> {
        self.document
            .entities
            .iter()
            .flat_map(|resolved| {
                resolved
                    .relations
                    .iter()
                    .map(move |(target, kind)| RelationEdge {
                        source: resolved.index,
                        target,
                        relation_type: kind.clone(),
                    })
            })
            .collect()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first search for a cycle over `count` entities whose outgoing
/// relations are given by `relations_of`.
///
/// Entities are tried as roots in index order and targets in relation
/// order. The returned path starts and ends at the same entity, e.g.
/// `[0, 1, 0]`; a self-loop on entity 2 is `[2, 2]`. The search uses an
/// explicit stack, so deep relation chains cannot overflow the call stack.
pub fn find_cycle<'r, F>(count: usize, relations_of: F) -> Option<Vec<EntityIndex>>
where
    F: Fn(usize) -> &'r RelatedEntities,
{
    let mut state = vec![VisitState::Unvisited; count];

    for root in 0..count {
        if state[root] != VisitState::Unvisited {
            continue;
        }

        // Each frame holds an entity and the position of its next target.
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        state[root] = VisitState::InProgress;

        while let Some(frame) = stack.last_mut() {
            let (node, pos) = *frame;
            let next = relations_of(node).entries().get(pos).map(|e| e.target);
            frame.1 += 1;

            match next {
                None => {
                    state[node] = VisitState::Done;
                    stack.pop();
                }
                Some(target) => {
                    let t = target.get();
                    if t >= count {
                        continue;
                    }
                    match state[t] {
                        VisitState::Done => {}
                        VisitState::InProgress => {
                            let start = stack
                                .iter()
                                .position(|&(n, _)| n == t)
                                .unwrap_or(0);
                            let mut path: Vec<EntityIndex> =
                                stack[start..].iter().map(|&(n, _)| EntityIndex(n)).collect();
                            path.push(target);
                            return Some(path);
                        }
                        VisitState::Unvisited => {
                            state[t] = VisitState::InProgress;
                            stack.push((t, 0));
                        }
                    }
                }
            }
        }
    }

    None
}
