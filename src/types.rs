use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kinds of relations the healthcare model reports between two entities.
///
/// Values the service adds later are carried through as `Other` with the
/// original string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationType {
    Abbreviation,
    DirectionOfBodyStructure,
    DirectionOfCondition,
    DirectionOfExamination,
    DirectionOfTreatment,
    DosageOfMedication,
    FormOfMedication,
    FrequencyOfMedication,
    FrequencyOfTreatment,
    QualifierOfCondition,
    RelationOfExamination,
    RouteOfMedication,
    TimeOfCondition,
    TimeOfEvent,
    TimeOfExamination,
    TimeOfMedication,
    TimeOfTreatment,
    UnitOfCondition,
    UnitOfExamination,
    ValueOfCondition,
    ValueOfExamination,
    Other(String),
}

#[allow(clippy::should_implement_trait)]
impl RelationType {
    /// Returns the wire representation of this relation type.
    pub fn as_str(&self) -> &str {
        match self {
            RelationType::Abbreviation => "Abbreviation",
            RelationType::DirectionOfBodyStructure => "DirectionOfBodyStructure",
            RelationType::DirectionOfCondition => "DirectionOfCondition",
            RelationType::DirectionOfExamination => "DirectionOfExamination",
            RelationType::DirectionOfTreatment => "DirectionOfTreatment",
            RelationType::DosageOfMedication => "DosageOfMedication",
            RelationType::FormOfMedication => "FormOfMedication",
            RelationType::FrequencyOfMedication => "FrequencyOfMedication",
            RelationType::FrequencyOfTreatment => "FrequencyOfTreatment",
            RelationType::QualifierOfCondition => "QualifierOfCondition",
            RelationType::RelationOfExamination => "RelationOfExamination",
            RelationType::RouteOfMedication => "RouteOfMedication",
            RelationType::TimeOfCondition => "TimeOfCondition",
            RelationType::TimeOfEvent => "TimeOfEvent",
            RelationType::TimeOfExamination => "TimeOfExamination",
            RelationType::TimeOfMedication => "TimeOfMedication",
            RelationType::TimeOfTreatment => "TimeOfTreatment",
            RelationType::UnitOfCondition => "UnitOfCondition",
            RelationType::UnitOfExamination => "UnitOfExamination",
            RelationType::ValueOfCondition => "ValueOfCondition",
            RelationType::ValueOfExamination => "ValueOfExamination",
            RelationType::Other(s) => s,
        }
    }

    /// Parses a wire string into a `RelationType`.
    ///
    /// Unrecognized values become `RelationType::Other`.
    pub fn from_str(s: &str) -> RelationType {
        match s {
            "Abbreviation" => RelationType::Abbreviation,
            "DirectionOfBodyStructure" => RelationType::DirectionOfBodyStructure,
            "DirectionOfCondition" => RelationType::DirectionOfCondition,
            "DirectionOfExamination" => RelationType::DirectionOfExamination,
            "DirectionOfTreatment" => RelationType::DirectionOfTreatment,
            "DosageOfMedication" => RelationType::DosageOfMedication,
            "FormOfMedication" => RelationType::FormOfMedication,
            "FrequencyOfMedication" => RelationType::FrequencyOfMedication,
            "FrequencyOfTreatment" => RelationType::FrequencyOfTreatment,
            "QualifierOfCondition" => RelationType::QualifierOfCondition,
            "RelationOfExamination" => RelationType::RelationOfExamination,
            "RouteOfMedication" => RelationType::RouteOfMedication,
            "TimeOfCondition" => RelationType::TimeOfCondition,
            "TimeOfEvent" => RelationType::TimeOfEvent,
            "TimeOfExamination" => RelationType::TimeOfExamination,
            "TimeOfMedication" => RelationType::TimeOfMedication,
            "TimeOfTreatment" => RelationType::TimeOfTreatment,
            "UnitOfCondition" => RelationType::UnitOfCondition,
            "UnitOfExamination" => RelationType::UnitOfExamination,
            "ValueOfCondition" => RelationType::ValueOfCondition,
            "ValueOfExamination" => RelationType::ValueOfExamination,
            other => RelationType::Other(other.to_string()),
        }
    }
}

impl From<String> for RelationType {
    fn from(s: String) -> Self {
        RelationType::from_str(&s)
    }
}

impl From<RelationType> for String {
    fn from(kind: RelationType) -> Self {
        match kind {
            RelationType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-based position of an entity within its document's entity list.
///
/// This is the identity of an entity inside a document; two entities with
/// the same text are still distinct if their indices differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityIndex(pub usize);

impl EntityIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A link from an entity to an entry in an external knowledge source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDataSource {
    /// Name of the source, e.g. `UMLS` or `SNOMEDCT_US`.
    pub name: String,
    /// Identifier of the entity inside that source.
    pub entity_id: String,
}

/// Assertion qualifiers attached to a healthcare entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAssertion {
    pub certainty: Option<String>,
    pub conditionality: Option<String>,
    pub association: Option<String>,
}

/// One recognized healthcare concept occurrence in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub confidence_score: f64,
    /// Offset in UTF-16 code units from the start of the document.
    pub offset: u32,
    pub length: u32,
    pub normalized_text: Option<String>,
    pub assertion: Option<EntityAssertion>,
    pub data_sources: Vec<EntityDataSource>,
}

impl Entity {
    /// Creates an entity with the given text and category and no optional
    /// attributes.
    pub fn new(text: &str, category: &str, offset: u32) -> Self {
        Self {
            text: text.to_string(),
            category: category.to_string(),
            subcategory: None,
            confidence_score: 1.0,
            offset,
            length: saturating_u32(text.encode_utf16().count()),
            normalized_text: None,
            assertion: None,
            data_sources: Vec::new(),
        }
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// A directed, typed relation between two entities of one document, with
/// both endpoints given as reference strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub relation_type: RelationType,
    pub source: String,
    pub target: String,
}

impl Relation {
    pub fn new(relation_type: RelationType, source: &str, target: &str) -> Self {
        Self {
            relation_type,
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// One entry of an entity's relation map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntry {
    pub target: EntityIndex,
    pub relation_type: RelationType,
}

/// Map from related entity to relation type, keyed by entity index.
///
/// Entries keep the order in which their relations were supplied. Equality
/// ignores that order. Lookups go through a position index, so building a
/// map of `n` entries is linear in `n`.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RelatedEntry>", into = "Vec<RelatedEntry>")]
pub struct RelatedEntities {
    entries: Vec<RelatedEntry>,
    /// Target index -> position in `entries`.
    positions: HashMap<EntityIndex, usize>,
}

impl RelatedEntities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the relation type for `target`, returning the
    /// previous one. A replaced entry keeps its position.
    pub fn insert(&mut self, target: EntityIndex, relation_type: RelationType) -> Option<RelationType> {
        match self.positions.get(&target) {
            Some(&pos) => Some(std::mem::replace(
                &mut self.entries[pos].relation_type,
                relation_type,
            )),
            None => {
                self.positions.insert(target, self.entries.len());
                self.entries.push(RelatedEntry {
                    target,
                    relation_type,
                });
                None
            }
        }
    }

    pub fn get(&self, target: EntityIndex) -> Option<&RelationType> {
        self.positions
            .get(&target)
            .map(|&pos| &self.entries[pos].relation_type)
    }

    pub fn contains(&self, target: EntityIndex) -> bool {
        self.positions.contains_key(&target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[RelatedEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityIndex, &RelationType)> {
        self.entries.iter().map(|e| (e.target, &e.relation_type))
    }

    pub fn targets(&self) -> impl Iterator<Item = EntityIndex> + '_ {
        self.entries.iter().map(|e| e.target)
    }
}

impl From<Vec<RelatedEntry>> for RelatedEntities {
    fn from(entries: Vec<RelatedEntry>) -> Self {
        let mut map = RelatedEntities::new();
        for entry in entries {
            map.insert(entry.target, entry.relation_type);
        }
        map
    }
}

impl From<RelatedEntities> for Vec<RelatedEntry> {
    fn from(map: RelatedEntities) -> Self {
        map.entries
    }
}

impl PartialEq for RelatedEntities {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(target, kind)| other.get(target) == Some(kind))
    }
}

/// An entity together with its resolved relation map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub index: EntityIndex,
    pub entity: Entity,
    pub relations: RelatedEntities,
}

/// All resolved entities of one document, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    pub id: String,
    pub entities: Vec<ResolvedEntity>,
}

impl ResolvedDocument {
    pub fn get(&self, index: EntityIndex) -> Option<&ResolvedEntity> {
        self.entities.get(index.0)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Total number of relation entries across all entities.
    pub fn relation_count(&self) -> usize {
        self.entities.iter().map(|e| e.relations.len()).sum()
    }
}

/// A flattened relation between two resolved entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub source: EntityIndex,
    pub target: EntityIndex,
    pub relation_type: RelationType,
}

/// Entities and relations of one document as supplied by the response
/// deserializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub id: String,
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
}
