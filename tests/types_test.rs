use healthgraph::types::*;

#[test]
fn relation_type_as_str_roundtrip() {
    let kinds = vec![
        RelationType::Abbreviation,
        RelationType::DirectionOfBodyStructure,
        RelationType::DirectionOfCondition,
        RelationType::DirectionOfExamination,
        RelationType::DirectionOfTreatment,
        RelationType::DosageOfMedication,
        RelationType::FormOfMedication,
        RelationType::FrequencyOfMedication,
        RelationType::FrequencyOfTreatment,
        RelationType::QualifierOfCondition,
        RelationType::RelationOfExamination,
        RelationType::RouteOfMedication,
        RelationType::TimeOfCondition,
        RelationType::TimeOfEvent,
        RelationType::TimeOfExamination,
        RelationType::TimeOfMedication,
        RelationType::TimeOfTreatment,
        RelationType::UnitOfCondition,
        RelationType::UnitOfExamination,
        RelationType::ValueOfCondition,
        RelationType::ValueOfExamination,
    ];

    for kind in kinds {
        let s = kind.as_str().to_string();
        assert_eq!(RelationType::from_str(&s), kind, "roundtrip failed for {}", s);
    }
}

#[test]
fn relation_type_unknown_is_other() {
    assert_eq!(
        RelationType::from_str("CourseOfCondition"),
        RelationType::Other("CourseOfCondition".to_string())
    );
    assert_eq!(RelationType::from_str("abbreviation").as_str(), "abbreviation");
}

#[test]
fn relation_type_serializes_as_plain_string() {
    let json = serde_json::to_string(&RelationType::DosageOfMedication).unwrap();
    assert_eq!(json, "\"DosageOfMedication\"");

    let other: RelationType = serde_json::from_str("\"BodySiteOfCondition\"").unwrap();
    assert_eq!(other, RelationType::Other("BodySiteOfCondition".to_string()));
    assert_eq!(serde_json::to_string(&other).unwrap(), "\"BodySiteOfCondition\"");
}

#[test]
fn entity_new_measures_utf16_length() {
    let e = Entity::new("naïve 😀", "Diagnosis", 3);
    assert_eq!(e.offset, 3);
    assert_eq!(e.length, 8);
    assert!(e.data_sources.is_empty());
}

#[test]
fn related_entities_insert_replaces_in_place() {
    let mut map = RelatedEntities::new();
    assert_eq!(map.insert(EntityIndex(4), RelationType::TimeOfEvent), None);
    assert_eq!(map.insert(EntityIndex(1), RelationType::Abbreviation), None);
    assert_eq!(
        map.insert(EntityIndex(4), RelationType::TimeOfTreatment),
        Some(RelationType::TimeOfEvent)
    );

    let entries: Vec<_> = map.iter().collect();
    assert_eq!(
        entries,
        vec![
            (EntityIndex(4), &RelationType::TimeOfTreatment),
            (EntityIndex(1), &RelationType::Abbreviation),
        ]
    );
    assert!(map.contains(EntityIndex(1)));
    assert!(!map.contains(EntityIndex(0)));
}

#[test]
fn resolved_document_serializes_relations_by_index() {
    let mut relations = RelatedEntities::new();
    relations.insert(EntityIndex(1), RelationType::DosageOfMedication);
    let doc = ResolvedDocument {
        id: "1".to_string(),
        entities: vec![ResolvedEntity {
            index: EntityIndex(0),
            entity: Entity::new("10 mg", "Dosage", 0),
            relations,
        }],
    };

    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["entities"][0]["index"], 0);
    assert_eq!(value["entities"][0]["relations"][0]["target"], 1);
    assert_eq!(
        value["entities"][0]["relations"][0]["relation_type"],
        "DosageOfMedication"
    );

    let back: ResolvedDocument = serde_json::from_value(value).unwrap();
    assert_eq!(back, doc);
}
