use wellmatch_model::{
    MatchOptions, PractitionerId, PractitionerRecord, RegistrySnapshot, SynonymTable,
};

fn record(id: usize, name: &str, specialty: &str) -> PractitionerRecord {
    PractitionerRecord::new(PractitionerId::from_position(id), name, specialty).unwrap()
}

#[test]
fn snapshot_counts_specialties_case_insensitively() {
    let snapshot = RegistrySnapshot::from_records(vec![
        record(1, "Dr. Iyer", "Neuro"),
        record(2, "Dr. Khan", "neuro"),
        record(3, "Dr. Das", "Ortho"),
    ]);
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.specialty_count(), 2);
    assert!(!snapshot.is_empty());
}

#[test]
fn options_round_trip_through_json() {
    let options = MatchOptions::strict();
    let json = serde_json::to_string(&options).expect("serialize options");
    let back: MatchOptions = serde_json::from_str(&json).expect("deserialize options");
    assert_eq!(back, options);
}

#[test]
fn partial_options_fill_from_defaults() {
    let json = r#"{ "selection": { "max_results": 3 }, "tiers": { "fuzzy_similarity": 0.8 } }"#;
    let options: MatchOptions = serde_json::from_str(json).expect("deserialize partial options");
    assert_eq!(options.selection.max_results, 3);
    assert_eq!(options.selection.min_final_score, 0.08);
    assert_eq!(options.tiers.fuzzy_similarity, 0.8);
    assert_eq!(options.synonyms, SynonymTable::default());
    options.validate().expect("partial options stay valid");
}

#[test]
fn synonym_table_deserializes_from_plain_map() {
    let json = r#"{ "synonyms": { "sleep": ["insomnia", "restless"] } }"#;
    let options: MatchOptions = serde_json::from_str(json).expect("deserialize synonyms");
    assert_eq!(options.synonyms.len(), 1);
    assert_eq!(
        options.synonyms.synonyms_of("sleep").unwrap(),
        ["insomnia".to_string(), "restless".to_string()]
    );
}

#[test]
fn records_serialize_with_unknown_fields_as_null() {
    let json = serde_json::to_value(record(4, "Dr. Sen", "Ayurveda")).unwrap();
    assert_eq!(json["id"], "4");
    assert!(json["rating"].is_null());
    assert!(json["location"].is_null());
    assert_eq!(json["treatable_symptoms"][0], "ayurveda");
}
