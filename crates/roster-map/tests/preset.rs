use std::collections::BTreeMap;

use roster_map::{MappingMachine, MappingPreset};
use roster_model::{CanonicalField, ColumnMapping, FileIntrospection, SessionId, UploadedFile};
use tempfile::tempdir;

fn mapping_machine(columns: &[&str]) -> MappingMachine {
    let mut machine = MappingMachine::new();
    let ticket = machine
        .select_file(UploadedFile::new("roster.csv", 512, "roster.csv"))
        .expect("accepted");
    let introspection = FileIntrospection {
        session_id: SessionId::from("s-9".to_string()),
        filename: "roster.csv".to_string(),
        total_rows: 1,
        columns: columns.iter().map(|c| (*c).to_string()).collect(),
        suggestions: BTreeMap::new(),
        sample_rows: Vec::new(),
    };
    machine
        .complete_upload(&ticket, Ok(introspection))
        .expect("current");
    machine
}

fn preset() -> MappingPreset {
    let mapping: ColumnMapping = [
        ("Roll No".to_string(), CanonicalField::StudentId),
        ("Name".to_string(), CanonicalField::Name),
        ("Att%".to_string(), CanonicalField::AttendancePercentage),
        ("Marks".to_string(), CanonicalField::Marks),
        ("Bus Route".to_string(), CanonicalField::DistanceFromCollege),
    ]
    .into_iter()
    .collect();
    MappingPreset::new(mapping).with_description("semester export")
}

#[test]
fn save_and_load_preserves_mapping() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("presets").join("semester.json");

    let saved = preset();
    saved.save(&path).expect("save preset");
    let loaded = MappingPreset::load(&path).expect("load preset");

    assert_eq!(loaded, saved);
    assert_eq!(loaded.version, "1.0");
    assert_eq!(loaded.description.as_deref(), Some("semester export"));

    let raw = std::fs::read_to_string(&path).expect("read");
    assert!(raw.contains("\"Roll No\": \"student_id\""));
}

#[test]
fn version_defaults_when_absent() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bare.json");
    std::fs::write(&path, r#"{"mapping": {"ID": "student_id"}}"#).expect("write");

    let loaded = MappingPreset::load(&path).expect("load preset");
    assert_eq!(loaded.version, "1.0");
    assert_eq!(loaded.mapping.get("ID"), Some(CanonicalField::StudentId));
}

#[test]
fn unknown_field_fails_to_load() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"mapping": {"ID": "student_number"}}"#).expect("write");

    let err = MappingPreset::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse mapping preset"));
}

#[test]
fn apply_skips_columns_the_file_lacks() {
    let mut machine = mapping_machine(&["Roll No", "Name", "Att%", "Marks"]);
    let application = preset().apply_to(&mut machine).expect("mapping phase");

    assert_eq!(application.applied.len(), 4);
    assert_eq!(application.skipped, vec!["Bus Route".to_string()]);
    assert!(machine.readiness().expect("readiness").is_ready());
}

#[test]
fn apply_outside_mapping_fails() {
    let mut machine = MappingMachine::new();
    assert!(preset().apply_to(&mut machine).is_err());
}
