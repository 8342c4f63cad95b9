//! File and directory processing tests

use std::sync::Arc;
use veil::anonymization::detector::RegexDetector;
use veil::anonymization::{AnonymizationConfig, Orchestrator, SlugGenerator};
use veil::config::secret_string;
use veil::pipeline::ocr::NullOcr;
use veil::pipeline::{process_file, process_path, ProcessOutcome};
use veil::registry::{lookup_token, EntityRegistry};

fn orchestrator(registry: EntityRegistry) -> Orchestrator {
    Orchestrator::new(
        AnonymizationConfig::default(),
        Arc::new(RegexDetector::new().unwrap()),
        SlugGenerator::new(secret_string("pipeline-key".to_string())).unwrap(),
        registry,
    )
    .unwrap()
}

#[test]
fn test_text_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("incident.txt");
    std::fs::write(&input, "attacker came from 203.0.113.7 via web01.example.com").unwrap();

    let mut orch = orchestrator(EntityRegistry::open_in_memory().unwrap());
    let out_dir = dir.path().join("out");
    let output = process_file(&mut orch, &NullOcr, &input, &out_dir).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("[IP_ADDRESS_"));
    assert!(text.contains("[HOSTNAME_"));
    assert!(!text.contains("203.0.113.7"));
    assert!(!text.contains("web01.example.com"));
}

#[test]
fn test_csv_keeps_headers_and_clean_cells() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("contacts.csv");
    std::fs::write(&input, "name,email\nalice,alice@example.com\n").unwrap();

    let mut orch = orchestrator(EntityRegistry::open_in_memory().unwrap());
    let output = process_file(&mut orch, &NullOcr, &input, dir.path()).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("name,email\n"));
    assert!(text.contains("alice,"));
    assert!(text.contains("[EMAIL_ADDRESS_"));
    assert!(!text.contains("alice@example.com"));
}

#[test]
fn test_json_structure_survives() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan.json");
    std::fs::write(
        &input,
        r#"{"host": "db01.example.com", "port": 5432, "open": true}"#,
    )
    .unwrap();

    let mut orch = orchestrator(EntityRegistry::open_in_memory().unwrap());
    let output = process_file(&mut orch, &NullOcr, &input, dir.path()).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert!(value["host"].as_str().unwrap().starts_with("[HOSTNAME_"));
    assert_eq!(value["port"], 5432);
    assert_eq!(value["open"], true);
}

#[test]
fn test_xml_structure_survives() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.xml");
    std::fs::write(
        &input,
        "<scan><target os=\"linux\">db01.example.com</target></scan>",
    )
    .unwrap();

    let mut orch = orchestrator(EntityRegistry::open_in_memory().unwrap());
    let output = process_file(&mut orch, &NullOcr, &input, dir.path()).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("<target os=\"linux\">[HOSTNAME_"));
    assert!(text.contains("</target>"));
    assert!(!text.contains("db01.example.com"));
}

#[test]
fn test_directory_mode_processes_supported_files() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    std::fs::create_dir_all(&input_dir).unwrap();
    std::fs::write(input_dir.join("a.txt"), "mail ops@example.com").unwrap();
    std::fs::write(input_dir.join("b.csv"), "host\ndb01.example.com\n").unwrap();
    std::fs::write(input_dir.join("c.docx"), "binary").unwrap();

    let mut orch = orchestrator(EntityRegistry::open_in_memory().unwrap());
    let out_dir = dir.path().join("out");
    let outcome = process_path(&mut orch, &NullOcr, &input_dir, &out_dir).unwrap();

    assert_eq!(outcome, ProcessOutcome { processed: 2, failed: 0 });
    assert!(out_dir.join("anon_a.txt").exists());
    assert!(out_dir.join("anon_b.csv").exists());
    assert!(!out_dir.join("anon_c.txt").exists());
}

#[test]
fn test_registry_persists_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db").join("entities.db");
    let input = dir.path().join("note.txt");
    std::fs::write(&input, "reach me at person@example.com").unwrap();

    let token = {
        let mut orch = orchestrator(EntityRegistry::open(&db_path).unwrap());
        let output = process_file(&mut orch, &NullOcr, &input, dir.path()).unwrap();
        let text = std::fs::read_to_string(output).unwrap();
        let start = text.find('[').unwrap();
        let end = text.find(']').unwrap();
        text[start..=end].to_string()
    };

    // A fresh process (new registry handle) can still resolve the token.
    let registry = EntityRegistry::open(&db_path).unwrap();
    let record = lookup_token(&registry, &token).unwrap();
    assert_eq!(record.original_text, "person@example.com");
    assert_eq!(record.entity_type, "EMAIL_ADDRESS");
}
