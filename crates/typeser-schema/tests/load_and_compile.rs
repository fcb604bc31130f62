//! # Schema Files on Disk
//!
//! Writes schema documents to a temporary directory, loads them by
//! extension, compiles them, and converts data with the result.

use std::fs;

use serde_json::json;
use typeser_core::{Instance, Registry, TypeDesc};
use typeser_schema::{load_value, SchemaDocument, SchemaError};

const SCHEMA_YAML: &str = r#"
root: Inventory
enums:
  Unit: [piece, kg]
records:
  Item:
    fields:
      - { name: sku, type: str }
      - { name: qty, type: int }
      - { name: unit, type: Unit, default: piece }
      - { name: dims, type: "Optional[Tuple[float, float, float]]", default: null }
  Inventory:
    fields:
      - { name: items, type: "Dict[str, Item]" }
      - { name: tags, type: "List[str]", default: [] }
"#;

#[test]
fn yaml_and_json_files_compile_identically() {
    let dir = tempfile::tempdir().unwrap();
    let yaml_path = dir.path().join("inventory.yaml");
    fs::write(&yaml_path, SCHEMA_YAML).unwrap();

    let doc = SchemaDocument::load(&yaml_path).unwrap();
    let json_path = dir.path().join("inventory.json");
    fs::write(&json_path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    assert_eq!(SchemaDocument::load(&json_path).unwrap(), doc);

    let schema = doc.compile(&Registry::new()).unwrap();
    assert_eq!(schema.type_names().collect::<Vec<_>>(), ["Inventory", "Item", "Unit"]);
    assert!(matches!(schema.root(), Some(TypeDesc::Record(_))));
}

#[test]
fn compiled_schema_converts_data() {
    let doc = SchemaDocument::from_yaml_str(SCHEMA_YAML).unwrap();
    let schema = doc.compile(&Registry::new()).unwrap();
    let s = Registry::new().create(schema.require_root().unwrap()).unwrap();

    let raw = json!({"items": {"a1": {"sku": "a1", "qty": 3, "ignored": true}}});
    let instance = s.deserialize(&raw).unwrap();
    assert_eq!(
        s.serialize(&instance).unwrap(),
        json!({
            "items": {"a1": {"sku": "a1", "qty": 3, "unit": "piece", "dims": null}},
            "tags": [],
        })
    );

    let Instance::Record(inventory) = instance else {
        panic!("expected a record");
    };
    assert_eq!(inventory.get("tags"), Some(&Instance::List(vec![])));

    let err = s
        .deserialize(&json!({"items": {"a1": {"sku": "a1", "qty": 1, "dims": [1.0, 2.0]}}}))
        .unwrap_err();
    assert_eq!(
        err.breadcrumb().to_string(),
        "record.Inventory['items']->mapping[value]->record.Item['dims']->union[0]->tuple"
    );
}

#[test]
fn load_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yml");
    fs::write(&path, "records: [unclosed").unwrap();
    match SchemaDocument::load(&path).unwrap_err() {
        SchemaError::Load { path: reported, reason } => {
            assert!(reported.ends_with("broken.yml"));
            assert!(reason.contains("invalid YAML"));
        }
        other => panic!("expected load error, got {other:?}"),
    }

    let missing = dir.path().join("missing.json");
    assert!(matches!(load_value(&missing), Err(SchemaError::Load { .. })));
}
