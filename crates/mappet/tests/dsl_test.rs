//! Integration tests: declarative schemas loaded from tests/data

use mappet::dsl::{Condition, ModifierDefinition};
use mappet::{Error, MapperOptions, MappingDsl, Registry, Schema, create_mapper};
use serde_json::json;
use std::path::PathBuf;

fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn orders_registry() -> Registry {
    let line: Schema = [("sku", "ItemNumber"), ("qty", "Quantity")]
        .into_iter()
        .collect();
    let line_mapper = create_mapper(line, MapperOptions::new().with_name("line")).unwrap();

    let mut registry = Registry::with_builtins();
    registry.register_mapper("line", &line_mapper);
    registry
}

#[test]
fn test_orders_definition_parses() {
    let definition = MappingDsl::parse_file(&data_file("orders.yaml")).unwrap();

    assert_eq!(definition.name.as_deref(), Some("orders"));
    assert!(definition.strict_mode);
    assert!(!definition.greedy_mode);
    assert_eq!(definition.entries.len(), 7);

    match definition.entries[5].modifier.as_ref().unwrap() {
        ModifierDefinition::Each { modifier } => {
            assert!(matches!(
                modifier.as_ref(),
                ModifierDefinition::Named { name } if name == "line"
            ));
        }
        _ => panic!("Expected Each modifier"),
    }
    assert!(matches!(
        definition.entries[6].include.as_ref().unwrap(),
        Condition::Source { .. }
    ));
}

#[test]
fn test_orders_definition_maps_gift_order() -> anyhow::Result<()> {
    let mapper = MappingDsl::parse_file(&data_file("orders.yaml"))?.compile(&orders_registry())?;

    let source = json!({
        "header": {"number": "1001", "ref": "ORD1001", "date": "20240115"},
        "party": {"name": "  acme gmbh ", "country": null},
        "items": [
            {"ItemNumber": "ABC123", "Quantity": 10},
            {"ItemNumber": "DEF456", "Quantity": 5}
        ],
        "isGift": true,
        "giftMessage": "Enjoy"
    });

    let result = mapper.map(&source)?;
    assert_eq!(
        result,
        json!({
            "order": {"number": "1001", "reference": "ORD1001", "date": "2024-01-15"},
            "customer": {"name": "ACME GMBH", "country": "N/A"},
            "lines": [
                {"sku": "ABC123", "qty": 10},
                {"sku": "DEF456", "qty": 5}
            ],
            "gift": {"message": "Enjoy"}
        })
    );
    Ok(())
}

#[test]
fn test_orders_definition_skips_filtered_entries() -> anyhow::Result<()> {
    let mapper = MappingDsl::parse_file(&data_file("orders.yaml"))?.compile(&orders_registry())?;

    let source = json!({
        "header": {"number": "1002", "ref": "INV-7", "date": "20240201"},
        "party": {"name": "Shop", "country": "PL"},
        "items": [],
        "isGift": false
    });

    let result = mapper.map(&source)?;
    assert_eq!(result["order"], json!({"number": "1002", "date": "2024-02-01"}));
    assert_eq!(result["lines"], json!([]));
    assert!(result.get("gift").is_none());
    Ok(())
}

#[test]
fn test_orders_definition_strict_failure() -> anyhow::Result<()> {
    let mapper = MappingDsl::parse_file(&data_file("orders.yaml"))?.compile(&orders_registry())?;

    let err = mapper
        .map(&json!({"header": {"number": "1"}, "isGift": false}))
        .unwrap_err();
    assert!(matches!(err, Error::MissingField { .. }));
    assert_eq!(err.to_string(), "orders: header.date not found");
    Ok(())
}

#[test]
fn test_orders_definition_needs_registered_line_mapper() {
    let definition = MappingDsl::parse_file(&data_file("orders.yaml")).unwrap();
    let err = definition.compile(&Registry::with_builtins()).unwrap_err();
    assert!(matches!(err, Error::MalformedSchemaEntry { index: 5, .. }));
}

#[test]
fn test_passthrough_json_definition() -> anyhow::Result<()> {
    let definition = MappingDsl::parse_file(&data_file("passthrough.json"))?;
    assert!(definition.greedy_mode);
    let mapper = definition.compile(&Registry::with_builtins())?;

    let active = mapper.map(&json!({"id": 9, "email": "A@B.IO", "status": "active"}))?;
    assert_eq!(
        active,
        json!({"id": 9, "email": "a@b.io", "status": "migrated"})
    );

    let archived = mapper.map(&json!({"id": 10, "email": "C@D.IO", "status": "archived"}))?;
    assert_eq!(
        archived,
        json!({"id": 10, "email": "c@d.io", "status": "archived"})
    );
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let err = MappingDsl::parse_file(&data_file("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
