//! Integration test: reading and writing through parsed paths

use mappet_path::{Error, Path, Segment, get, set};
use serde_json::{Value, json};

#[test]
fn test_copy_between_trees() -> anyhow::Result<()> {
    let source = json!({
        "order": {
            "lines": [
                {"sku": "ABC123", "qty": 10},
                {"sku": "DEF456", "qty": 5}
            ]
        }
    });

    let mut target = json!({});
    for (from, to) in [
        ("order.lines[0].sku", "skus[0]"),
        ("order.lines[1].sku", "skus[1]"),
        ("order.lines[1].qty", "totals.last"),
    ] {
        let value = get(&source, &Path::parse(from)?).cloned().unwrap_or(Value::Null);
        set(&mut target, &Path::parse(to)?, value);
    }

    assert_eq!(
        target,
        json!({"skus": ["ABC123", "DEF456"], "totals": {"last": 5}})
    );
    Ok(())
}

#[test]
fn test_root_array_source() -> anyhow::Result<()> {
    let source = json!([{"a": {"b": {"c": "value"}, "b.c": "_"}}]);
    assert_eq!(get(&source, &Path::parse("0.a.b.c")?), Some(&json!("value")));
    assert_eq!(
        get(&source, &Path::from_segments(["0", "a", "b.c"])),
        Some(&json!("_"))
    );
    Ok(())
}

#[test]
fn test_set_through_segment_path() {
    let mut target = Value::Null;
    let path = Path::from_segments([Segment::from("rows"), Segment::Index(2), Segment::from("id")]);
    set(&mut target, &path, json!(7));
    assert_eq!(target, json!({"rows": [null, null, {"id": 7}]}));
}

#[test]
fn test_parse_error_message() {
    let err = Path::parse("items[").unwrap_err();
    assert!(matches!(err, Error::InvalidPath { .. }));
    assert!(err.to_string().starts_with("Invalid path 'items['"));
}
