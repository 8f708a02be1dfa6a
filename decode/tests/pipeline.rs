use std::sync::Arc;

use serde_json::{Value, json};

use nested_form_core::{DocumentVariant, VariantRegistry};
use nested_form_decode::{DecodeError, DecodeOptions, decode_form};

fn decode(fields: Vec<(&str, Value)>) -> Result<Value, DecodeError> {
    let options = DecodeOptions::new();
    decode_form(fields, &options)
}

#[test]
fn test_nested_mixed_structure() {
    let tree = decode(vec![
        ("root[people][0][name]", json!("Al")),
        ("root[people][0][hobbies][0]", json!("chess")),
        ("root[people][1][name]", json!("Bo")),
    ])
    .unwrap();

    assert_eq!(
        tree,
        json!({
            "people": [
                {"name": "Al", "hobbies": ["chess"]},
                {"name": "Bo"},
            ],
        })
    );
}

#[test]
fn test_submission_order_does_not_matter() {
    let fields = vec![
        ("name", json!("John Doe")),
        ("root[address][house_number]", json!("123")),
        ("root[address][street]", json!("Main St")),
        ("root[hobbies][0]", json!("walking")),
        ("root[hobbies][1]", json!("reading")),
        ("root[contacts][0][_type]", json!("Friend")),
        ("root[contacts][0][name]", json!("Alice")),
    ];

    let forward = decode(fields.clone()).unwrap();
    let mut shuffled = fields;
    shuffled.reverse();
    let backward = decode(shuffled).unwrap();

    assert_eq!(forward, backward);
}

#[test]
fn test_list_contiguity_in_any_order() {
    let tree = decode(vec![
        ("root[a][2]", json!("c")),
        ("root[a][0]", json!("a")),
        ("root[a][1]", json!("b")),
    ])
    .unwrap();

    assert_eq!(tree, json!({"a": ["a", "b", "c"]}));
}

#[test]
fn test_round_trip_of_objects_and_scalars() {
    let original = json!({
        "name": "John Doe",
        "address": {
            "house_number": "123",
            "street": "Main St",
            "city": "New York",
        },
        "meta": {"tags": {"primary": "dev"}},
    });

    let options = DecodeOptions::new();
    let decoded = decode_form(flatten(&original), &options).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_ambiguous_structure_is_rejected() {
    let err = decode(vec![
        ("root[a][0]", json!("x")),
        ("root[a][foo]", json!("y")),
    ])
    .unwrap_err();

    assert_eq!(
        err,
        DecodeError::AmbiguousStructure {
            path: "a".to_string()
        }
    );
}

#[test]
fn test_sparse_indexes_are_rejected() {
    let err = decode(vec![("root[a][5]", json!("x"))]).unwrap_err();

    assert_eq!(
        err,
        DecodeError::IndexGap {
            path: "a".to_string(),
            expected: 0,
            found: 5,
        }
    );
}

#[test]
fn test_default_list_growth_through_indexed_path() {
    let tree = decode(vec![
        ("hobbies", json!([])),
        ("root[hobbies][2]", json!("chess")),
    ])
    .unwrap();

    assert_eq!(tree, json!({"hobbies": ["", "", "chess"]}));
}

#[test]
fn test_unindexed_default_list_survives_untouched() {
    let tree = decode(vec![
        ("name", json!("John Doe")),
        ("hobbies", json!(["walking", "reading"])),
    ])
    .unwrap();

    assert_eq!(
        tree,
        json!({"name": "John Doe", "hobbies": ["walking", "reading"]})
    );
}

#[test]
fn test_decoded_tree_resolves_registered_variant() {
    let mut registry = VariantRegistry::new();
    registry
        .register(Arc::new(DocumentVariant::new(
            "Friend",
            json!({
                "title": "Friend",
                "type": "object",
                "properties": {"name": {"type": "string"}, "known_since": {"type": "string"}},
                "required": ["name"],
            }),
        )))
        .unwrap();

    let tree = decode(vec![
        ("root[contacts][0][_type]", json!("Friend")),
        ("root[contacts][0][name]", json!("Ann")),
        ("root[contacts][0][known_since]", json!("2020-01-01")),
    ])
    .unwrap();

    let contact = &tree["contacts"][0];
    let variant = registry.validate_tree(contact).unwrap();
    assert_eq!(variant.tag(), "Friend");
}

#[test]
fn test_decoded_tree_with_unknown_tag_fails_resolution() {
    let registry = VariantRegistry::new();

    let tree = decode(vec![
        ("root[contacts][0][_type]", json!("Ghost")),
        ("root[contacts][0][name]", json!("X")),
    ])
    .unwrap();

    let err = registry.resolve_tree(&tree["contacts"][0]).unwrap_err();
    assert_eq!(
        err,
        nested_form_core::VariantError::UnknownVariant {
            tag: "Ghost".to_string()
        }
    );
}

/// Flattens a tree of objects and scalars into bracket-path fields.
fn flatten(value: &Value) -> Vec<(String, Value)> {
    fn walk(value: &Value, prefix: String, out: &mut Vec<(String, Value)>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    walk(child, format!("{prefix}[{key}]"), out);
                }
            }
            scalar => out.push((prefix, scalar.clone())),
        }
    }

    let mut fields = Vec::new();
    if let Value::Object(map) = value {
        for (key, child) in map {
            match child {
                Value::Object(_) => walk(child, format!("root[{key}]"), &mut fields),
                scalar => fields.push((key.clone(), scalar.clone())),
            }
        }
    }
    fields
}
