//! Snapshot tests for generated form schemas.
//!
//! These tests use insta to capture the exact JSON handed to the form
//! renderer. Run `cargo insta review` to review and accept snapshot changes.

use schemaform::{describe, ClassRegistry, Number, SchemaKey, ValidationNode};

fn rainbow() -> ValidationNode {
    ValidationNode::mapping([
        (
            SchemaKey::optional("speed").with_default(1.0),
            ValidationNode::all([
                ValidationNode::coerce(ValidationNode::number()),
                ValidationNode::range(Number::from_f64(0.1), Some(Number::from(10))),
            ]),
        ),
        (
            SchemaKey::required("direction"),
            ValidationNode::one_of(["left", "right"]),
        ),
    ])
}

fn solid() -> ValidationNode {
    ValidationNode::mapping([(
        SchemaKey::required("color").with_description("Fill color"),
        ValidationNode::string(),
    )])
}

#[test]
fn snapshot_registry_description() {
    let mut registry = ClassRegistry::new();
    registry.register("rainbow", rainbow);
    registry.register("solid", solid);

    let schema = describe(&registry).unwrap();
    insta::assert_snapshot!("registry_description", schema.to_json_pretty());
}
