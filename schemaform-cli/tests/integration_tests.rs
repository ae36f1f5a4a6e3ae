//! Integration tests for schemaform-cli.
//!
//! These tests run the scan, load, generate and write stages together
//! against fixture definitions and temporary projects.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use schemaform_cli::{
    config::{CliArgs, Config, ConfigManager, OutputOverrides},
    error::{CliError, GenerateError, LoadError},
    generator::{BuildOptions, SchemaGenerator},
    loader::DefinitionLoader,
    scanner::SourceScanner,
    writer::{FileWriter, OutputStatus},
};
use serde_json::{json, Value};

/// Get the path to test fixtures.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Create a temporary directory with test files.
fn create_temp_project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

/// Load `schemaform.toml` from `root` and point the default `.` and
/// `./generated` layout at `root`, as a run from inside it would see it.
fn load_project_config(root: &Path, overrides: &OutputOverrides) -> Config {
    let config = ConfigManager::load(Some(&root.join("schemaform.toml"))).unwrap();
    ConfigManager::merge_cli_args(
        config,
        &overrides.apply(CliArgs {
            input: Some(root.to_path_buf()),
            output: Some(root.join("generated")),
            ..Default::default()
        }),
    )
}

/// Scan, load and describe `root` with `config`.
fn generate(root: &Path, config: Config) -> Result<String, CliError> {
    let files = SourceScanner::new(root).scan()?;
    let registry = DefinitionLoader::load_registry(&files)?;
    Ok(SchemaGenerator::new(config).generate(&registry)?.content)
}

const SOLID: &str = r#"{
    "id": "solid",
    "schema": {
        "kind": "mapping",
        "entries": [
            { "name": "color", "required": true, "value": { "kind": "type", "name": "string" } }
        ]
    }
}"#;

// =============================================================================
// Scanner and Loader
// =============================================================================

#[test]
fn test_fixture_registry_order() {
    let files = SourceScanner::new(fixtures_path()).scan().unwrap();
    let registry = DefinitionLoader::load_registry(&files).unwrap();

    assert_eq!(
        registry.ids().collect::<Vec<_>>(),
        vec!["sunset", "rainbow", "solid"]
    );
}

#[test]
fn test_filter_limits_classes() {
    let files = SourceScanner::new(fixtures_path())
        .with_filter("effects/gradients/*")
        .unwrap()
        .scan()
        .unwrap();
    let registry = DefinitionLoader::load_registry(&files).unwrap();

    assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["sunset"]);
}

#[test]
fn test_duplicate_ids_across_files() {
    let dir = create_temp_project(&[("a/solid.json", SOLID), ("b/solid.json", SOLID)]);

    assert!(matches!(
        generate(dir.path(), Config::default()),
        Err(CliError::Load(LoadError::DuplicateId { .. }))
    ));
}

// =============================================================================
// Generation
// =============================================================================

#[test]
fn test_fixture_description() {
    let content = generate(&fixtures_path(), Config::default()).unwrap();
    let document: Value = serde_json::from_str(&content).unwrap();

    assert_eq!(document["type"], json!("object"));
    assert_eq!(document["required"], json!(["registry_type"]));
    assert_eq!(
        document["properties"]["registry_type"],
        json!({
            "type": "string",
            "title": "Registry Type",
            "enum": ["sunset", "rainbow", "solid"]
        })
    );

    let classes = document["dependencies"]["registry_type"]["oneOf"]
        .as_array()
        .unwrap();
    assert_eq!(classes.len(), 3);

    assert_eq!(
        classes[0],
        json!({
            "properties": {
                "gradient_name": {
                    "type": "string",
                    "title": "Gradient Name",
                    "default": "sunset",
                    "lengthMin": 1,
                    "lengthMax": 32
                },
                "start_time": {
                    "type": "datetime",
                    "title": "Start Time",
                    "format": "%H:%M"
                },
                "registry_type": { "enum": ["sunset"] }
            }
        })
    );

    assert_eq!(
        classes[1],
        json!({
            "properties": {
                "speed": {
                    "type": "number",
                    "title": "Speed",
                    "description": "Cycle speed",
                    "default": 1.0,
                    "valueMin": 0.1,
                    "valueMax": 10
                },
                "direction": {
                    "type": "select",
                    "title": "Direction",
                    "options": ["left", "right"]
                },
                "registry_type": { "enum": ["rainbow"] }
            },
            "required": ["direction"]
        })
    );

    assert_eq!(
        classes[2]["properties"]["brightness"],
        json!({ "title": "Brightness", "default": 1.0, "valueMin": 0, "valueMax": 1 })
    );
}

#[test]
fn test_generation_is_deterministic() {
    let first = generate(&fixtures_path(), Config::default()).unwrap();
    let second = generate(&fixtures_path(), Config::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_single_class_output() {
    let files = SourceScanner::new(fixtures_path()).scan().unwrap();
    let registry = DefinitionLoader::load_registry(&files).unwrap();
    let output = SchemaGenerator::new(Config::default())
        .generate_class(&registry, "solid")
        .unwrap();

    let document: Value = serde_json::from_str(&output.content).unwrap();
    assert_eq!(document["required"], json!(["color"]));
    assert!(document["properties"].get("registry_type").is_none());
}

#[test]
fn test_unsupported_validator_names_class() {
    let pattern = r#"
id = "pattern"

[schema]
kind = "mapping"

[[schema.entries]]
name = "glob"
value = { kind = "opaque", name = "Match" }
"#;
    let dir = create_temp_project(&[("solid.json", SOLID), ("pattern.toml", pattern)]);

    match generate(dir.path(), Config::default()) {
        Err(CliError::Generate(GenerateError::Conversion { class, .. })) => {
            assert_eq!(class, "pattern")
        }
        other => panic!("expected a conversion error, got {:?}", other),
    }
}

// =============================================================================
// Configuration and Output
// =============================================================================

#[test]
fn test_config_file_drives_output() {
    let dir = create_temp_project(&[
        ("defs/solid.json", SOLID),
        (
            "schemaform.toml",
            "[output]\ndir = \"out\"\nfile = \"effects.json\"\npretty = false\n",
        ),
    ]);

    let config = ConfigManager::load(Some(&dir.path().join("schemaform.toml"))).unwrap();
    let config = ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            input: Some(dir.path().join("defs")),
            output: Some(dir.path().join("out")),
            ..Default::default()
        },
    );

    let content = generate(&config.input.dir, config.clone()).unwrap();
    assert_eq!(content.lines().count(), 1);

    let path = config.output_path();
    assert!(FileWriter::new(false)
        .write(&path, &content)
        .unwrap()
        .was_written());
    assert_eq!(path, dir.path().join("out/effects.json"));
    assert_eq!(fs::read_to_string(path).unwrap(), content);
}

#[test]
fn test_dry_run_leaves_disk_untouched() {
    let dir = create_temp_project(&[("solid.json", SOLID)]);
    let content = generate(dir.path(), Config::default()).unwrap();
    let path = dir.path().join("generated/schema.json");

    FileWriter::new(true).write(&path, &content).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_validate_detects_stale_output() {
    let dir = create_temp_project(&[("defs/solid.json", SOLID)]);
    let defs = dir.path().join("defs");
    let path = dir.path().join("schema.json");

    let content = generate(&defs, Config::default()).unwrap();
    FileWriter::new(false).write(&path, &content).unwrap();

    let regenerated = generate(&defs, Config::default()).unwrap();
    assert_eq!(FileWriter::status(&path, &regenerated), OutputStatus::UpToDate);

    fs::write(
        defs.join("rainbow.json"),
        r#"{ "id": "rainbow", "schema": { "kind": "mapping", "entries": [] } }"#,
    )
    .unwrap();
    let regenerated = generate(&defs, Config::default()).unwrap();
    assert_eq!(FileWriter::status(&path, &regenerated), OutputStatus::Stale);
}

#[test]
fn test_regenerate_in_default_layout() {
    let dir = create_temp_project(&[
        ("solid.json", SOLID),
        ("schemaform.toml", ConfigManager::default_config_content()),
    ]);
    let config = load_project_config(dir.path(), &OutputOverrides::default());
    let generator = SchemaGenerator::new(config.clone());
    let path = config.output_path();

    let first = generator.build(BuildOptions::default()).unwrap().unwrap();
    assert_eq!(first.classes, vec!["solid"]);
    assert_eq!(first.sources, vec![dir.path().join("solid.json")]);
    assert!(FileWriter::new(false)
        .write(&path, &first.content)
        .unwrap()
        .was_written());

    // generated/schema.json now sits under the input directory
    let second = generator.build(BuildOptions::default()).unwrap().unwrap();
    assert_eq!(second.sources, first.sources);
    assert_eq!(second.content, first.content);
    assert!(!FileWriter::new(false)
        .write(&path, &second.content)
        .unwrap()
        .was_written());
}

#[test]
fn test_validate_with_generate_overrides() {
    let dir = create_temp_project(&[
        ("solid.json", SOLID),
        ("schemaform.toml", ConfigManager::default_config_content()),
    ]);
    let compact = OutputOverrides {
        compact: true,
        ..Default::default()
    };

    let config = load_project_config(dir.path(), &compact);
    let path = config.output_path();
    let output = SchemaGenerator::new(config)
        .build(BuildOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(output.content.lines().count(), 1);
    FileWriter::new(false).write(&path, &output.content).unwrap();

    let expected = SchemaGenerator::new(load_project_config(dir.path(), &compact))
        .build(BuildOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(FileWriter::status(&path, &expected.content), OutputStatus::UpToDate);

    let pretty = SchemaGenerator::new(load_project_config(dir.path(), &OutputOverrides::default()))
        .build(BuildOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(FileWriter::status(&path, &pretty.content), OutputStatus::Stale);
}
