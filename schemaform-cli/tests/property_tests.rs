//! Property-based tests for schemaform-cli.
//!
//! Properties tested:
//! - every definition file is discovered, in relative path order
//! - registry order follows file order
//! - CLI overrides win over config values
//! - dry runs never touch the disk

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use schemaform_cli::{
    config::{CliArgs, Config, ConfigManager},
    generator::SchemaGenerator,
    loader::DefinitionLoader,
    scanner::SourceScanner,
    writer::FileWriter,
};

fn definition(id: &str) -> String {
    format!(
        r#"{{ "id": "{}", "schema": {{ "kind": "mapping", "entries": [
            {{ "name": "level", "value": {{ "kind": "type", "name": "integer" }} }}
        ] }} }}"#,
        id
    )
}

/// Write one definition per name; the id equals the file stem.
fn create_project(names: &BTreeSet<String>) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        fs::write(dir.path().join(format!("{}.json", name)), definition(name)).unwrap();
    }
    dir
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_discovery_is_complete_and_ordered(
        names in prop::collection::btree_set("[a-z][a-z0-9_]{0,10}", 1..8)
    ) {
        let dir = create_project(&names);
        let files = SourceScanner::new(dir.path()).scan().unwrap();

        let found: Vec<String> = files
            .iter()
            .map(|f| f.relative_path.to_string_lossy().to_string())
            .collect();
        let expected: Vec<String> = names.iter().map(|n| format!("{}.json", n)).collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_registry_order_follows_files(
        names in prop::collection::btree_set("[a-z][a-z0-9_]{0,10}", 1..8)
    ) {
        let dir = create_project(&names);
        let files = SourceScanner::new(dir.path()).scan().unwrap();
        let registry = DefinitionLoader::load_registry(&files).unwrap();

        let ids: Vec<&str> = registry.ids().collect();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(ids, expected);

        let output = SchemaGenerator::new(Config::default()).generate(&registry).unwrap();
        prop_assert_eq!(output.classes.len(), names.len());
    }

    #[test]
    fn prop_cli_overrides_win(
        dir in "[a-z]{1,8}",
        file in "[a-z]{1,8}\\.json",
        pretty in any::<bool>(),
    ) {
        let args = CliArgs {
            output: Some(PathBuf::from(&dir)),
            output_file: Some(file.clone()),
            pretty: Some(pretty),
            ..Default::default()
        };
        let merged = ConfigManager::merge_cli_args(Config::default(), &args);

        prop_assert_eq!(merged.output_path(), PathBuf::from(dir).join(file));
        prop_assert_eq!(merged.output.pretty, pretty);
        prop_assert_eq!(merged.input.dir, Config::default().input.dir);
    }

    #[test]
    fn prop_dry_run_never_writes(content in "\\PC{0,64}", name in "[a-z]{1,8}") {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join(format!("{}.json", name));

        let result = FileWriter::new(true).write(&path, &content).unwrap();
        prop_assert!(!result.was_written());
        prop_assert!(!path.exists());
        prop_assert!(!dir.path().join("out").exists());
    }
}
