//! Form schema generation.
//!
//! Runs the registry description over the loaded classes, or the plain
//! converter when a single class is requested, and renders the JSON
//! document that gets written to disk.

use schemaform::{ClassRegistry, FormSchema, RegistryDescriptor, SchemaConverter};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{CliResult, GenerateError};
use crate::loader::DefinitionLoader;
use crate::scanner::SourceScanner;

/// Generated output.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Complete JSON document, newline terminated.
    pub content: String,

    /// The generated schema.
    pub schema: FormSchema,

    /// Ids of the classes the document covers, in registry order.
    pub classes: Vec<String>,

    /// Definition files read for this run; empty for in-memory registries.
    pub sources: Vec<PathBuf>,
}

/// Which definitions one run reads and what it emits.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions<'a> {
    /// Glob over paths relative to the input directory.
    pub filter: Option<&'a str>,

    /// Convert only this class, without the registry selector.
    pub class: Option<&'a str>,
}

/// Schema generator driven by the CLI configuration.
pub struct SchemaGenerator {
    config: Config,
    descriptor: RegistryDescriptor,
}

impl SchemaGenerator {
    /// Create a new schema generator with the given configuration.
    pub fn new(config: Config) -> Self {
        let converter = SchemaConverter::with_config(config.converter_config());
        Self {
            config,
            descriptor: RegistryDescriptor::with_converter(converter),
        }
    }

    /// Scan the configured input directory, load it and convert.
    ///
    /// The output document and the loaded configuration file are never read
    /// as definitions, even when they sit under the input directory.
    /// `None` means no definition files were found.
    pub fn build(&self, options: BuildOptions<'_>) -> CliResult<Option<GeneratedOutput>> {
        let mut scanner = SourceScanner::new(&self.config.input.dir)
            .with_extensions(self.config.input.extensions.iter())
            .with_exclude(self.config.excluded_paths());
        if let Some(pattern) = options.filter {
            scanner = scanner.with_filter(pattern)?;
        }

        let files = scanner.scan_allow_empty()?;
        if files.is_empty() {
            return Ok(None);
        }

        let registry = DefinitionLoader::load_registry(&files)?;
        let mut output = match options.class {
            Some(id) => self.generate_class(&registry, id)?,
            None => self.generate(&registry)?,
        };
        output.sources = files.into_iter().map(|file| file.path).collect();
        Ok(Some(output))
    }

    /// Describe every class in `registry`.
    ///
    /// A conversion failure names the class it came from.
    pub fn generate(&self, registry: &ClassRegistry) -> CliResult<GeneratedOutput> {
        let snapshot = registry.snapshot();

        let mut ids = Vec::with_capacity(snapshot.len());
        let mut schemas = Vec::with_capacity(snapshot.len());
        for (id, class) in &snapshot {
            let schema = self
                .descriptor
                .class_schema(id, class.as_ref())
                .map_err(|e| GenerateError::conversion(id.as_str(), e))?;
            schemas.push(schema);
            ids.push(id.clone());
        }

        let schema = RegistryDescriptor::union(ids.clone(), schemas);
        self.output(schema, ids)
    }

    /// Convert a single class without the registry wrapper.
    pub fn generate_class(&self, registry: &ClassRegistry, id: &str) -> CliResult<GeneratedOutput> {
        let class = registry
            .get(id)
            .ok_or_else(|| GenerateError::UnknownClass { id: id.to_string() })?;

        let schema = self
            .descriptor
            .converter()
            .convert(&class.schema())
            .map_err(|e| GenerateError::conversion(id, e))?;
        self.output(schema, vec![id.to_string()])
    }

    fn output(&self, schema: FormSchema, classes: Vec<String>) -> CliResult<GeneratedOutput> {
        let mut content = if self.config.output.pretty {
            schema.try_to_json_pretty()
        } else {
            schema.try_to_json()
        }
        .map_err(GenerateError::Serialize)?;
        content.push('\n');

        Ok(GeneratedOutput {
            content,
            schema,
            classes,
            sources: Vec::new(),
        })
    }
}
