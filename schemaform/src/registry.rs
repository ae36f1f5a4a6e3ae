//! Class registry and the discriminated-union descriptor built from it.
//!
//! A [`ClassRegistry`] maps string identifiers to pluggable classes, each of
//! which exposes its own validation tree. [`RegistryDescriptor`] turns the
//! registry into one form schema: a `registry_type` selector whose value
//! picks the class schema that must also match.
//!
//! ```rust
//! use schemaform::{ClassRegistry, RegistryDescriptor, SchemaKey, ValidationNode};
//!
//! let mut registry = ClassRegistry::new();
//! registry.register("rainbow", || {
//!     ValidationNode::mapping([(SchemaKey::optional("speed"), ValidationNode::number())])
//! });
//!
//! let schema = RegistryDescriptor::new().describe(&registry).unwrap();
//! let selector = schema.property("registry_type").unwrap();
//! assert_eq!(selector.title.as_deref(), Some("Registry Type"));
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::convert::SchemaConverter;
use crate::error::ConversionError;
use crate::node::ValidationNode;
use crate::schema::{Dependency, FormSchema, OrderedMap};
use crate::title::titleize;
use crate::traits::ValidationSchema;

/// Property that carries the class identifier.
pub const REGISTRY_TYPE_KEY: &str = "registry_type";

/// A registered class: anything that can produce a validation tree.
pub trait SchemaClass: Send + Sync {
    fn schema(&self) -> ValidationNode;
}

impl<F> SchemaClass for F
where
    F: Fn() -> ValidationNode + Send + Sync,
{
    fn schema(&self) -> ValidationNode {
        self()
    }
}

/// A fixed tree loaded from a definition file.
impl SchemaClass for ValidationNode {
    fn schema(&self) -> ValidationNode {
        self.clone()
    }
}

/// Registry class backed by a [`ValidationSchema`] type.
pub struct TypedClass<T>(PhantomData<fn() -> T>);

impl<T> TypedClass<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TypedClass<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ValidationSchema> SchemaClass for TypedClass<T> {
    fn schema(&self) -> ValidationNode {
        T::validation_schema()
    }
}

/// Insertion-ordered collection of classes keyed by identifier.
///
/// Registration order is the order in which classes appear in the
/// `registry_type` enum and in `oneOf`.
#[derive(Clone, Default)]
pub struct ClassRegistry {
    classes: Vec<(String, Arc<dyn SchemaClass>)>,
}

impl ClassRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. An existing id keeps its position and gets the new
    /// class; the old one is returned.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        class: impl SchemaClass + 'static,
    ) -> Option<Arc<dyn SchemaClass>> {
        self.register_arc(id, Arc::new(class))
    }

    /// Register a type implementing [`ValidationSchema`].
    pub fn register_type<T: ValidationSchema + 'static>(
        &mut self,
        id: impl Into<String>,
    ) -> Option<Arc<dyn SchemaClass>> {
        self.register(id, TypedClass::<T>::new())
    }

    /// Register an already shared class.
    pub fn register_arc(
        &mut self,
        id: impl Into<String>,
        class: Arc<dyn SchemaClass>,
    ) -> Option<Arc<dyn SchemaClass>> {
        let id = id.into();
        match self.classes.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => Some(std::mem::replace(slot, class)),
            None => {
                self.classes.push((id, class));
                None
            }
        }
    }

    /// Get a class by id.
    pub fn get(&self, id: &str) -> Option<&Arc<dyn SchemaClass>> {
        self.classes
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, class)| class)
    }

    /// Remove a class, returning it if it was registered.
    pub fn remove(&mut self, id: &str) -> Option<Arc<dyn SchemaClass>> {
        let index = self.classes.iter().position(|(existing, _)| existing == id)?;
        Some(self.classes.remove(index).1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|(id, _)| id.as_str())
    }

    /// Registered classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = (&str, &Arc<dyn SchemaClass>)> {
        self.classes.iter().map(|(id, class)| (id.as_str(), class))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Copy of the current registrations. Later changes to the registry do
    /// not affect the snapshot.
    pub fn snapshot(&self) -> Vec<(String, Arc<dyn SchemaClass>)> {
        self.classes.clone()
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("ids", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}

/// Builds the discriminated union over every class in a registry.
///
/// The result has the shape
///
/// ```json
/// {
///   "type": "object",
///   "properties": { "registry_type": { "type": "string", "title": "Registry Type", "enum": ["a", "b"] } },
///   "required": ["registry_type"],
///   "dependencies": { "registry_type": { "oneOf": [ <class a>, <class b> ] } }
/// }
/// ```
///
/// where each class schema pins `properties.registry_type.enum` to its own id.
#[derive(Debug, Clone, Default)]
pub struct RegistryDescriptor {
    converter: SchemaConverter,
}

impl RegistryDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom converter for the class schemas.
    pub fn with_converter(converter: SchemaConverter) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &SchemaConverter {
        &self.converter
    }

    /// Describe every class in `registry`.
    ///
    /// The registry is read once at call time. An empty registry yields an
    /// empty `enum` and an empty `oneOf`.
    #[tracing::instrument(skip_all, fields(classes = registry.len()))]
    pub fn describe(&self, registry: &ClassRegistry) -> Result<FormSchema, ConversionError> {
        let snapshot = registry.snapshot();

        let mut ids = Vec::with_capacity(snapshot.len());
        let mut schemas = Vec::with_capacity(snapshot.len());
        for (id, class) in &snapshot {
            schemas.push(self.class_schema(id, class.as_ref())?);
            ids.push(id.clone());
        }

        Ok(Self::union(ids, schemas))
    }

    /// Convert one class and pin its `registry_type` to `id`.
    pub fn class_schema(
        &self,
        id: &str,
        class: &dyn SchemaClass,
    ) -> Result<FormSchema, ConversionError> {
        let mut schema = self.converter.convert(&class.schema())?;
        tracing::debug!(class = %id, "converted class schema");

        schema
            .properties
            .get_or_insert_with(OrderedMap::new)
            .insert(REGISTRY_TYPE_KEY, FormSchema::new().with_enum([id]));
        Ok(schema)
    }

    /// Assemble the top-level selector from class ids and their schemas,
    /// both in registry order.
    pub fn union(ids: Vec<String>, schemas: Vec<FormSchema>) -> FormSchema {
        let selector = FormSchema::of_type("string")
            .with_title(titleize(REGISTRY_TYPE_KEY))
            .with_enum(ids.into_iter().map(Value::from));

        FormSchema::of_type("object")
            .with_property(REGISTRY_TYPE_KEY, selector)
            .with_required(REGISTRY_TYPE_KEY)
            .with_dependency(REGISTRY_TYPE_KEY, Dependency::one_of(schemas))
    }
}

/// Describe `registry` with the default converter.
pub fn describe(registry: &ClassRegistry) -> Result<FormSchema, ConversionError> {
    RegistryDescriptor::new().describe(registry)
}
