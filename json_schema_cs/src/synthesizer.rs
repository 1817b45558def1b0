//! Assembles one [`GeneratedClass`] per object-typed schema document.

use crate::descriptor::TypeDescriptor;
use crate::error::{SchemaGenError, UnsupportedConstruct, UnsupportedConstructError};
use crate::json_pointer::JsonPointer;
use crate::naming;
use crate::repository::SchemaRepository;
use crate::schema::SchemaNode;
use crate::settings::GenerateSettings;
use crate::type_mapper;
use std::collections::{BTreeMap, HashSet};

/// One public property with its backing field.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProperty {
    /// Public member name (`PascalCase`).
    pub name: String,
    pub backing_field_name: String,
    /// The schema key the member serializes under.
    pub json_key: String,
    pub descriptor: TypeDescriptor,
    /// Documentation from the schema `description`.
    pub doc_comment: Option<String>,
}

impl GeneratedProperty {
    /// Names this property adds to its class: the accessor, the backing field and
    /// any auxiliary members.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        [self.name.as_str(), self.backing_field_name.as_str()]
            .into_iter()
            .chain(
                self.descriptor
                    .auxiliary_members
                    .iter()
                    .map(crate::descriptor::AuxiliaryMember::name),
            )
    }
}

/// One output type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedClass {
    pub name: String,
    pub namespace: String,
    pub description: Option<String>,
    /// File name of the schema document the class was built from.
    pub source_file: String,
    pub properties: Vec<GeneratedProperty>,
}

impl GeneratedClass {
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&GeneratedProperty> {
        self.properties.iter().find(|property| property.name == name)
    }
}

/// Normalize description: trim and treat empty/whitespace as None.
fn normalize_description(s: Option<&String>) -> Option<String> {
    s.as_ref().and_then(|t| {
        let trimmed: &str = t.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Class name for a document: from `title`, or from the file name when untitled.
#[must_use]
pub fn class_name(file_name: &str, document: &SchemaNode) -> String {
    document
        .trimmed_title()
        .map(naming::to_class_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| naming::class_name_from_file_name(file_name))
}

/// Build the class for one object-typed document.
///
/// Properties are mapped in declaration order; member names are checked for
/// collisions as they are assigned.
///
/// # Errors
///
/// Returns `SchemaGenError::UnsupportedConstruct` when the type mapper rejects a
/// property or an `allOf` member is a `$ref`, and `SchemaGenError::NamingCollision`
/// when two members of the class derive the same name.
pub fn synthesize(
    file_name: &str,
    document: &SchemaNode,
    settings: &GenerateSettings,
) -> Result<GeneratedClass, SchemaGenError> {
    let name: String = class_name(file_name, document);
    let root: JsonPointer = JsonPointer::root();
    let unsupported = |source: UnsupportedConstructError| SchemaGenError::UnsupportedConstruct {
        document: file_name.to_string(),
        source,
    };

    check_composition(document, &root).map_err(unsupported)?;

    // A C# member may not share its enclosing type's name.
    let mut member_names: HashSet<String> = HashSet::from([name.clone()]);
    let mut properties: Vec<GeneratedProperty> = Vec::with_capacity(document.properties.len());
    for (raw_name, schema) in &document.properties {
        let pointer: JsonPointer = root.join("properties", raw_name);
        let required: bool = document.required.iter().any(|r| r == raw_name);
        let descriptor: TypeDescriptor =
            type_mapper::map_property(raw_name, schema, required, &pointer)
                .map_err(unsupported)?;

        let public_name: String = naming::to_public_name(raw_name);
        let property: GeneratedProperty = GeneratedProperty {
            backing_field_name: naming::to_backing_name(&public_name),
            name: public_name,
            json_key: raw_name.clone(),
            descriptor,
            doc_comment: normalize_description(schema.description.as_ref()),
        };
        for member in property.member_names() {
            if !member_names.insert(member.to_string()) {
                return Err(SchemaGenError::NamingCollision {
                    scope: format!("class {name} ({file_name})"),
                    name: member.to_string(),
                });
            }
        }
        properties.push(property);
    }

    tracing::debug!(
        class = %name,
        document = file_name,
        properties = properties.len(),
        "synthesized class"
    );
    Ok(GeneratedClass {
        name,
        namespace: settings.namespace.clone(),
        description: normalize_description(document.description.as_ref()),
        source_file: file_name.to_string(),
        properties,
    })
}

/// Composed types are not synthesized: reject `$ref` members of `allOf` and
/// otherwise ignore it.
fn check_composition(
    document: &SchemaNode,
    pointer: &JsonPointer,
) -> Result<(), UnsupportedConstructError> {
    for (index, member) in document.all_of.iter().enumerate() {
        if let Some(reference) = member.reference.as_deref() {
            return Err(UnsupportedConstructError::new(
                pointer.join("allOf", &index.to_string()).as_str(),
                UnsupportedConstruct::ComposedReference(reference.to_string()),
            ));
        }
    }
    Ok(())
}

/// Collects the classes of one generation run.
///
/// Replaces a process-wide registry: each run owns its context, and the
/// finished set is handed out by value.
#[derive(Debug)]
pub struct SynthesisContext<'a> {
    settings: &'a GenerateSettings,
    classes: Vec<GeneratedClass>,
    /// Class name -> source document, for collision reports.
    sources: BTreeMap<String, String>,
}

impl<'a> SynthesisContext<'a> {
    #[must_use]
    pub fn new(settings: &'a GenerateSettings) -> Self {
        Self {
            settings,
            classes: Vec::new(),
            sources: BTreeMap::new(),
        }
    }

    /// Synthesize one document and record the class.
    ///
    /// # Errors
    ///
    /// Propagates [`synthesize`] errors, and returns `NamingCollision` when an
    /// earlier document already produced a class with the same name.
    pub fn add_document(
        &mut self,
        file_name: &str,
        document: &SchemaNode,
    ) -> Result<&GeneratedClass, SchemaGenError> {
        let class: GeneratedClass = synthesize(file_name, document, self.settings)?;
        if let Some(previous) = self.sources.get(&class.name) {
            return Err(SchemaGenError::NamingCollision {
                scope: format!("generation run ({previous} and {file_name})"),
                name: class.name,
            });
        }
        self.sources.insert(class.name.clone(), file_name.to_string());
        self.classes.push(class);
        Ok(&self.classes[self.classes.len() - 1])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The finished, immutable class set, in synthesis order.
    #[must_use]
    pub fn finish(self) -> Vec<GeneratedClass> {
        self.classes
    }
}

/// Run the Map+Synthesize phase over every object-typed document in the repository.
///
/// # Errors
///
/// Returns the first error from any document; no partial set is returned.
pub fn synthesize_all(
    repository: &SchemaRepository,
    settings: &GenerateSettings,
) -> Result<Vec<GeneratedClass>, SchemaGenError> {
    let mut context: SynthesisContext<'_> = SynthesisContext::new(settings);
    for (file_name, document) in repository.object_documents() {
        context.add_document(file_name, document)?;
    }
    tracing::info!(classes = context.len(), "synthesized classes");
    Ok(context.finish())
}
