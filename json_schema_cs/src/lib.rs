//! Generate C# data-model classes from a directory of JSON Schema documents.
//!
//! A run has three phases, each finished before the next starts:
//!
//! 1. **Load**: [`SchemaRepository::load`] parses the root schema and every
//!    sibling `*.schema.json`.
//! 2. **Map + synthesize**: [`synthesize_all`] builds one [`GeneratedClass`] per
//!    object-typed document, mapping each property with [`map_property`].
//! 3. **Emit**: [`write_classes`] renders each class to `<ClassName>.cs`.
//!
//! Any error aborts the run. Nothing is written unless every class was synthesized.

mod descriptor;
mod emit;
mod error;
mod json_pointer;
pub mod naming;
mod repository;
mod schema;
mod settings;
mod synthesizer;
mod type_mapper;

pub use descriptor::{
    AuxiliaryMember, DefaultValue, ScalarKind, SerializationAttribute, SerializeCondition,
    TargetType, TypeDescriptor,
};
pub use emit::{SOURCE_EXTENSION, emit_class, render_type, source_file_name, write_classes};
pub use error::{SchemaGenError, UnsupportedConstruct, UnsupportedConstructError};
pub use json_pointer::JsonPointer;
pub use repository::{SCHEMA_FILE_PATTERN, SchemaRepository};
pub use schema::{AdditionalProperties, PrimitiveType, SchemaNode, SchemaShape, TypeKeyword};
pub use settings::{DEFAULT_NAMESPACE, GenerateSettings};
pub use synthesizer::{
    GeneratedClass, GeneratedProperty, SynthesisContext, synthesize, synthesize_all,
};
pub use type_mapper::map_property;

use std::io::Write;
use std::path::{Path, PathBuf};

/// Run all three phases: load the schema set rooted at `root_schema`, synthesize
/// every object-typed document, and write one `.cs` file per class to `output_dir`.
///
/// Returns the paths written, in class order.
///
/// # Errors
///
/// Returns `SchemaGenError` from whichever phase failed first.
pub fn generate(
    root_schema: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    settings: &GenerateSettings,
) -> Result<Vec<PathBuf>, SchemaGenError> {
    let repository: SchemaRepository = SchemaRepository::load(root_schema)?;
    let classes: Vec<GeneratedClass> = synthesize_all(&repository, settings)?;
    let written: Vec<PathBuf> = write_classes(&classes, output_dir.as_ref())?;
    tracing::info!(
        files = written.len(),
        output = %output_dir.as_ref().display(),
        "wrote generated classes"
    );
    Ok(written)
}

/// Generate the C# class for a single schema document and write it to `writer`.
///
/// `file_name` names the document in errors and in the generated header, and
/// names the class when the schema has no `title`. The writer can be any type
/// implementing `Write`, such as `File` or `Vec<u8>`.
///
/// # Errors
///
/// Returns `SchemaGenError` if the schema JSON is invalid, the root is not an
/// object, a property cannot be mapped, or writing to the writer fails.
pub fn generate_to_writer<W: Write>(
    file_name: &str,
    schema_json: &str,
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<(), SchemaGenError> {
    let document: SchemaNode = repository::parse_schema_str(schema_json, Path::new(file_name))?;
    if !document.is_object_typed() {
        return Err(SchemaGenError::RootNotObject {
            document: file_name.to_string(),
        });
    }
    let class: GeneratedClass = synthesize(file_name, &document, settings)?;
    emit_class(&class, writer)?;
    Ok(())
}
