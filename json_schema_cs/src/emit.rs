//! Rendering generated classes as C# source and writing them to disk.
//!
//! Pure syntax: every type, name and default has already been decided by the
//! synthesizer.

use crate::descriptor::{
    AuxiliaryMember, DefaultValue, ScalarKind, SerializationAttribute, SerializeCondition,
    TargetType,
};
use crate::error::SchemaGenError;
use crate::synthesizer::{GeneratedClass, GeneratedProperty};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extension of emitted source files.
pub const SOURCE_EXTENSION: &str = "cs";

const HEADER_RULE: &str =
    "//------------------------------------------------------------------------------";
const INDENT: &str = "    ";
const MEMBER_INDENT: &str = "        ";
const BODY_INDENT: &str = "            ";

/// `<ClassName>.cs`
#[must_use]
pub fn source_file_name(class: &GeneratedClass) -> String {
    format!("{}.{SOURCE_EXTENSION}", class.name)
}

/// C# spelling of a target type.
#[must_use]
pub fn render_type(target: &TargetType) -> String {
    match target {
        TargetType::Scalar(kind) => scalar_keyword(*kind).to_string(),
        TargetType::ArrayOf(element) => format!("{}[]", render_type(&element.target_type)),
        TargetType::DictionaryOf(value) => format!(
            "System.Collections.Generic.Dictionary<string, {}>",
            render_type(value)
        ),
        TargetType::ObjectReference(class_name) => class_name.clone(),
    }
}

fn scalar_keyword(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => "string",
        ScalarKind::Integer => "int",
        ScalarKind::Number => "float",
        ScalarKind::Boolean => "bool",
        ScalarKind::Any => "object",
    }
}

/// C# literal for a default value of type `target`.
#[must_use]
pub fn render_default(value: &DefaultValue, target: &TargetType) -> String {
    match value {
        DefaultValue::String(s) => format!("\"{}\"", escape_string(s)),
        DefaultValue::Integer(n) => n.to_string(),
        DefaultValue::Number(n) => format!("{n}F"),
        DefaultValue::Boolean(b) => b.to_string(),
        DefaultValue::Sequence(values) => {
            let element: &TargetType = match target {
                TargetType::ArrayOf(element) => &element.target_type,
                _ => &TargetType::Scalar(ScalarKind::Any),
            };
            render_array_literal(values, element)
        }
    }
}

fn render_array_literal(values: &[DefaultValue], element: &TargetType) -> String {
    let element_type: String = render_type(element);
    if values.is_empty() {
        // Jagged arrays size the outermost rank: `new float[0][]`.
        let rank_start: usize = element_type.find('[').unwrap_or(element_type.len());
        let (base, ranks) = element_type.split_at(rank_start);
        return format!("new {base}[0]{ranks}");
    }
    let items: Vec<String> = values
        .iter()
        .map(|value| render_default(value, element))
        .collect();
    format!("new {element_type}[] {{ {} }}", items.join(", "))
}

/// Escape a string for a C# regular string literal.
fn escape_string(s: &str) -> String {
    let mut escaped: String = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escape text for an XML doc comment.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render_attribute(attribute: &SerializationAttribute) -> String {
    match attribute {
        SerializationAttribute::Required => "[Newtonsoft.Json.JsonRequiredAttribute()]".to_string(),
        SerializationAttribute::NameOverride(key) => format!(
            "[Newtonsoft.Json.JsonPropertyAttribute(\"{}\")]",
            escape_string(key)
        ),
    }
}

fn render_condition(condition: &SerializeCondition, target: &TargetType) -> String {
    match condition {
        SerializeCondition::NotNull { field } => format!("(this.{field} != null)"),
        SerializeCondition::SequenceDiffers { field, default } => {
            let element: &TargetType = match target {
                TargetType::ArrayOf(element) => &element.target_type,
                _ => &TargetType::Scalar(ScalarKind::Any),
            };
            format!(
                "((this.{field} != null) && (this.{field}.Length > 0) && (this.{field}.SequenceEqual({}) == false))",
                render_array_literal(default, element)
            )
        }
    }
}

/// Emit a `<summary>` doc comment; nothing when there is no text.
fn emit_summary<W: Write>(writer: &mut W, text: Option<&str>, indent: &str) -> std::io::Result<()> {
    let Some(text) = text else {
        return Ok(());
    };
    writeln!(writer, "{indent}/// <summary>")?;
    for line in text.lines() {
        writeln!(writer, "{indent}/// {}", escape_xml(line.trim_end()))?;
    }
    writeln!(writer, "{indent}/// </summary>")?;
    Ok(())
}

fn emit_property<W: Write>(property: &GeneratedProperty, writer: &mut W) -> std::io::Result<()> {
    let descriptor = &property.descriptor;
    let type_name: String = render_type(&descriptor.target_type);
    let field: &str = &property.backing_field_name;

    writeln!(writer)?;
    emit_summary(
        writer,
        Some(format!("Backing field for {}.", property.name).as_str()),
        MEMBER_INDENT,
    )?;
    match &descriptor.default_value {
        Some(default) => writeln!(
            writer,
            "{MEMBER_INDENT}private {type_name} {field} = {};",
            render_default(default, &descriptor.target_type)
        )?,
        None => writeln!(writer, "{MEMBER_INDENT}private {type_name} {field};")?,
    }

    writeln!(writer)?;
    emit_summary(writer, property.doc_comment.as_deref(), MEMBER_INDENT)?;
    for attribute in &descriptor.serialization_attributes {
        writeln!(writer, "{MEMBER_INDENT}{}", render_attribute(attribute))?;
    }
    writeln!(writer, "{MEMBER_INDENT}public {type_name} {} {{", property.name)?;
    writeln!(writer, "{BODY_INDENT}get {{")?;
    writeln!(writer, "{BODY_INDENT}{INDENT}return this.{field};")?;
    writeln!(writer, "{BODY_INDENT}}}")?;
    writeln!(writer, "{BODY_INDENT}set {{")?;
    writeln!(writer, "{BODY_INDENT}{INDENT}this.{field} = value;")?;
    writeln!(writer, "{BODY_INDENT}}}")?;
    writeln!(writer, "{MEMBER_INDENT}}}")?;

    for member in &descriptor.auxiliary_members {
        match member {
            AuxiliaryMember::ShouldSerialize { name, condition } => {
                writeln!(writer)?;
                writeln!(writer, "{MEMBER_INDENT}public bool {name}() {{")?;
                writeln!(
                    writer,
                    "{BODY_INDENT}return {};",
                    render_condition(condition, &descriptor.target_type)
                )?;
                writeln!(writer, "{MEMBER_INDENT}}}")?;
            }
        }
    }
    Ok(())
}

/// Render one class as a complete C# compilation unit.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn emit_class<W: Write>(class: &GeneratedClass, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "{HEADER_RULE}")?;
    writeln!(writer, "// <auto-generated>")?;
    writeln!(
        writer,
        "//     Generated by json-schema-cs from {}. Do not edit manually.",
        class.source_file
    )?;
    writeln!(writer, "// </auto-generated>")?;
    writeln!(writer, "{HEADER_RULE}")?;
    writeln!(writer)?;
    writeln!(writer, "namespace {} {{", class.namespace)?;
    writeln!(writer, "{INDENT}using System.Linq;")?;
    writeln!(writer, "{INDENT}using System.Runtime.Serialization;")?;
    writeln!(writer)?;
    writeln!(writer)?;
    emit_summary(writer, class.description.as_deref(), INDENT)?;
    writeln!(writer, "{INDENT}public class {} {{", class.name)?;
    for property in &class.properties {
        emit_property(property, writer)?;
    }
    writeln!(writer, "{INDENT}}}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write every class to `<output_dir>/<ClassName>.cs`, creating the directory.
/// Returns the written paths in class order.
///
/// # Errors
///
/// Returns `SchemaGenError::Io` if the directory or a file cannot be written.
/// Files written before the failure are left in place.
pub fn write_classes(
    classes: &[GeneratedClass],
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, SchemaGenError> {
    let output_dir: &Path = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(classes.len());
    for class in classes {
        let path: PathBuf = output_dir.join(source_file_name(class));
        let mut file: BufWriter<File> = BufWriter::new(File::create(&path)?);
        emit_class(class, &mut file)?;
        file.flush()?;
        tracing::debug!(class = %class.name, path = %path.display(), "wrote class");
        written.push(path);
    }
    Ok(written)
}
