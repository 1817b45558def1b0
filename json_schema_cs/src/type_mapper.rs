//! Schema-to-type mapping: decides the target type, default value,
//! serialization attributes and helper members for one property.

use crate::descriptor::{
    AuxiliaryMember, DefaultValue, ScalarKind, SerializationAttribute, SerializeCondition,
    TargetType, TypeDescriptor,
};
use crate::error::{UnsupportedConstruct, UnsupportedConstructError};
use crate::json_pointer::JsonPointer;
use crate::naming;
use crate::schema::{PrimitiveType, SchemaNode, SchemaShape};

/// Map one declared property to its [`TypeDescriptor`].
///
/// `raw_name` is the schema key, `required_by_parent` tells whether the
/// enclosing object lists it in `required`, and `pointer` locates `schema`
/// inside its document for error reporting.
///
/// # Errors
///
/// Returns `UnsupportedConstructError` for keys that yield no member name,
/// `$ref` schemas, dictionaries with a default or an unsupported value type,
/// `additionalProperties` on a non-object, and default literals that do not
/// fit the mapped type.
pub fn map_property(
    raw_name: &str,
    schema: &SchemaNode,
    required_by_parent: bool,
    pointer: &JsonPointer,
) -> Result<TypeDescriptor, UnsupportedConstructError> {
    let public_name: String = naming::to_public_name(raw_name);
    if !naming::is_member_name(&public_name) {
        return Err(UnsupportedConstructError::new(
            pointer.as_str(),
            UnsupportedConstruct::PropertyName(raw_name.to_string()),
        ));
    }

    let mut descriptor: TypeDescriptor = match schema.shape() {
        SchemaShape::Reference(reference) => {
            return Err(UnsupportedConstructError::new(
                pointer.as_str(),
                UnsupportedConstruct::Reference(reference.to_string()),
            ));
        }
        SchemaShape::MisplacedDictionary => {
            return Err(UnsupportedConstructError::new(
                pointer.child("additionalProperties").as_str(),
                UnsupportedConstruct::DictionaryOnNonObject,
            ));
        }
        SchemaShape::Array { items } => array_rule(&public_name, schema, items, pointer)?,
        SchemaShape::Dictionary { values } => {
            dictionary_rule(&public_name, schema, values, pointer)?
        }
        SchemaShape::Enumeration { fallback } => scalar_rule(schema, fallback, pointer)?,
        SchemaShape::Scalar => scalar_rule(schema, schema, pointer)?,
    };

    if required_by_parent && !descriptor.is_required() {
        descriptor
            .serialization_attributes
            .push(SerializationAttribute::Required);
    }
    descriptor
        .serialization_attributes
        .push(SerializationAttribute::NameOverride(raw_name.to_string()));

    tracing::debug!(
        property = raw_name,
        target_type = %descriptor.target_type,
        required = descriptor.is_required(),
        "mapped property"
    );
    Ok(descriptor)
}

/// Primitive properties and object references. `type_source` is the node the
/// type is read from: the property itself, or the catch-all branch of an
/// enumeration.
fn scalar_rule(
    schema: &SchemaNode,
    type_source: &SchemaNode,
    pointer: &JsonPointer,
) -> Result<TypeDescriptor, UnsupportedConstructError> {
    let target_type: TargetType = scalar_target(type_source);
    let default_value: Option<DefaultValue> =
        explicit_default(schema, &target_type, pointer, |value| {
            DefaultValue::for_target(value, &target_type)
        })?;
    let mut descriptor: TypeDescriptor = TypeDescriptor::of(target_type);
    descriptor.default_value = default_value;
    if !schema.required.is_empty() {
        descriptor
            .serialization_attributes
            .push(SerializationAttribute::Required);
    }
    Ok(descriptor)
}

fn array_rule(
    public_name: &str,
    schema: &SchemaNode,
    items: Option<&SchemaNode>,
    pointer: &JsonPointer,
) -> Result<TypeDescriptor, UnsupportedConstructError> {
    let element: TypeDescriptor = match items {
        Some(items) => map_element(items, &pointer.child("items"))?,
        None => TypeDescriptor::of(TargetType::Scalar(ScalarKind::Any)),
    };
    let target_type: TargetType = TargetType::ArrayOf(Box::new(element.clone()));
    let default: Vec<DefaultValue> = explicit_default(schema, &target_type, pointer, |value| {
        DefaultValue::sequence_for(value, &element.target_type)
    })?
    .unwrap_or_default();

    let mut descriptor: TypeDescriptor = TypeDescriptor::of(target_type);
    descriptor.default_value = Some(DefaultValue::Sequence(default.clone()));
    descriptor
        .auxiliary_members
        .push(AuxiliaryMember::ShouldSerialize {
            name: naming::should_serialize_name(public_name),
            condition: SerializeCondition::SequenceDiffers {
                field: naming::to_backing_name(public_name),
                default,
            },
        });
    Ok(descriptor)
}

fn dictionary_rule(
    public_name: &str,
    schema: &SchemaNode,
    values: &SchemaNode,
    pointer: &JsonPointer,
) -> Result<TypeDescriptor, UnsupportedConstructError> {
    if schema.initial_value().is_some() {
        return Err(UnsupportedConstructError::new(
            pointer.child("default").as_str(),
            UnsupportedConstruct::DictionaryDefault,
        ));
    }
    let value_type: TargetType =
        dictionary_value_target(values, &pointer.child("additionalProperties"))?;

    let mut descriptor: TypeDescriptor =
        TypeDescriptor::of(TargetType::DictionaryOf(Box::new(value_type)));
    descriptor
        .auxiliary_members
        .push(AuxiliaryMember::ShouldSerialize {
            name: naming::should_serialize_name(public_name),
            condition: SerializeCondition::NotNull {
                field: naming::to_backing_name(public_name),
            },
        });
    Ok(descriptor)
}

/// The element type of an array. Only the type is kept: element schemas get no
/// default, attributes or helper members of their own.
fn map_element(
    items: &SchemaNode,
    pointer: &JsonPointer,
) -> Result<TypeDescriptor, UnsupportedConstructError> {
    let target_type: TargetType = match items.shape() {
        SchemaShape::Reference(reference) => {
            return Err(UnsupportedConstructError::new(
                pointer.as_str(),
                UnsupportedConstruct::Reference(reference.to_string()),
            ));
        }
        SchemaShape::MisplacedDictionary => {
            return Err(UnsupportedConstructError::new(
                pointer.child("additionalProperties").as_str(),
                UnsupportedConstruct::DictionaryOnNonObject,
            ));
        }
        SchemaShape::Array { items: Some(inner) } => {
            TargetType::ArrayOf(Box::new(map_element(inner, &pointer.child("items"))?))
        }
        SchemaShape::Array { items: None } => TargetType::ArrayOf(Box::new(TypeDescriptor::of(
            TargetType::Scalar(ScalarKind::Any),
        ))),
        SchemaShape::Dictionary { values } => TargetType::DictionaryOf(Box::new(
            dictionary_value_target(values, &pointer.child("additionalProperties"))?,
        )),
        SchemaShape::Enumeration { fallback } => scalar_target(fallback),
        SchemaShape::Scalar => scalar_target(items),
    };
    Ok(TypeDescriptor::of(target_type))
}

fn scalar_target(schema: &SchemaNode) -> TargetType {
    match schema.declared_types() {
        [PrimitiveType::String] => TargetType::Scalar(ScalarKind::String),
        [PrimitiveType::Integer] => TargetType::Scalar(ScalarKind::Integer),
        [PrimitiveType::Number] => TargetType::Scalar(ScalarKind::Number),
        [PrimitiveType::Boolean] => TargetType::Scalar(ScalarKind::Boolean),
        [PrimitiveType::Object] => object_target(schema),
        _ => TargetType::Scalar(ScalarKind::Any),
    }
}

fn object_target(schema: &SchemaNode) -> TargetType {
    match schema.trimmed_title() {
        Some(title) => TargetType::ObjectReference(naming::to_class_name(title)),
        None => TargetType::Scalar(ScalarKind::Any),
    }
}

/// Value type of a dictionary from its `additionalProperties` schema.
/// Several declared types degrade to an untyped value.
fn dictionary_value_target(
    values: &SchemaNode,
    pointer: &JsonPointer,
) -> Result<TargetType, UnsupportedConstructError> {
    if let Some(reference) = values.reference.as_deref() {
        return Err(UnsupportedConstructError::new(
            pointer.as_str(),
            UnsupportedConstruct::Reference(reference.to_string()),
        ));
    }
    match values.declared_types() {
        [PrimitiveType::Object] => Ok(object_target(values)),
        [PrimitiveType::String] => Ok(TargetType::Scalar(ScalarKind::String)),
        [PrimitiveType::Integer] => Ok(TargetType::Scalar(ScalarKind::Integer)),
        [other] => Err(UnsupportedConstructError::new(
            pointer.child("type").as_str(),
            UnsupportedConstruct::DictionaryValueType(other.to_string()),
        )),
        _ => Ok(TargetType::Scalar(ScalarKind::Any)),
    }
}

/// The schema's non-null `default`, converted with `convert`. `target` names
/// the expected type when the literal does not convert.
fn explicit_default<T>(
    schema: &SchemaNode,
    target: &TargetType,
    pointer: &JsonPointer,
    convert: impl FnOnce(&serde_json::Value) -> Option<T>,
) -> Result<Option<T>, UnsupportedConstructError> {
    let Some(value) = schema.initial_value() else {
        return Ok(None);
    };
    convert(value).map(Some).ok_or_else(|| {
        UnsupportedConstructError::new(
            pointer.child("default").as_str(),
            UnsupportedConstruct::DefaultValue {
                expected: target.to_string(),
                found: value.to_string(),
            },
        )
    })
}
