//! The type mapper's output for one property.

use std::fmt;

/// Target scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
    /// Untyped value (`object` in C#).
    Any,
}

/// The semantic type chosen for a schema node. Exactly one shape per node.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetType {
    Scalar(ScalarKind),
    ArrayOf(Box<TypeDescriptor>),
    DictionaryOf(Box<TargetType>),
    ObjectReference(String),
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(ScalarKind::String) => f.write_str("string"),
            Self::Scalar(ScalarKind::Integer) => f.write_str("integer"),
            Self::Scalar(ScalarKind::Number) => f.write_str("number"),
            Self::Scalar(ScalarKind::Boolean) => f.write_str("boolean"),
            Self::Scalar(ScalarKind::Any) => f.write_str("any"),
            Self::ArrayOf(element) => write!(f, "array of {}", element.target_type),
            Self::DictionaryOf(value) => write!(f, "dictionary of {value}"),
            Self::ObjectReference(class_name) => f.write_str(class_name),
        }
    }
}

/// A default literal, already checked against the type it initializes.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Sequence(Vec<DefaultValue>),
}

impl DefaultValue {
    /// Convert a schema `default` literal for `target`, or `None` when the
    /// literal cannot initialize a member of that type.
    ///
    /// Integers must fit a C# `int` (integral floats such as `1.0` count) and
    /// numbers must be finite and fit a C# `float`.
    #[must_use]
    pub fn for_target(value: &serde_json::Value, target: &TargetType) -> Option<Self> {
        match target {
            TargetType::Scalar(ScalarKind::String) => {
                value.as_str().map(|s| Self::String(s.to_string()))
            }
            TargetType::Scalar(ScalarKind::Integer) => integer_literal(value).map(Self::Integer),
            TargetType::Scalar(ScalarKind::Number) => number_literal(value).map(Self::Number),
            TargetType::Scalar(ScalarKind::Boolean) => value.as_bool().map(Self::Boolean),
            TargetType::Scalar(ScalarKind::Any) => match value {
                serde_json::Value::String(s) => Some(Self::String(s.clone())),
                serde_json::Value::Bool(b) => Some(Self::Boolean(*b)),
                serde_json::Value::Number(_) => value
                    .as_i64()
                    .and_then(fit_int)
                    .map(Self::Integer)
                    .or_else(|| number_literal(value).map(Self::Number)),
                _ => None,
            },
            TargetType::ArrayOf(element) => {
                Self::sequence_for(value, &element.target_type).map(Self::Sequence)
            }
            TargetType::DictionaryOf(_) | TargetType::ObjectReference(_) => None,
        }
    }

    /// Convert an array `default` literal element by element, or `None` when it
    /// is not an array or any element does not fit `element`.
    #[must_use]
    pub fn sequence_for(value: &serde_json::Value, element: &TargetType) -> Option<Vec<Self>> {
        value
            .as_array()?
            .iter()
            .map(|item| Self::for_target(item, element))
            .collect()
    }

    /// True when the wire value `value` equals this literal.
    /// Sequences compare element-wise; numbers compare by value.
    #[must_use]
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            Self::String(expected) => value.as_str() == Some(expected.as_str()),
            Self::Integer(expected) => value.as_i64() == Some(*expected),
            Self::Number(expected) => value
                .as_f64()
                .is_some_and(|actual| actual.total_cmp(expected).is_eq()),
            Self::Boolean(expected) => value.as_bool() == Some(*expected),
            Self::Sequence(expected) => value
                .as_array()
                .is_some_and(|actual| sequence_equals(expected, actual)),
        }
    }
}

fn integer_literal(value: &serde_json::Value) -> Option<i64> {
    match value.as_i64() {
        Some(n) => fit_int(n),
        None => integral_float(value.as_f64()?).and_then(fit_int),
    }
}

#[expect(clippy::cast_possible_truncation)]
fn integral_float(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n.abs() <= f64::from(i32::MAX) + 1.0 {
        Some(n as i64)
    } else {
        None
    }
}

fn fit_int(n: i64) -> Option<i64> {
    i32::try_from(n).ok().map(i64::from)
}

fn number_literal(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .filter(|n| n.is_finite() && n.abs() <= f64::from(f32::MAX))
}

fn sequence_equals(expected: &[DefaultValue], actual: &[serde_json::Value]) -> bool {
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(expected, actual)| expected.matches(actual))
}

/// Serialization hints attached to a public member, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializationAttribute {
    /// The member must be present on the wire.
    Required,
    /// The wire key, preserved verbatim from the schema.
    NameOverride(String),
}

/// When a generated should-serialize predicate returns true.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializeCondition {
    /// The backing field is not null.
    NotNull { field: String },
    /// The backing sequence is non-empty and differs element-wise from `default`.
    SequenceDiffers {
        field: String,
        default: Vec<DefaultValue>,
    },
}

impl SerializeCondition {
    /// The backing field the predicate reads.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::NotNull { field } | Self::SequenceDiffers { field, .. } => field,
        }
    }

    /// Evaluate the predicate against a backing value expressed as JSON
    /// (`null` for an unset field).
    #[must_use]
    pub fn evaluate(&self, value: &serde_json::Value) -> bool {
        match self {
            Self::NotNull { .. } => !value.is_null(),
            Self::SequenceDiffers { default, .. } => match value.as_array() {
                Some(items) if !items.is_empty() => !sequence_equals(default, items),
                _ => false,
            },
        }
    }
}

/// Extra class members a property needs besides its field and accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum AuxiliaryMember {
    ShouldSerialize {
        name: String,
        condition: SerializeCondition,
    },
}

impl AuxiliaryMember {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ShouldSerialize { name, .. } => name,
        }
    }
}

/// Everything the class synthesizer needs to know about one property's type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub target_type: TargetType,
    pub default_value: Option<DefaultValue>,
    pub serialization_attributes: Vec<SerializationAttribute>,
    pub auxiliary_members: Vec<AuxiliaryMember>,
}

impl TypeDescriptor {
    /// A bare descriptor with no default, attributes, or auxiliary members.
    #[must_use]
    pub fn of(target_type: TargetType) -> Self {
        Self {
            target_type,
            default_value: None,
            serialization_attributes: Vec::new(),
            auxiliary_members: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.serialization_attributes
            .contains(&SerializationAttribute::Required)
    }

    /// The wire key from the `NameOverride` attribute, if finalized.
    #[must_use]
    pub fn wire_name(&self) -> Option<&str> {
        self.serialization_attributes
            .iter()
            .find_map(|attribute| match attribute {
                SerializationAttribute::NameOverride(name) => Some(name.as_str()),
                SerializationAttribute::Required => None,
            })
    }
}
