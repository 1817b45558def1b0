use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

/// Wraps the JSON Schema `default` keyword to preserve `null`.
/// Serde deserializes `Option<Value>` with JSON null as `None`; we need to
/// distinguish absent key from `"default": null`.
#[derive(Debug, Clone, Default)]
pub enum DefaultKeyword {
    /// Key "default" was absent from the schema.
    #[default]
    Absent,
    /// Key "default" was present; the value may be `Value::Null`.
    Present(serde_json::Value),
}

impl<'de> Deserialize<'de> for DefaultKeyword {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v: serde_json::Value = Deserialize::deserialize(deserializer)?;
        Ok(DefaultKeyword::Present(v))
    }
}

/// A JSON Schema primitive type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

/// The `type` keyword: either one type name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeKeyword {
    Single(PrimitiveType),
    Multiple(Vec<PrimitiveType>),
}

impl TypeKeyword {
    #[must_use]
    pub fn types(&self) -> &[PrimitiveType] {
        match self {
            Self::Single(single) => std::slice::from_ref(single),
            Self::Multiple(many) => many,
        }
    }
}

/// The `additionalProperties` keyword. Only the schema form gives a property
/// dictionary semantics; the boolean form just opens or closes the object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<SchemaNode>),
}

/// Root or nested JSON Schema object.
///
/// Only the keywords that influence code generation are modeled; other keys
/// are ignored via serde's default behavior. `properties` keeps declaration
/// order because generated members follow it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaNode {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub r#type: Option<TypeKeyword>,

    #[serde(default)]
    pub properties: IndexMap<String, SchemaNode>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default)]
    pub items: Option<Box<SchemaNode>>,

    #[serde(default, rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(default)]
    pub default: DefaultKeyword,

    #[serde(default, rename = "$ref")]
    pub reference: Option<String>,

    #[serde(default)]
    pub r#enum: Option<Vec<serde_json::Value>>,

    #[serde(default)]
    pub r#const: Option<serde_json::Value>,

    #[serde(default, rename = "allOf")]
    pub all_of: Vec<SchemaNode>,

    #[serde(default, rename = "anyOf")]
    pub any_of: Vec<SchemaNode>,
}

/// The structural shape of a schema node, as far as code generation cares.
///
/// Every node classifies into exactly one shape; the type mapper matches on it
/// exhaustively.
#[derive(Debug, Clone, Copy)]
pub enum SchemaShape<'a> {
    /// `$ref`, which this generator does not follow.
    Reference(&'a str),
    /// `type: "array"`, with the optional `items` schema.
    Array { items: Option<&'a SchemaNode> },
    /// `anyOf` of single-value `enum`/`const` branches plus one typed catch-all.
    Enumeration { fallback: &'a SchemaNode },
    /// `additionalProperties` schema on an object-typed node.
    Dictionary { values: &'a SchemaNode },
    /// `additionalProperties` schema on anything other than an object.
    MisplacedDictionary,
    /// Everything else: a primitive, an object reference or an untyped value.
    Scalar,
}

impl SchemaNode {
    /// Declared type names; empty when `type` is absent.
    #[must_use]
    pub fn declared_types(&self) -> &[PrimitiveType] {
        match &self.r#type {
            Some(keyword) => keyword.types(),
            None => &[],
        }
    }

    /// True when `type` names exactly one type and it is `ty`.
    #[must_use]
    pub fn is_single_type(&self, ty: PrimitiveType) -> bool {
        self.declared_types() == [ty]
    }

    #[must_use]
    pub fn is_object_typed(&self) -> bool {
        self.is_single_type(PrimitiveType::Object)
    }

    /// The `default` literal if the keyword is present (it may be `null`).
    #[must_use]
    pub fn default_value(&self) -> Option<&serde_json::Value> {
        match &self.default {
            DefaultKeyword::Present(value) => Some(value),
            DefaultKeyword::Absent => None,
        }
    }

    /// The `default` literal used to initialize a member. An explicit `null`
    /// leaves the member uninitialized, same as an absent `default`.
    #[must_use]
    pub fn initial_value(&self) -> Option<&serde_json::Value> {
        self.default_value().filter(|value| !value.is_null())
    }

    /// The trimmed title, or `None` when absent or blank.
    #[must_use]
    pub fn trimmed_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }

    /// Classify this node. `$ref` wins over everything, then the schema form of
    /// `additionalProperties`, then arrays and enumerations.
    #[must_use]
    pub fn shape(&self) -> SchemaShape<'_> {
        if let Some(reference) = self.reference.as_deref() {
            return SchemaShape::Reference(reference);
        }
        if let Some(AdditionalProperties::Schema(values)) = &self.additional_properties {
            return if self.is_object_typed() {
                SchemaShape::Dictionary { values }
            } else {
                SchemaShape::MisplacedDictionary
            };
        }
        if self.is_single_type(PrimitiveType::Array) {
            return SchemaShape::Array {
                items: self.items.as_deref(),
            };
        }
        if let Some(fallback) = self.enumeration_fallback() {
            return SchemaShape::Enumeration { fallback };
        }
        SchemaShape::Scalar
    }

    /// Recognize the glTF enumeration idiom:
    ///
    /// ```json
    /// { "anyOf": [ { "enum": ["image/jpeg"] }, { "const": "image/png" }, { "type": "string" } ] }
    /// ```
    ///
    /// Returns the single typed catch-all branch.
    fn enumeration_fallback(&self) -> Option<&SchemaNode> {
        if self.r#type.is_some() || self.any_of.is_empty() {
            return None;
        }
        let mut fallback: Option<&SchemaNode> = None;
        let mut value_branches: usize = 0;
        for branch in &self.any_of {
            if branch.is_enum_value_branch() {
                value_branches += 1;
            } else if branch.r#type.is_some() && fallback.is_none() {
                fallback = Some(branch);
            } else {
                return None;
            }
        }
        if value_branches == 0 {
            return None;
        }
        fallback
    }

    fn is_enum_value_branch(&self) -> bool {
        let single_enum: bool = self.r#enum.as_ref().is_some_and(|values| values.len() == 1);
        self.r#type.is_none() && (single_enum || self.r#const.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SchemaNode {
        serde_json::from_str(json).expect("schema should parse")
    }

    #[test]
    fn properties_keep_declaration_order() {
        let schema: SchemaNode = parse(
            r#"{ "type": "object", "properties": { "zeta": {}, "alpha": {}, "mid": {} } }"#,
        );
        let actual: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(vec!["zeta", "alpha", "mid"], actual);
    }

    #[test]
    fn type_accepts_string_or_list() {
        let single: SchemaNode = parse(r#"{ "type": "string" }"#);
        let multiple: SchemaNode = parse(r#"{ "type": ["string", "integer"] }"#);
        assert_eq!([PrimitiveType::String], single.declared_types());
        assert_eq!(
            [PrimitiveType::String, PrimitiveType::Integer],
            multiple.declared_types()
        );
    }

    #[test]
    fn default_null_is_present() {
        let schema: SchemaNode = parse(r#"{ "default": null }"#);
        assert_eq!(Some(&serde_json::Value::Null), schema.default_value());
    }

    #[test]
    fn null_default_has_no_initial_value() {
        let schema: SchemaNode = parse(r#"{ "type": "string", "default": null }"#);
        assert!(schema.default_value().is_some());
        assert!(schema.initial_value().is_none());
        let schema: SchemaNode = parse(r#"{ "type": "string", "default": "x" }"#);
        assert_eq!(Some(&serde_json::json!("x")), schema.initial_value());
    }

    #[test]
    fn default_absent() {
        let schema: SchemaNode = parse(r#"{ "type": "string" }"#);
        assert!(schema.default_value().is_none());
    }

    #[test]
    fn reference_shape_wins() {
        let schema: SchemaNode =
            parse(r#"{ "$ref": "glTFid.schema.json", "type": "object", "additionalProperties": {} }"#);
        assert!(matches!(
            schema.shape(),
            SchemaShape::Reference("glTFid.schema.json")
        ));
    }

    #[test]
    fn dictionary_shape_requires_object_type() {
        let dictionary: SchemaNode =
            parse(r#"{ "type": "object", "additionalProperties": { "type": "string" } }"#);
        let misplaced: SchemaNode =
            parse(r#"{ "type": "array", "additionalProperties": { "type": "string" } }"#);
        assert!(matches!(dictionary.shape(), SchemaShape::Dictionary { .. }));
        assert!(matches!(misplaced.shape(), SchemaShape::MisplacedDictionary));
    }

    #[test]
    fn boolean_additional_properties_is_not_a_dictionary() {
        let schema: SchemaNode = parse(r#"{ "type": "object", "additionalProperties": false }"#);
        assert!(matches!(schema.shape(), SchemaShape::Scalar));
    }

    #[test]
    fn array_shape_exposes_items() {
        let schema: SchemaNode = parse(r#"{ "type": "array", "items": { "type": "number" } }"#);
        let SchemaShape::Array { items: Some(items) } = schema.shape() else {
            panic!("expected array shape with items");
        };
        assert!(items.is_single_type(PrimitiveType::Number));
    }

    #[test]
    fn enumeration_shape_finds_fallback() {
        let schema: SchemaNode = parse(
            r#"{ "anyOf": [
                { "enum": [9728] },
                { "const": 9729 },
                { "type": "integer" }
            ] }"#,
        );
        let SchemaShape::Enumeration { fallback } = schema.shape() else {
            panic!("expected enumeration shape");
        };
        assert!(fallback.is_single_type(PrimitiveType::Integer));
    }

    #[test]
    fn any_of_without_value_branches_is_scalar() {
        let schema: SchemaNode =
            parse(r#"{ "anyOf": [ { "type": "integer" }, { "type": "string" } ] }"#);
        assert!(matches!(schema.shape(), SchemaShape::Scalar));
    }

    #[test]
    fn any_of_with_multi_value_enum_is_scalar() {
        let schema: SchemaNode =
            parse(r#"{ "anyOf": [ { "enum": ["a", "b"] }, { "type": "string" } ] }"#);
        assert!(matches!(schema.shape(), SchemaShape::Scalar));
    }

    #[test]
    fn trimmed_title_ignores_blank() {
        let schema: SchemaNode = parse(r#"{ "title": "   " }"#);
        assert!(schema.trimmed_title().is_none());
    }
}
