use std::fmt;
use std::path::PathBuf;

/// Error type for every phase of a generation run.
///
/// All variants are fatal: a run either completes or aborts on the first error.
#[derive(Debug, thiserror::Error)]
pub enum SchemaGenError {
    /// A schema file could not be read, parsed, or discovered.
    #[error("failed to load schema {}: {message}", path.display())]
    SchemaLoad { path: PathBuf, message: String },

    /// A document handed to single-document generation is not object-typed.
    #[error("{document}: root schema must have type \"object\"")]
    RootNotObject { document: String },

    /// A document uses a schema shape this generator does not support.
    #[error("{document}: {source}")]
    UnsupportedConstruct {
        document: String,
        #[source]
        source: UnsupportedConstructError,
    },

    /// Two derived names collide within the same scope.
    #[error("naming collision in {scope}: `{name}` is generated more than once")]
    NamingCollision { scope: String, name: String },

    /// Writing generated output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A schema shape rejected by the type mapper or the class synthesizer.
///
/// `pointer` is the JSON Pointer (RFC 6901) of the offending node inside its document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported construct at `{pointer}`: {construct}")]
pub struct UnsupportedConstructError {
    pub pointer: String,
    pub construct: UnsupportedConstruct,
}

impl UnsupportedConstructError {
    pub(crate) fn new(pointer: &str, construct: UnsupportedConstruct) -> Self {
        Self {
            pointer: pointer.to_string(),
            construct,
        }
    }
}

/// The kinds of schema shapes that abort generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedConstruct {
    /// A property schema is a `$ref`; schemas must be inlined per property.
    Reference(String),
    /// An `allOf` member of a document is a bare `$ref`.
    ComposedReference(String),
    /// `additionalProperties` is a schema but the container is not object-typed.
    DictionaryOnNonObject,
    /// A dictionary property declares a `default`.
    DictionaryDefault,
    /// The dictionary value type is not one of object, string or integer.
    DictionaryValueType(String),
    /// A `default` literal that cannot be expressed for the mapped type.
    DefaultValue { expected: String, found: String },
    /// A property key that yields no usable member name.
    PropertyName(String),
}

impl fmt::Display for UnsupportedConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference(reference) => {
                write!(f, "dereferencing not supported (`$ref: {reference}`)")
            }
            Self::ComposedReference(reference) => {
                write!(
                    f,
                    "composed types are not supported (`allOf` member `$ref: {reference}`)"
                )
            }
            Self::DictionaryOnNonObject => {
                write!(f, "`additionalProperties` requires `type: \"object\"`")
            }
            Self::DictionaryDefault => write!(f, "defaults for dictionaries are not supported"),
            Self::DictionaryValueType(value_type) => {
                write!(f, "Dictionary<string, {value_type}> is not supported")
            }
            Self::DefaultValue { expected, found } => {
                write!(f, "default value {found} is not a valid {expected}")
            }
            Self::PropertyName(raw_name) => {
                write!(f, "property `{raw_name}` does not produce a valid member name")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_construct_error_names_pointer_and_construct() {
        let error: UnsupportedConstructError = UnsupportedConstructError::new(
            "/properties/buffer",
            UnsupportedConstruct::Reference("glTFid.schema.json".to_string()),
        );
        let expected: &str = "unsupported construct at `/properties/buffer`: dereferencing not supported (`$ref: glTFid.schema.json`)";
        assert_eq!(expected, error.to_string());
    }

    #[test]
    fn schema_gen_error_wraps_document_name() {
        let error: SchemaGenError = SchemaGenError::UnsupportedConstruct {
            document: "sampler.schema.json".to_string(),
            source: UnsupportedConstructError::new(
                "/properties/extras",
                UnsupportedConstruct::DictionaryDefault,
            ),
        };
        let expected: &str = "sampler.schema.json: unsupported construct at `/properties/extras`: defaults for dictionaries are not supported";
        assert_eq!(expected, error.to_string());
    }

    #[test]
    fn dictionary_value_type_message() {
        let actual: String = UnsupportedConstruct::DictionaryValueType("boolean".to_string())
            .to_string();
        assert_eq!("Dictionary<string, boolean> is not supported", actual);
    }
}
