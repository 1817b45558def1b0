//! Name derivation for generated classes and members.
//!
//! Every generated identifier goes through one of these functions so the
//! same schema always produces the same names.

use heck::ToUpperCamelCase;

/// Prefix for private backing fields.
pub const BACKING_FIELD_PREFIX: &str = "m_";

/// Prefix Newtonsoft.Json looks for on conditional-serialization methods.
pub const SHOULD_SERIALIZE_PREFIX: &str = "ShouldSerialize";

/// Convert a schema `title` to a class name.
///
/// Splits on spaces, lower-cases each word, upper-cases its first character and
/// joins with no separator: `"Sample Object"` -> `"SampleObject"`,
/// `"glTF Child of Root Property"` -> `"GltfChildOfRootProperty"`.
/// Repeated or surrounding spaces produce no empty words.
#[must_use]
pub fn to_class_name(title: &str) -> String {
    title
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower: String = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a raw schema property key to the public member name (`PascalCase`).
///
/// `"my_value"` -> `"MyValue"`, `"byteOffset"` -> `"ByteOffset"`, `"x"` -> `"X"`.
#[must_use]
pub fn to_public_name(raw_name: &str) -> String {
    raw_name.to_upper_camel_case()
}

/// True when a public name from [`to_public_name`] can name a C# member:
/// non-empty and not starting with a digit.
#[must_use]
pub fn is_member_name(public_name: &str) -> bool {
    public_name
        .chars()
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
}

/// Derive the private backing field name from a public member name.
///
/// Lower-cases the first character and prepends [`BACKING_FIELD_PREFIX`]:
/// `"MyValue"` -> `"m_myValue"`. An empty name yields the bare prefix.
#[must_use]
pub fn to_backing_name(public_name: &str) -> String {
    let mut chars = public_name.chars();
    let mut name: String = String::from(BACKING_FIELD_PREFIX);
    if let Some(first) = chars.next() {
        name.extend(first.to_lowercase());
        name.push_str(chars.as_str());
    }
    name
}

/// Name of the should-serialize predicate for a public member.
#[must_use]
pub fn should_serialize_name(public_name: &str) -> String {
    format!("{SHOULD_SERIALIZE_PREFIX}{public_name}")
}

/// Class name for a document without a title, from its file name:
/// `"buffer.schema.json"` -> `"Buffer"`, `"animation.channel.schema.json"` -> `"AnimationChannel"`.
#[must_use]
pub fn class_name_from_file_name(file_name: &str) -> String {
    let stem: &str = file_name
        .strip_suffix(".schema.json")
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name);
    stem.to_upper_camel_case()
}
