//! Settings for C# code generation.

/// Namespace the generated classes are declared in unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "glTFLoader.Schema";

/// Settings that control code generation behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSettings {
    /// C# namespace wrapping every generated class.
    ///
    /// **Default: `glTFLoader.Schema`.**
    pub namespace: String,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}
