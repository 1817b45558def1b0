//! Example matching the README: one glTF-style schema using every supported
//! property shape, rendered as C# to stdout.

use std::io;

const SCHEMA_JSON: &str = r#"{
  "title": "Material",
  "type": "object",
  "description": "The material appearance of a primitive.",
  "required": ["name"],
  "properties": {
    "name": { "type": "string", "description": "The user-defined name of this object." },
    "doubleSided": { "type": "boolean", "default": false },
    "alphaCutoff": { "type": "number", "default": 0.5 },
    "alphaMode": {
      "anyOf": [ { "enum": ["OPAQUE"] }, { "enum": ["MASK"] }, { "enum": ["BLEND"] }, { "type": "string" } ],
      "default": "OPAQUE"
    },
    "emissiveFactor": { "type": "array", "items": { "type": "number" }, "default": [0.0, 0.0, 0.0] },
    "pbrMetallicRoughness": { "type": "object", "title": "Material PBR Metallic Roughness" },
    "extensions": { "type": "object", "additionalProperties": { "type": "object" } },
    "extras": { "type": "object", "additionalProperties": { "type": ["object", "string"] } }
  }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout: io::Stdout = io::stdout();
    let settings = json_schema_cs::GenerateSettings::default();
    json_schema_cs::generate_to_writer(
        "material.schema.json",
        SCHEMA_JSON,
        &mut stdout,
        &settings,
    )?;
    Ok(())
}
