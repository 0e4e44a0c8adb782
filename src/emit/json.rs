use serde::Serialize;
use shadercross_ir::ShaderEntry;

use super::Emitter;
use crate::errors::{ConvertError, Result};
use crate::pipeline::CompiledShader;

/// Emits `{ "module": .., "shaders": [{ "name", "entry" }, ..] }`.
///
/// The debug HLSL text is not part of this format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

#[derive(Serialize)]
struct JsonArtifact<'a> {
    module: &'a str,
    shaders: Vec<JsonShader<'a>>,
}

#[derive(Serialize)]
struct JsonShader<'a> {
    name: &'a str,
    entry: &'a ShaderEntry,
}

impl Emitter for JsonEmitter {
    fn emit(&self, module: &str, shaders: &[CompiledShader]) -> Result<String> {
        let artifact = JsonArtifact {
            module,
            shaders: shaders
                .iter()
                .map(|shader| JsonShader {
                    name: &shader.name,
                    entry: &shader.entry,
                })
                .collect(),
        };
        let mut text = serde_json::to_string_pretty(&artifact)
            .map_err(|e| ConvertError::Emit(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }
}
