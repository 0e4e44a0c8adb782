//! Typed view of the cross-compiler's JSON reflection sidecar.
//!
//! Fields the converter does not use (`set`, `dimension`, `format`, ...)
//! are still declared so that a wrongly typed document fails to decode
//! instead of slipping through.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReflectionDocument {
    #[serde(default)]
    pub vs: StageReflection,
    #[serde(default)]
    pub fs: StageReflection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StageReflection {
    pub inputs: Vec<InputReflection>,
    pub uniform_buffers: Vec<UniformBufferReflection>,
    pub textures: Vec<TextureReflection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputReflection {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub location: u32,
    #[serde(default)]
    pub semantic: String,
    #[serde(default)]
    pub semantic_index: u32,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniformBufferReflection {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub set: u32,
    pub binding: u32,
    #[serde(rename = "block_size")]
    pub size: u32,
    #[serde(default)]
    pub members: Vec<UniformMemberReflection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniformMemberReflection {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub offset: u32,
    #[serde(default)]
    pub size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextureReflection {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub set: u32,
    pub binding: u32,
    #[serde(default)]
    pub dimension: String,
    #[serde(default)]
    pub format: String,
}
