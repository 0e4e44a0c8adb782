use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::reflection::{InputLocation, TextureBinding, UniformsReflection};

/// One shader variant converted for every backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShaderSources {
    /// Vertex inputs, sorted ascending by location.
    pub inputs: Cow<'static, [InputLocation]>,
    pub uniforms: UniformsReflection,
    pub textures: Cow<'static, [TextureBinding]>,
    /// GLSL ES 1.00 source, prefixed with an explicit `#version 100`.
    pub glsl100es: Cow<'static, str>,
    /// GLSL ES 3.00 source.
    pub glsl300es: Cow<'static, str>,
    /// Compiled HLSL bytecode, absent when no bytecode compiler was available.
    pub hlsl: Option<Cow<'static, [u8]>>,
}

/// Everything emitted for one shader file.
///
/// A shader whose variants all produced the same GLSL ES 1.00 text is stored
/// once; otherwise the records are kept in variant order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderEntry {
    Single(ShaderSources),
    Variants(Cow<'static, [ShaderSources]>),
}

impl ShaderEntry {
    /// Returns the sources for `variant`.
    ///
    /// A single-record entry serves every variant.
    #[must_use]
    pub fn get(&self, variant: usize) -> Option<&ShaderSources> {
        match self {
            Self::Single(sources) => Some(sources),
            Self::Variants(list) => list.get(variant),
        }
    }

    /// Iterates the stored records in order.
    pub fn iter(&self) -> impl Iterator<Item = &ShaderSources> {
        let slice: &[ShaderSources] = match self {
            Self::Single(sources) => std::slice::from_ref(sources),
            Self::Variants(list) => list,
        };
        slice.iter()
    }

    #[must_use]
    pub fn is_multi_variant(&self) -> bool {
        matches!(self, Self::Variants(_))
    }
}
