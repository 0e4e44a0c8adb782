use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Scalar kind of a vertex input or uniform member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Float,
    Int,
}

/// A vertex attribute, bound by `location` rather than by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLocation {
    /// Attribute name as declared in the shader.
    pub name: Cow<'static, str>,
    pub location: u32,
    /// HLSL semantic (`TEXCOORD`, ...) and its index.
    pub semantic: Cow<'static, str>,
    pub semantic_index: u32,
    pub data_type: DataType,
    /// Number of components (1..=4).
    pub size: u32,
}

/// A uniform buffer declared by the shader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformBlock {
    pub name: Cow<'static, str>,
    pub binding: u32,
}

/// A single uniform member inside the flattened uniform address space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformLocation {
    /// Synthesized `_<block id>.<member>` name, unique across blocks.
    pub name: Cow<'static, str>,
    pub data_type: DataType,
    pub size: u32,
    /// Byte offset from the start of the first block.
    pub offset: u32,
}

/// Uniform layout of a shader.
///
/// All blocks are concatenated in declaration order into one contiguous
/// range of `size` bytes, matching how the runtime uploads a single buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UniformsReflection {
    pub blocks: Cow<'static, [UniformBlock]>,
    pub locations: Cow<'static, [UniformLocation]>,
    pub size: u32,
}

impl UniformsReflection {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A sampled texture binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureBinding {
    pub name: Cow<'static, str>,
    pub binding: u32,
}
