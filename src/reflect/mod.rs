//! Reflection Parsing
//!
//! Turns the cross-compiler's JSON reflection document into the canonical
//! binding metadata of [`ShaderSources`]:
//!
//! - **Inputs** come from the vertex stage only (fragment inputs are not
//!   externally bindable) and are sorted by location, since the runtime binds
//!   vertex attributes by position.
//! - **Uniform blocks** and **textures** come from the vertex stage, or from
//!   the fragment stage when the vertex stage declares none.
//! - **Uniform offsets** are flattened: each block starts where the previous
//!   one ended, and the total is the sum of all block sizes.

mod data_type;
pub mod document;

use std::borrow::Cow;

use serde::de::Error as _;
use shadercross_ir::{
    InputLocation, ShaderSources, TextureBinding, UniformBlock, UniformLocation,
    UniformsReflection,
};

pub use data_type::parse_data_type;
use document::{ReflectionDocument, UniformBufferReflection};

use crate::errors::{ConvertError, Result};

/// Binding metadata extracted from one reflection document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reflection {
    pub inputs: Vec<InputLocation>,
    pub uniforms: UniformsReflection,
    pub textures: Vec<TextureBinding>,
}

impl Reflection {
    /// Moves the metadata into `sources`, leaving its texts untouched.
    pub fn apply_to(self, sources: &mut ShaderSources) {
        sources.inputs = Cow::Owned(self.inputs);
        sources.uniforms = self.uniforms;
        sources.textures = Cow::Owned(self.textures);
    }
}

/// Parses a raw reflection document.
///
/// Malformed JSON fails with `ReflectionParse`, as does a uniform layout
/// whose offsets overflow `u32`. A type token outside the supported set
/// fails with `UnsupportedType`.
pub fn parse_reflection(json: &[u8]) -> Result<Reflection> {
    let doc: ReflectionDocument = serde_json::from_slice(json)?;

    let mut inputs = doc
        .vs
        .inputs
        .iter()
        .map(|input| {
            let (data_type, size) = parse_data_type(&input.ty)?;
            Ok(InputLocation {
                name: Cow::Owned(input.name.clone()),
                location: input.location,
                semantic: Cow::Owned(input.semantic.clone()),
                semantic_index: input.semantic_index,
                data_type,
                size,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    inputs.sort_by_key(|input| input.location);

    let shader_blocks = if doc.vs.uniform_buffers.is_empty() {
        &doc.fs.uniform_buffers
    } else {
        &doc.vs.uniform_buffers
    };

    let mut blocks = Vec::with_capacity(shader_blocks.len());
    let mut locations = Vec::new();
    let mut block_offset = 0u32;
    for block in shader_blocks {
        blocks.push(UniformBlock {
            name: Cow::Owned(block.name.clone()),
            binding: block.binding,
        });
        for member in &block.members {
            let (data_type, size) = parse_data_type(&member.ty)?;
            locations.push(UniformLocation {
                // Synthetic name generated by the cross-compiler.
                name: Cow::Owned(format!("_{}.{}", block.id, member.name)),
                data_type,
                size,
                offset: block_offset
                    .checked_add(member.offset)
                    .ok_or_else(|| layout_overflow(block))?,
            });
        }
        block_offset = block_offset
            .checked_add(block.size)
            .ok_or_else(|| layout_overflow(block))?;
    }

    let textures = if doc.vs.textures.is_empty() {
        &doc.fs.textures
    } else {
        &doc.vs.textures
    };
    let textures = textures
        .iter()
        .map(|texture| TextureBinding {
            name: Cow::Owned(texture.name.clone()),
            binding: texture.binding,
        })
        .collect();

    Ok(Reflection {
        inputs,
        uniforms: UniformsReflection {
            blocks: Cow::Owned(blocks),
            locations: Cow::Owned(locations),
            size: block_offset,
        },
        textures,
    })
}

fn layout_overflow(block: &UniformBufferReflection) -> ConvertError {
    ConvertError::ReflectionParse(serde_json::Error::custom(format!(
        "uniform block `{}` (id {}) overflows the flattened uniform layout",
        block.name, block.id
    )))
}
