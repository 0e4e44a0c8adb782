//! Shader Intermediate Representation
//!
//! The records a rendering backend consumes to create programs for any of the
//! supported shading languages:
//!
//! - [`ShaderSources`]: backend source texts, optional HLSL bytecode, and the
//!   binding reflection shared by all backends.
//! - [`ShaderEntry`]: one shader file, either a single record or one record
//!   per variant.
//!
//! All list and text fields are `Cow<'static, _>`, so the same types back
//! both the `static` items of a generated module (borrowed) and records built
//! at run time (owned).
//!
//! ```rust,ignore
//! use shadercross_ir::ShaderEntry;
//!
//! let sources = match &shaders::SHADER_BLIT_FRAG {
//!     ShaderEntry::Single(src) => src,
//!     ShaderEntry::Variants(list) => &list[material_variant],
//! };
//! let glsl = if es3 { &sources.glsl300es } else { &sources.glsl100es };
//! ```

mod reflection;
mod sources;

pub use reflection::{
    DataType, InputLocation, TextureBinding, UniformBlock, UniformLocation, UniformsReflection,
};
pub use sources::{ShaderEntry, ShaderSources};
