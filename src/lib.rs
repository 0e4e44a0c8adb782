//! shadercross
//!
//! Build-time converter from one portable GLSL shader template to every
//! backend a renderer needs:
//!
//! - GLSL ES 1.00 and GLSL ES 3.00 text
//! - HLSL text, plus shader model 4.0 bytecode when `fxc` is available
//! - Binding reflection (vertex inputs, flattened uniform layout, textures)
//!
//! The result is a single generated artifact built from
//! [`shadercross_ir`] records.
//!
//! ```rust,ignore
//! use shadercross::{ConvertConfig, pipeline};
//!
//! let config = ConvertConfig {
//!     module: "shaders".into(),
//!     ..Default::default()
//! };
//! pipeline::run(&config)?;
//! ```

pub mod backend;
pub mod config;
pub mod emit;
pub mod errors;
pub mod pipeline;
pub mod reflect;
pub mod scratch;
pub mod shader;
pub mod variant;

pub use backend::{BackendTarget, BytecodeCompiler, Converted, ShaderConverter};
pub use config::ConvertConfig;
pub use emit::{Emitter, OutputFormat};
pub use errors::{ConvertError, Result};
pub use pipeline::{CompiledShader, Pipeline, RunSummary};
pub use shader::{ShaderFile, ShaderStage};
pub use variant::Variant;

pub use shadercross_ir as ir;
