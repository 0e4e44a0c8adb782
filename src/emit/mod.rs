//! Artifact Emission
//!
//! Serializes the compiled shaders into the single artifact consumed by the
//! rendering backend. Shaders are written in the order they were compiled and
//! every list keeps the order established upstream.
//!
//! | Format                 | Emitter               | Artifact                         |
//! |------------------------|-----------------------|----------------------------------|
//! | [`OutputFormat::Rust`] | [`RustModuleEmitter`] | `pub mod` with one static/shader |
//! | [`OutputFormat::Json`] | [`JsonEmitter`]       | JSON document                    |

mod json;
mod rust_module;

use serde::Deserialize;

pub use json::JsonEmitter;
pub use rust_module::RustModuleEmitter;

use crate::config::ConvertConfig;
use crate::errors::Result;
use crate::pipeline::CompiledShader;

/// Serializes compiled shaders into an artifact.
pub trait Emitter {
    fn emit(&self, module: &str, shaders: &[CompiledShader]) -> Result<String>;
}

/// Kind of artifact to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rust source module.
    #[default]
    Rust,
    /// JSON document.
    Json,
}

impl OutputFormat {
    #[must_use]
    pub fn emitter(self, config: &ConvertConfig) -> Box<dyn Emitter> {
        match self {
            Self::Rust => Box::new(RustModuleEmitter::new(config.ir_crate.clone())),
            Self::Json => Box::new(JsonEmitter),
        }
    }
}
