//! Converter Configuration
//!
//! [`ConvertConfig`] holds everything a run needs. It can be read from a TOML
//! file and then overridden from the command line:
//!
//! ```toml
//! module = "shaders"
//! shaders_dir = "shaders"
//! output = "src/shaders.rs"
//! format = "rust"
//! # glslcc = "/opt/glslcc/bin/glslcc"
//! # fxc = "C:/Program Files (x86)/Windows Kits/10/bin/x64/fxc.exe"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::emit::OutputFormat;
use crate::errors::{ConvertError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Name of the generated module.
    pub module: String,
    /// Directory holding the `.vert` / `.frag` templates.
    pub shaders_dir: PathBuf,
    /// Generated artifact.
    pub output: PathBuf,
    pub format: OutputFormat,
    /// Crate path the generated Rust module imports its types from.
    pub ir_crate: String,
    /// Explicit cross-compiler path; searched in `PATH` when unset.
    pub glslcc: Option<PathBuf>,
    /// Explicit bytecode compiler path; searched in `PATH` when unset.
    pub fxc: Option<PathBuf>,
    /// Ask the cross-compiler to flatten uniform blocks into arrays.
    pub flatten_ubos: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            module: String::new(),
            shaders_dir: PathBuf::from("shaders"),
            output: PathBuf::from("shaders.rs"),
            format: OutputFormat::Rust,
            ir_crate: String::from("shadercross_ir"),
            glslcc: None,
            fxc: None,
            flatten_ubos: false,
        }
    }
}

impl ConvertConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| ConvertError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        Self::from_toml_str(&source)
            .map_err(|e| ConvertError::Config(format!("{}: {e}", path.display())))
    }

    /// Checks that the names end up as valid identifiers in the output.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.module) {
            return Err(ConvertError::Config(format!(
                "module name `{}` is not a valid identifier",
                self.module
            )));
        }
        if !self.ir_crate.split("::").all(is_identifier) {
            return Err(ConvertError::Config(format!(
                "`{}` is not a valid crate path",
                self.ir_crate
            )));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name != "_" && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
