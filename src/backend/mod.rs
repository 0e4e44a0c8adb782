//! Backend Conversion
//!
//! The external tools are reached through two narrow traits so the pipeline
//! can run against test doubles:
//!
//! | Trait                  | Implementation | Tool      |
//! |------------------------|----------------|-----------|
//! | [`ShaderConverter`]    | [`Glslcc`]     | `glslcc`  |
//! | [`BytecodeCompiler`]   | [`Fxc`]        | `fxc`     |
//!
//! Subprocesses block until they exit; there are no timeouts and no retries.

mod fxc;
mod glslcc;

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Output;

pub use fxc::Fxc;
pub use glslcc::Glslcc;

use crate::errors::{ConvertError, Result};
use crate::shader::ShaderStage;

/// Output shading language family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderLanguage {
    GlslEs,
    Hlsl,
}

impl ShaderLanguage {
    /// Value of the cross-compiler's `--lang` flag.
    #[must_use]
    pub fn as_flag(self) -> &'static str {
        match self {
            Self::GlslEs => "gles",
            Self::Hlsl => "hlsl",
        }
    }
}

/// A (language, profile) pair the portable source is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendTarget {
    pub language: ShaderLanguage,
    pub profile: &'static str,
}

impl BackendTarget {
    pub const GLSL_100_ES: Self = Self {
        language: ShaderLanguage::GlslEs,
        profile: "100",
    };
    pub const GLSL_300_ES: Self = Self {
        language: ShaderLanguage::GlslEs,
        profile: "300",
    };
    pub const HLSL_40: Self = Self {
        language: ShaderLanguage::Hlsl,
        profile: "40",
    };

    /// Conversion order. Reflection is taken from the first target only.
    pub const ALL: [Self; 3] = [Self::GLSL_100_ES, Self::GLSL_300_ES, Self::HLSL_40];
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.language.as_flag(), self.profile)
    }
}

/// Result of one cross-compiler invocation.
#[derive(Debug, Clone, Default)]
pub struct Converted {
    /// Backend source text.
    pub source: String,
    /// Raw JSON reflection document.
    pub reflection: Vec<u8>,
}

/// Converts an expanded shader to one backend.
pub trait ShaderConverter {
    /// Converts `source` for `target`, using `out_dir` for output files.
    fn convert(
        &self,
        source: &Path,
        stage: ShaderStage,
        target: BackendTarget,
        out_dir: &Path,
    ) -> Result<Converted>;
}

/// Compiles HLSL text to bytecode.
pub trait BytecodeCompiler {
    fn compile(&self, hlsl: &str, entry: &str, profile: &str, out_dir: &Path) -> Result<Vec<u8>>;
}

/// Searches `PATH` for an executable called `name`.
#[must_use]
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let candidate = candidate.with_extension("exe");
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    })
}

/// Resolves a tool from an explicit path or from `PATH`.
///
/// An explicit path that is not a file is `ToolPathInvalid`, never a miss.
pub(crate) fn resolve_tool(explicit: Option<&Path>, name: &str) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(ConvertError::ToolPathInvalid {
            tool: name.to_string(),
            path: path.to_path_buf(),
        }),
        None => Ok(find_executable(name)),
    }
}

/// Joins a subprocess's stdout and stderr for error reporting.
pub(crate) fn diagnostics(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !text.is_empty() && !stderr.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&stderr);
    if text.trim().is_empty() {
        text = format!("exited with {}", output.status);
    }
    text
}

pub(crate) fn describe_command<I, S>(program: &Path, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

/// Shell-script stand-ins for the external tools.
#[cfg(all(test, unix))]
pub(crate) mod test_tools {
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use crate::scratch::ScratchDir;

    static SPAWN: Mutex<()> = Mutex::new(());

    /// Held while writing and running a script. A child forked by a
    /// concurrent test would otherwise inherit the script's write handle
    /// and make `exec` fail with ETXTBSY.
    pub(crate) fn lock() -> MutexGuard<'static, ()> {
        SPAWN.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write_script(dir: &ScratchDir, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}
