//! Shader discovery and stage detection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{ConvertError, Result};

/// Pipeline stage of a shader file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Detects the stage from a `.vert` / `.frag` extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("vert") => Ok(Self::Vertex),
            Some("frag") => Ok(Self::Fragment),
            _ => Err(ConvertError::UnrecognizedShaderStage(path.to_path_buf())),
        }
    }

    /// Cross-compiler flag selecting this stage.
    #[must_use]
    pub fn compiler_flag(self) -> &'static str {
        match self {
            Self::Vertex => "--vert",
            Self::Fragment => "--frag",
        }
    }

    /// Suffix the cross-compiler appends to its output base name.
    #[must_use]
    pub fn output_suffix(self) -> &'static str {
        match self {
            Self::Vertex => "vs",
            Self::Fragment => "fs",
        }
    }

    /// HLSL shader model 4.0 profile (`vs_4_0` / `ps_4_0`).
    #[must_use]
    pub fn hlsl_profile(self) -> &'static str {
        match self {
            Self::Vertex => "vs_4_0",
            Self::Fragment => "ps_4_0",
        }
    }
}

/// A shader template found in the shaders directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderFile {
    path: PathBuf,
    stage: ShaderStage,
}

impl ShaderFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let stage = ShaderStage::from_path(&path)?;
        Ok(Self { path, stage })
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// File name, e.g. `blit.frag`.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Identifier of the emitted item, e.g. `SHADER_BLIT_FRAG`.
    #[must_use]
    pub fn symbol_name(&self) -> String {
        let mut symbol = String::from("SHADER_");
        for c in self.file_name().chars() {
            if c.is_ascii_alphanumeric() {
                symbol.push(c.to_ascii_uppercase());
            } else {
                symbol.push('_');
            }
        }
        symbol
    }
}

/// Lists the shader files directly inside `dir`, sorted by file name.
///
/// Sub-directories are not descended into. Any file that is not a vertex or
/// fragment shader aborts discovery, as do two files whose names map to the
/// same generated item.
pub fn discover_shaders(dir: &Path) -> Result<Vec<ShaderFile>> {
    let mut shaders = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| ConvertError::Discovery {
            dir: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        shaders.push(ShaderFile::new(entry.into_path())?);
    }
    check_unique_symbols(&shaders)?;

    log::debug!("Discovered {} shader(s) in {}", shaders.len(), dir.display());
    Ok(shaders)
}

/// Fails on the first pair of shaders sharing a [`ShaderFile::symbol_name`].
pub fn check_unique_symbols(shaders: &[ShaderFile]) -> Result<()> {
    let mut seen: HashMap<String, &Path> = HashMap::with_capacity(shaders.len());
    for shader in shaders {
        let symbol = shader.symbol_name();
        if let Some(first) = seen.get(&symbol) {
            return Err(ConvertError::DuplicateSymbol {
                symbol,
                first: first.to_path_buf(),
                second: shader.path().to_path_buf(),
            });
        }
        seen.insert(symbol, shader.path());
    }
    Ok(())
}
