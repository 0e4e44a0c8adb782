//! Conversion Pipeline
//!
//! Drives every discovered shader through all variants and backends:
//!
//! ```text
//! ShaderFile ─▶ VariantExpander ─▶ ShaderConverter (gles 100) ─▶ parse_reflection
//!                                 ├▶ ShaderConverter (gles 300)
//!                                 └▶ ShaderConverter (hlsl 40) ─▶ BytecodeCompiler?
//! ```
//!
//! Processing is sequential and files are handled in discovery order, so the
//! generated artifact is reproducible. Any failure aborts the run before the
//! artifact is written. So does a raised interrupt flag, which is checked
//! before every external tool invocation.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shadercross_ir::{ShaderEntry, ShaderSources};

use crate::backend::{
    BackendTarget, BytecodeCompiler, Fxc, Glslcc, ShaderConverter, resolve_tool,
};
use crate::config::ConvertConfig;
use crate::errors::{ConvertError, Result};
use crate::reflect::parse_reflection;
use crate::scratch::ScratchDir;
use crate::shader::{ShaderFile, discover_shaders};
use crate::variant::{Variant, VariantExpander};

/// HLSL entry point produced by the cross-compiler.
const HLSL_ENTRY_POINT: &str = "main";

/// Everything produced for one shader file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledShader {
    /// File name, e.g. `blit.frag`.
    pub name: String,
    /// Identifier of the emitted item, e.g. `SHADER_BLIT_FRAG`.
    pub symbol: String,
    pub entry: ShaderEntry,
    /// HLSL text of each record in `entry`, kept for debugging.
    pub hlsl_sources: Vec<String>,
}

/// One variant of one shader, converted for every backend.
#[derive(Debug, Clone)]
struct VariantOutput {
    sources: ShaderSources,
    hlsl_source: String,
}

/// Run-wide state: scratch space and the external tools.
///
/// The scratch directory is removed when the pipeline is dropped, whichever
/// way the run ends.
pub struct Pipeline {
    scratch: ScratchDir,
    expander: VariantExpander,
    converter: Box<dyn ShaderConverter>,
    bytecode: Option<Box<dyn BytecodeCompiler>>,
    interrupted: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new(
        converter: Box<dyn ShaderConverter>,
        bytecode: Option<Box<dyn BytecodeCompiler>>,
    ) -> Result<Self> {
        Ok(Self {
            scratch: ScratchDir::new()?,
            expander: VariantExpander::new()?,
            converter,
            bytecode,
            interrupted: Arc::default(),
        })
    }

    /// Stops the run with [`ConvertError::Interrupted`] at the next step
    /// after `flag` is set, e.g. by a signal handler.
    #[must_use]
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = flag;
        self
    }

    #[inline]
    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }

    fn check_interrupted(&self) -> Result<()> {
        if self.is_interrupted() {
            return Err(ConvertError::Interrupted);
        }
        Ok(())
    }

    /// Locates `glslcc` (required) and `fxc` (optional).
    ///
    /// A tool path set in `config` must exist; only tools looked up on
    /// `PATH` may be absent.
    pub fn from_config(config: &ConvertConfig) -> Result<Self> {
        let glslcc = resolve_tool(config.glslcc.as_deref(), "glslcc")?
            .ok_or_else(|| ConvertError::ToolNotFound(String::from("glslcc")))?;
        log::info!("Using cross-compiler {}", glslcc.display());
        let converter = Glslcc::new(glslcc).with_flatten_ubos(config.flatten_ubos);

        let bytecode: Option<Box<dyn BytecodeCompiler>> =
            match resolve_tool(config.fxc.as_deref(), "fxc")? {
                Some(fxc) => {
                    log::info!("Using bytecode compiler {}", fxc.display());
                    Some(Box::new(Fxc::new(fxc)))
                }
                None => {
                    log::warn!("fxc not found; HLSL bytecode will be omitted");
                    None
                }
            };

        Self::new(Box::new(converter), bytecode)
    }

    #[inline]
    #[must_use]
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    #[inline]
    #[must_use]
    pub fn has_bytecode_compiler(&self) -> bool {
        self.bytecode.is_some()
    }

    /// Compiles `shaders` in order.
    pub fn compile_all(&self, shaders: &[ShaderFile]) -> Result<Vec<CompiledShader>> {
        shaders.iter().map(|shader| self.compile_shader(shader)).collect()
    }

    /// Compiles every variant of `shader` and folds identical variants.
    pub fn compile_shader(&self, shader: &ShaderFile) -> Result<CompiledShader> {
        log::info!("Converting {}", shader.path().display());

        let mut outputs = Vec::with_capacity(Variant::ALL.len());
        for variant in &Variant::ALL {
            let output = self.compile_variant(shader, variant).map_err(|source| {
                // Tools killed by the same signal fail with their own errors.
                if self.is_interrupted() {
                    return ConvertError::Interrupted;
                }
                ConvertError::Shader {
                    path: shader.path().to_path_buf(),
                    variant: variant.name,
                    source: Box::new(source),
                }
            })?;
            outputs.push(output);
        }

        // A shader that never references the substitution keys yields the
        // same text for every variant.
        let multi_variant = outputs
            .windows(2)
            .any(|pair| pair[0].sources.glsl100es != pair[1].sources.glsl100es);

        let (entry, hlsl_sources) = if multi_variant {
            let (sources, hlsl): (Vec<_>, Vec<_>) = outputs
                .into_iter()
                .map(|out| (out.sources, out.hlsl_source))
                .unzip();
            (ShaderEntry::Variants(Cow::Owned(sources)), hlsl)
        } else {
            let first = outputs.swap_remove(0);
            (ShaderEntry::Single(first.sources), vec![first.hlsl_source])
        };

        log::debug!(
            "{}: {} record(s)",
            shader.file_name(),
            hlsl_sources.len()
        );

        Ok(CompiledShader {
            name: shader.file_name(),
            symbol: shader.symbol_name(),
            entry,
            hlsl_sources,
        })
    }

    fn compile_variant(&self, shader: &ShaderFile, variant: &Variant) -> Result<VariantOutput> {
        self.check_interrupted()?;
        let stage = shader.stage();
        let expanded = self
            .expander
            .expand_to(shader.path(), variant, &self.scratch)?;
        let out_dir = self.scratch.path();

        // Inputs, uniforms and textures are backend independent, so only the
        // first backend's reflection is parsed.
        let glsl100 =
            self.converter
                .convert(expanded.path(), stage, BackendTarget::GLSL_100_ES, out_dir)?;
        let mut sources = ShaderSources::default();
        parse_reflection(&glsl100.reflection)?.apply_to(&mut sources);

        self.check_interrupted()?;
        let glsl300 =
            self.converter
                .convert(expanded.path(), stage, BackendTarget::GLSL_300_ES, out_dir)?;
        self.check_interrupted()?;
        let hlsl = self
            .converter
            .convert(expanded.path(), stage, BackendTarget::HLSL_40, out_dir)?;

        sources.hlsl = match &self.bytecode {
            Some(compiler) => {
                self.check_interrupted()?;
                let bytecode = compiler.compile(
                    &hlsl.source,
                    HLSL_ENTRY_POINT,
                    stage.hlsl_profile(),
                    out_dir,
                )?;
                Some(Cow::Owned(bytecode))
            }
            None => None,
        };

        // Desktop GL 3 contexts need the explicit version directive.
        sources.glsl100es = Cow::Owned(format!("#version 100\n{}", glsl100.source));
        sources.glsl300es = Cow::Owned(glsl300.source);

        Ok(VariantOutput {
            sources,
            hlsl_source: hlsl.source,
        })
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub shaders: usize,
    pub multi_variant: usize,
    /// `false` when the existing artifact was already up to date.
    pub written: bool,
}

/// Runs the whole conversion described by `config` with the real tools.
pub fn run(config: &ConvertConfig) -> Result<RunSummary> {
    let pipeline = Pipeline::from_config(config)?;
    run_with(config, &pipeline)
}

/// Runs the conversion with an already assembled pipeline.
pub fn run_with(config: &ConvertConfig, pipeline: &Pipeline) -> Result<RunSummary> {
    config.validate()?;
    let shaders = discover_shaders(&config.shaders_dir)?;
    let compiled = pipeline.compile_all(&shaders)?;
    pipeline.check_interrupted()?;

    let emitter = config.format.emitter(config);
    let artifact = emitter.emit(&config.module, &compiled)?;
    let written = write_if_changed(&config.output, &artifact)?;

    let summary = RunSummary {
        shaders: compiled.len(),
        multi_variant: compiled.iter().filter(|s| s.entry.is_multi_variant()).count(),
        written,
    };
    if written {
        log::info!(
            "Wrote {} shader(s) to {}",
            summary.shaders,
            config.output.display()
        );
    } else {
        log::info!("{} is up to date", config.output.display());
    }
    Ok(summary)
}

/// Writes `contents` unless `path` already holds exactly that.
fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    if std::fs::read(path).is_ok_and(|existing| existing == contents.as_bytes()) {
        return Ok(false);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| ConvertError::io(path, e))?;
    Ok(true)
}
