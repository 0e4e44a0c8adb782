use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use clap::Parser;

use shadercross::{ConvertConfig, OutputFormat, Pipeline, pipeline};

/// Converts shader templates to GLSL ES 1.00/3.00, HLSL and reflection data.
#[derive(Parser, Debug)]
#[clap(author, about, version)]
struct Cli {
    /// TOML configuration file; flags override its values.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Name of the generated module.
    #[clap(short, long)]
    module: Option<String>,

    /// Directory holding the `.vert` / `.frag` templates.
    #[clap(long)]
    shaders_dir: Option<PathBuf>,

    /// Generated artifact path.
    #[clap(short, long)]
    output: Option<PathBuf>,

    #[clap(long, value_enum)]
    format: Option<OutputFormat>,

    /// Crate path the generated module imports its types from.
    #[clap(long)]
    ir_crate: Option<String>,

    /// Path to `glslcc`, instead of searching PATH.
    #[clap(long)]
    glslcc: Option<PathBuf>,

    /// Path to `fxc`, instead of searching PATH.
    #[clap(long)]
    fxc: Option<PathBuf>,

    /// Flatten uniform blocks into plain arrays.
    #[clap(long)]
    flatten_ubos: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::load(path)?,
            None => ConvertConfig::default(),
        };

        if let Some(module) = self.module {
            config.module = module;
        }
        if let Some(dir) = self.shaders_dir {
            config.shaders_dir = dir;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(ir_crate) = self.ir_crate {
            config.ir_crate = ir_crate;
        }
        if self.glslcc.is_some() {
            config.glslcc = self.glslcc;
        }
        if self.fxc.is_some() {
            config.fxc = self.fxc;
        }
        config.flatten_ubos |= self.flatten_ubos;

        Ok(config)
    }
}

/// Raises the returned flag on SIGINT, SIGTERM or SIGQUIT so the pipeline can
/// unwind and remove its scratch directory. A second signal exits at once.
#[cfg(unix)]
fn install_interrupt_handler() -> anyhow::Result<Arc<AtomicBool>> {
    use signal_hook::consts::TERM_SIGNALS;
    use signal_hook::flag;

    let interrupted = Arc::new(AtomicBool::new(false));
    for &signal in TERM_SIGNALS {
        flag::register_conditional_shutdown(signal, 1, Arc::clone(&interrupted))
            .context("failed to install signal handler")?;
        flag::register(signal, Arc::clone(&interrupted))
            .context("failed to install signal handler")?;
    }
    Ok(interrupted)
}

#[cfg(not(unix))]
fn install_interrupt_handler() -> anyhow::Result<Arc<AtomicBool>> {
    Ok(Arc::default())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config()?;
    let interrupted = install_interrupt_handler()?;

    let pipeline = Pipeline::from_config(&config)
        .context("shader conversion failed")?
        .with_interrupt_flag(interrupted);
    let summary = pipeline::run_with(&config, &pipeline).context("shader conversion failed")?;

    log::info!(
        "{} shader(s), {} with multiple variants",
        summary.shaders,
        summary.multi_variant
    );
    Ok(())
}
