use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::{ConvertError, Result};
use crate::scratch::take_file;
use crate::shader::ShaderStage;

use super::{BackendTarget, Converted, ShaderConverter, describe_command, diagnostics};

/// Base name of the cross-compiler output; it appends `_vs` / `_fs`.
const OUTPUT_BASE: &str = "shader";

/// The `glslcc` cross-compiler.
#[derive(Debug, Clone)]
pub struct Glslcc {
    program: PathBuf,
    flatten_ubos: bool,
}

impl Glslcc {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            flatten_ubos: false,
        }
    }

    /// Passes `--flatten-ubos`, turning uniform blocks into plain arrays.
    #[must_use]
    pub fn with_flatten_ubos(mut self, flatten: bool) -> Self {
        self.flatten_ubos = flatten;
        self
    }

    fn args(
        &self,
        source: &Path,
        stage: ShaderStage,
        target: BackendTarget,
        out_dir: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--silent".into(),
            "--optimize".into(),
            "--reflect".into(),
            "--output".into(),
            out_dir.join(OUTPUT_BASE).into(),
            "--lang".into(),
            target.language.as_flag().into(),
            "--profile".into(),
            target.profile.into(),
        ];
        if self.flatten_ubos {
            args.push("--flatten-ubos".into());
        }
        args.push(stage.compiler_flag().into());
        args.push(source.into());
        args
    }
}

impl ShaderConverter for Glslcc {
    fn convert(
        &self,
        source: &Path,
        stage: ShaderStage,
        target: BackendTarget,
        out_dir: &Path,
    ) -> Result<Converted> {
        let args = self.args(source, stage, target, out_dir);
        log::debug!("{}", describe_command(&self.program, &args));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| ConvertError::io(&self.program, e))?;

        if !output.status.success() {
            return Err(ConvertError::Conversion {
                path: source.to_path_buf(),
                target,
                diagnostics: diagnostics(&output),
            });
        }

        let out_path = out_dir.join(format!("{OUTPUT_BASE}_{}", stage.output_suffix()));
        let mut json_path = out_path.clone().into_os_string();
        json_path.push(".json");

        let bytes = take_file(&out_path)?;
        let reflection = take_file(Path::new(&json_path))?;
        let text = String::from_utf8(bytes).map_err(|e| ConvertError::Conversion {
            path: source.to_path_buf(),
            target,
            diagnostics: format!("output is not valid UTF-8: {e}"),
        })?;

        Ok(Converted {
            source: text,
            reflection,
        })
    }
}
