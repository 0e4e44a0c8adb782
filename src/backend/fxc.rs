use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::{ConvertError, Result};
use crate::scratch::take_file;

use super::{BytecodeCompiler, describe_command, diagnostics};

/// The Direct3D `fxc` HLSL compiler.
#[derive(Debug, Clone)]
pub struct Fxc {
    program: PathBuf,
}

impl Fxc {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl BytecodeCompiler for Fxc {
    fn compile(&self, hlsl: &str, entry: &str, profile: &str, out_dir: &Path) -> Result<Vec<u8>> {
        let input = out_dir.join("shader.hlsl");
        let output_path = out_dir.join("shader.bin");
        std::fs::write(&input, hlsl).map_err(|e| ConvertError::io(&input, e))?;

        let args: [&OsStr; 8] = [
            OsStr::new("/T"),
            OsStr::new(profile),
            OsStr::new("/E"),
            OsStr::new(entry),
            OsStr::new("/nologo"),
            OsStr::new("/Fo"),
            output_path.as_os_str(),
            input.as_os_str(),
        ];
        log::debug!("{}", describe_command(&self.program, args));

        let result = Command::new(&self.program).args(args).output();
        let _ = std::fs::remove_file(&input);
        let output = result.map_err(|e| ConvertError::io(&self.program, e))?;

        if !output.status.success() {
            let _ = std::fs::remove_file(&output_path);
            return Err(ConvertError::BytecodeCompile {
                profile: profile.to_string(),
                diagnostics: diagnostics(&output),
            });
        }

        take_file(&output_path)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::backend::test_tools::{lock, write_script};
    use crate::scratch::ScratchDir;

    fn compile_with(script: &str, profile: &str) -> (ScratchDir, Result<Vec<u8>>) {
        let _spawn = lock();
        let tools = ScratchDir::new().unwrap();
        let fxc = write_script(&tools, "fxc", script);
        let work = ScratchDir::new().unwrap();
        let result = Fxc::new(fxc).compile(
            "float4 main() : SV_Target { return 1; }",
            "main",
            profile,
            work.path(),
        );
        (work, result)
    }

    #[test]
    fn bytecode_is_read_and_scratch_files_removed() {
        // Output records the profile and entry point, then the input text.
        let (work, result) = compile_with(
            r#"{ printf '%s %s\n' "$2" "$4"; cat "$8"; } > "$7""#,
            "ps_4_0",
        );
        let bytecode = result.unwrap();

        assert_eq!(bytecode, b"ps_4_0 main\nfloat4 main() : SV_Target { return 1; }");
        assert!(!work.join("shader.hlsl").exists());
        assert!(!work.join("shader.bin").exists());
    }

    #[test]
    fn failure_keeps_diagnostics_verbatim() {
        let (work, result) = compile_with(
            "echo 'shader.hlsl(1,8): error X3000: syntax error' >&2\nexit 1\n",
            "vs_4_0",
        );
        let err = result.unwrap_err();
        let ConvertError::BytecodeCompile {
            profile,
            diagnostics,
        } = &err
        else {
            panic!("expected bytecode error, got {err:?}");
        };
        assert_eq!(profile, "vs_4_0");
        assert_eq!(diagnostics, "shader.hlsl(1,8): error X3000: syntax error\n");
        assert!(!work.join("shader.hlsl").exists());
    }
}
