//! Error Types
//!
//! This module defines the error type used throughout the converter.
//!
//! # Overview
//!
//! Every failure aborts the whole run: the generated module is a single
//! artifact, so a shader that fails to convert invalidates all of it.
//! [`ConvertError`] covers:
//! - Shader discovery and stage detection
//! - Template expansion
//! - External cross-compiler and bytecode compiler failures
//! - Reflection decoding and type mapping
//! - Configuration, emission and I/O
//! - Interruption by a signal
//!
//! Failures raised while a particular shader variant is being processed are
//! wrapped in [`ConvertError::Shader`], which records the file and variant.
//! [`ConvertError::root_cause`] strips that context again.

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::BackendTarget;

/// The main error type for shadercross.
#[derive(Error, Debug)]
pub enum ConvertError {
    // ========================================================================
    // Discovery
    // ========================================================================
    /// The shaders directory could not be listed.
    #[error("Failed to read shader directory {dir}: {source}")]
    Discovery {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The file extension is neither a vertex nor a fragment marker.
    #[error("Unrecognized shader stage for {0}")]
    UnrecognizedShaderStage(PathBuf),

    /// Two shader files map to the same generated item name.
    #[error("{first} and {second} both map to `{symbol}`")]
    DuplicateSymbol {
        symbol: String,
        first: PathBuf,
        second: PathBuf,
    },

    // ========================================================================
    // Conversion
    // ========================================================================
    /// The shader could not be parsed or rendered as a template.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The cross-compiler exited unsuccessfully.
    #[error("Failed to convert {path} to {target}:\n{diagnostics}")]
    Conversion {
        path: PathBuf,
        target: BackendTarget,
        /// Captured subprocess output, verbatim.
        diagnostics: String,
    },

    /// The bytecode compiler exited unsuccessfully.
    #[error("Failed to compile HLSL bytecode ({profile}):\n{diagnostics}")]
    BytecodeCompile { profile: String, diagnostics: String },

    /// A required external tool is not installed.
    #[error("Required tool `{0}` not found in PATH")]
    ToolNotFound(String),

    /// A tool path given in the configuration does not point at a file.
    #[error("Configured `{tool}` path {path} does not exist")]
    ToolPathInvalid { tool: String, path: PathBuf },

    // ========================================================================
    // Reflection
    // ========================================================================
    /// The reflection document is not valid JSON or has an unexpected shape.
    #[error("Failed to parse reflection: {0}")]
    ReflectionParse(#[from] serde_json::Error),

    /// A type token outside the supported scalar/vector set.
    #[error("Unsupported input data type: {0}")]
    UnsupportedType(String),

    // ========================================================================
    // Configuration & I/O
    // ========================================================================
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The artifact could not be serialized.
    #[error("Failed to emit artifact: {0}")]
    Emit(String),

    /// File I/O error.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run was stopped by SIGINT or SIGTERM.
    #[error("Interrupted")]
    Interrupted,

    // ========================================================================
    // Context
    // ========================================================================
    /// A failure while processing one variant of one shader file.
    #[error("{path} (variant `{variant}`): {source}")]
    Shader {
        path: PathBuf,
        variant: &'static str,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the innermost error, skipping [`ConvertError::Shader`] context.
    #[must_use]
    pub fn root_cause(&self) -> &ConvertError {
        match self {
            Self::Shader { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Alias for `Result<T, ConvertError>`.
pub type Result<T> = std::result::Result<T, ConvertError>;
