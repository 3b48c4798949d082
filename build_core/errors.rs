//! Error set that can occur while generating code during the build step.
use std::env::VarError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the build script (JSON parsing, validation, code generation).
pub(crate) enum BuildError {
    /// Failed to read the `OUT_DIR` environment variable.
    #[error("[MESSAGE]:OUT_DIR error. [ERROR]:{source}")]
    OutDirErr {
        #[source]
        source: VarError,
    },

    /// Failure while parsing the manifest.
    #[error("[MESSAGE]:Invalid JSON format [Error]:{0:?}")]
    ParseJson(#[from] serde_json::Error),

    /// Unable to read a file from disk.
    #[error("[MESSAGE]:Failed to read file [PATH]:{path} [ERROR]:{source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Provided path is invalid or missing.
    #[error("[MESSAGE]:Failed to read path. [PATH]:{path}")]
    ReadPath { path: &'static str },

    /// Failed to write the generated code to disk.
    #[error("[MESSAGE]:Failed to write file [PATH]:{path} [ERROR]:{source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting error while writing generated code.
    #[error("[MESSAGE]:Failed to display writeln! macro [ERROR]:{source}")]
    WritelnErr {
        #[from]
        source: std::fmt::Error,
    },

    /// Two entries of the same section share an id.
    #[error("[MESSAGE]:Duplicate id [SECTION]:{section} [ID]:{id:#06x} [NAMES]:{first}/{second}")]
    DuplicateId {
        section: &'static str,
        id: u16,
        first: String,
        second: String,
    },

    /// Two entries of the same section share a name.
    #[error("[MESSAGE]:Duplicate name [SECTION]:{section} [NAME]:{name}")]
    DuplicateName { section: &'static str, name: String },

    /// A name the runtime refers to is absent from the manifest.
    #[error("[MESSAGE]:Missing required entry [SECTION]:{section} [NAME]:{name}")]
    MissingEntry {
        section: &'static str,
        name: &'static str,
    },

    /// Entry name cannot be used as a Rust identifier.
    #[error("[MESSAGE]:Invalid identifier [SECTION]:{section} [NAME]:{name}")]
    InvalidName { section: &'static str, name: String },

    /// Fixed parameter block larger than a response can carry.
    #[error("[MESSAGE]:Fixed parameters too long [COMMAND]:{name} [LEN]:{len} [MAX]:{max}")]
    ParametersTooLong {
        name: String,
        len: usize,
        max: usize,
    },

    /// Parameters given for an action that computes its own.
    #[error("[MESSAGE]:Parameters only allowed with the `fixed` action [COMMAND]:{name}")]
    UnexpectedParameters { name: String },
}
