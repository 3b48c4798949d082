//! Cargo build script: generates the command catalogue, response codes and
//! ECM state ids from the command manifest.

// Re-export the core module from src/core.rs so build_core can reuse it
#[path = "src/core.rs"]
mod core;

mod build_core;
use crate::build_core::{
    conf::*, domain::Manifest, errors::BuildError, gen_commands::run_commands_gen,
};

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

// The catalogue of legacy commands is data, not logic: it lives in a JSON
// manifest and is turned into a sorted static table plus typed enums here.
// The session only ever sees `CommandDescriptor`s (see `src/core.rs`).

//==================================================================================MAIN
fn main() -> Result<(), BuildError> {
    // Tell Cargo to rerun this script whenever one of these files changes.
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/core.rs");
    println!("cargo:rerun-if-changed={}", COMMAND_MANIFEST_PATH);
    println!("cargo:rerun-if-env-changed={}", MANIFEST_PATH_ENV);

    // 1. Pick the manifest.
    // Priority order:
    //   1. BLACKSTAR_ECM_MANIFEST_PATH environment variable (absolute or relative path)
    //   2. Default manifest shipped with the crate
    let default_manifest_path =
        PathBuf::from_str(COMMAND_MANIFEST_PATH).map_err(|_| BuildError::ReadPath {
            path: COMMAND_MANIFEST_PATH,
        })?;

    let user_manifest_path = std::env::var(MANIFEST_PATH_ENV).ok().map(PathBuf::from);

    let manifest_path = match user_manifest_path {
        Some(path) if path.exists() => {
            println!(
                "cargo:warning=Using custom command manifest from {:?}",
                path
            );
            println!("cargo:rerun-if-changed={}", path.display());
            path
        }
        Some(path) => {
            println!(
                "cargo:warning=Custom manifest path specified but file not found: {:?}",
                path
            );
            println!("cargo:warning=Falling back to the default command manifest");
            default_manifest_path
        }
        None => default_manifest_path,
    };

    // 2. Parse it.
    let manifest_string =
        std::fs::read_to_string(&manifest_path).map_err(|e| BuildError::ReadFile {
            path: manifest_path.to_path_buf(),
            source: e,
        })?;
    let manifest: Manifest = serde_json::from_str(&manifest_string)?;

    // 3. Validate and generate.
    let buffer_command_code = run_commands_gen(&manifest)?;

    // 4. Write the generated code into `OUT_DIR`.
    // The `include!` macro in `src/protocol/commands/mod.rs` pulls it in at compile time.
    let out_dir_str = std::env::var("OUT_DIR").map_err(|e| BuildError::OutDirErr { source: e })?;
    let command_file_path = PathBuf::from(out_dir_str).join(OUT_DIR_COMMAND_FILE_NAME);

    fs::write(&command_file_path, &buffer_command_code).map_err(|e| BuildError::WriteFile {
        path: command_file_path,
        source: e,
    })?;

    Ok(())
}
