//! Workspace for the build script: manifest structures and code generators.
pub mod conf;
pub mod domain;
pub mod errors;
pub mod gen_commands;
