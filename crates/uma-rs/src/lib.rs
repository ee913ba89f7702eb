//! C-source backend for accelerator offload.
//!
//! Takes the compilation artifacts produced for offloaded subgraphs and emits a
//! directly linkable C module that drives the accelerator through the
//! `DeviceCfg` / `DeviceRun` pair.

pub mod artifact;
pub mod codegen;
pub mod command_stream;
mod env;
pub mod error;
pub mod module;
pub mod registry;

pub use artifact::{ArtifactManifest, BufferRoles, CompilationArtifact, ZeroPoints};
pub use codegen::{extract_command_stream, generate_source, sanitize_symbol};
pub use error::{CodegenError, CodegenResult};
pub use module::{ModuleOptions, SourceModule, SOURCE_FORMAT};
