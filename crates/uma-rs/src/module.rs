//! The C-source module that aggregates generated functions.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::artifact::CompilationArtifact;
use crate::codegen::{command_stream_symbol, generate_source, module_prelude, sanitize_symbol};
use crate::env::dump_source_enabled;
use crate::error::{CodegenError, CodegenResult};
use crate::registry::includes_for;

/// The only persistence format a `SourceModule` supports.
pub const SOURCE_FORMAT: &str = "c";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOptions {
    /// Accelerator target whose registered includes are added to the prelude.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub includes: Vec<String>,
}

impl ModuleOptions {
    pub fn for_target(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            includes: Vec::new(),
        }
    }

    pub fn with_include(mut self, header: impl Into<String>) -> Self {
        self.includes.push(header.into());
        self
    }

    fn resolved_includes(&self) -> Vec<String> {
        let mut includes = self.includes.clone();
        if let Some(target) = self.target.as_deref() {
            includes.extend(includes_for(target));
        }
        includes
    }
}

/// Host-side C module for a set of offloaded functions. The source is built
/// once at construction and never changes afterwards.
#[derive(Debug, Clone)]
pub struct SourceModule {
    artifacts: Vec<CompilationArtifact>,
    blocks: Vec<String>,
    source: String,
}

impl SourceModule {
    pub fn new(artifacts: Vec<CompilationArtifact>) -> CodegenResult<Self> {
        Self::with_options(artifacts, &ModuleOptions::default())
    }

    pub fn with_options(
        artifacts: Vec<CompilationArtifact>,
        options: &ModuleOptions,
    ) -> CodegenResult<Self> {
        check_module_symbols(&artifacts)?;

        let blocks = artifacts
            .iter()
            .map(generate_source)
            .collect::<CodegenResult<Vec<_>>>()?;

        let mut source = module_prelude(&options.resolved_includes());
        source.push('\n');
        for block in &blocks {
            source.push_str(block);
            source.push('\n');
        }

        debug!(
            "built C source module with {} function(s), {} bytes",
            artifacts.len(),
            source.len()
        );
        if dump_source_enabled() {
            debug!("generated module source:\n{source}");
        }

        Ok(Self {
            artifacts,
            blocks,
            source,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn format(&self) -> &'static str {
        SOURCE_FORMAT
    }

    pub fn type_key(&self) -> &'static str {
        SOURCE_FORMAT
    }

    /// Writes the source to `path`, replacing any existing content. Any
    /// `format` other than `"c"` fails before the file is opened.
    pub fn save<P: AsRef<Path>>(&self, path: P, format: &str) -> CodegenResult<()> {
        if format != SOURCE_FORMAT {
            return Err(CodegenError::UnsupportedFormat {
                format: format.to_string(),
            });
        }
        let path = path.as_ref();
        let result = self.write_source(path);
        match &result {
            Ok(()) => info!(
                "saved C source module ({} bytes) to {}",
                self.source.len(),
                path.display()
            ),
            Err(err) => warn!("failed to save C source module to {}: {err}", path.display()),
        }
        result
    }

    fn write_source(&self, path: &Path) -> CodegenResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(self.source.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Sanitized symbols of all functions, in artifact order.
    pub fn function_names(&self) -> Vec<String> {
        self.artifacts
            .iter()
            .map(|artifact| sanitize_symbol(artifact.function_name()))
            .collect()
    }

    /// Looks `name` up among the artifacts' original (unsanitized) names.
    pub fn has_function(&self, name: &str) -> bool {
        self.artifacts
            .iter()
            .any(|artifact| artifact.function_name() == name)
    }

    /// Generated block for the artifact originally named `name`.
    pub fn function_source(&self, name: &str) -> Option<&str> {
        self.artifacts
            .iter()
            .position(|artifact| artifact.function_name() == name)
            .map(|idx| self.blocks[idx].as_str())
    }

    /// The module is plain C and needs no further translation before linking.
    pub fn is_directly_linkable(&self) -> bool {
        true
    }

    pub fn artifacts(&self) -> &[CompilationArtifact] {
        &self.artifacts
    }
}

/// Every function symbol and stream array must be defined exactly once across
/// the whole translation unit.
fn check_module_symbols(artifacts: &[CompilationArtifact]) -> CodegenResult<()> {
    let mut functions = HashSet::new();
    for artifact in artifacts {
        if !functions.insert(sanitize_symbol(artifact.function_name())) {
            return Err(CodegenError::DuplicateFunction {
                function: artifact.function_name().to_string(),
            });
        }
    }
    for artifact in artifacts {
        let array = command_stream_symbol(artifact.function_name());
        if functions.contains(&array) {
            return Err(CodegenError::SymbolCollision {
                function: artifact.function_name().to_string(),
                symbol: array,
            });
        }
    }
    Ok(())
}
