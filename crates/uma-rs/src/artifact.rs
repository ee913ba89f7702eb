//! Compilation artifacts handed over by the upstream lowering passes.
//!
//! An artifact describes one offloaded subgraph: the symbol to emit, the opaque
//! accelerator command stream, the quantization parameters, and the buffer
//! roles the generated function takes as parameters.

use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult};

pub const ARTIFACT_MANIFEST_VERSION: u32 = 1;

/// Symbol names of the three buffers the generated function accepts, in
/// parameter order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferRoles {
    pub input: String,
    pub weight: String,
    pub output: String,
}

impl BufferRoles {
    pub fn new(
        input: impl Into<String>,
        weight: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            weight: weight.into(),
            output: output.into(),
        }
    }

    pub fn as_array(&self) -> [&str; 3] {
        [&self.input, &self.weight, &self.output]
    }
}

/// Affine quantization offsets of the two quantized operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ZeroPoints {
    pub input: i32,
    pub weight: i32,
}

impl ZeroPoints {
    pub fn new(input: i32, weight: i32) -> Self {
        Self { input, weight }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ArtifactRepr")]
pub struct CompilationArtifact {
    function_name: String,
    command_stream: Vec<i32>,
    zero_points: ZeroPoints,
    scale: f64,
    buffers: BufferRoles,
}

#[derive(Deserialize)]
struct ArtifactRepr {
    function_name: String,
    command_stream: Vec<i32>,
    zero_points: ZeroPoints,
    #[serde(default)]
    scale: f64,
    buffers: BufferRoles,
}

impl TryFrom<ArtifactRepr> for CompilationArtifact {
    type Error = CodegenError;

    fn try_from(repr: ArtifactRepr) -> Result<Self, Self::Error> {
        CompilationArtifact::new(
            repr.function_name,
            repr.command_stream,
            repr.zero_points,
            repr.scale,
            repr.buffers,
        )
    }
}

impl CompilationArtifact {
    pub fn new(
        function_name: impl Into<String>,
        command_stream: Vec<i32>,
        zero_points: ZeroPoints,
        scale: f64,
        buffers: BufferRoles,
    ) -> CodegenResult<Self> {
        let function_name = function_name.into();
        if function_name.is_empty() {
            return Err(CodegenError::EmptyFunctionName);
        }
        if command_stream.is_empty() {
            return Err(CodegenError::EmptyCommandStream {
                function: function_name,
            });
        }
        // JSON has no NaN or infinity, so such a scale could not be reloaded.
        if !scale.is_finite() {
            return Err(CodegenError::NonFiniteScale {
                function: function_name,
                scale,
            });
        }
        Ok(Self {
            function_name,
            command_stream,
            zero_points,
            scale,
            buffers,
        })
    }

    /// Builds an artifact from the positional layout the lowering passes
    /// produce: `base_addresses` is `[input, weight, output]` and
    /// `zero_points` starts with `[input, weight]`. Trailing zero points (an
    /// output offset, for instance) are accepted and dropped.
    pub fn from_parts(
        function_name: impl Into<String>,
        command_stream: Vec<i32>,
        zero_points: Vec<i32>,
        scale: f64,
        base_addresses: Vec<String>,
    ) -> CodegenResult<Self> {
        let function_name = function_name.into();
        let [input, weight, output]: [String; 3] =
            base_addresses.try_into().map_err(|rest: Vec<String>| {
                CodegenError::BaseAddressCount {
                    function: function_name.clone(),
                    found: rest.len(),
                }
            })?;
        let zero_points = match zero_points.as_slice() {
            [input, weight, ..] => ZeroPoints::new(*input, *weight),
            _ => {
                return Err(CodegenError::ZeroPointCount {
                    function: function_name,
                    found: zero_points.len(),
                })
            }
        };
        Self::new(
            function_name,
            command_stream,
            zero_points,
            scale,
            BufferRoles {
                input,
                weight,
                output,
            },
        )
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn command_stream(&self) -> &[i32] {
        &self.command_stream
    }

    pub fn zero_points(&self) -> ZeroPoints {
        self.zero_points
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn buffers(&self) -> &BufferRoles {
        &self.buffers
    }
}

impl PartialEq for CompilationArtifact {
    fn eq(&self, other: &Self) -> bool {
        self.function_name == other.function_name
            && self.command_stream == other.command_stream
            && self.zero_points == other.zero_points
            && self.scale.to_bits() == other.scale.to_bits()
            && self.buffers == other.buffers
    }
}

impl Eq for CompilationArtifact {}

impl Hash for CompilationArtifact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.function_name.hash(state);
        self.command_stream.hash(state);
        self.zero_points.hash(state);
        self.scale.to_bits().hash(state);
        self.buffers.hash(state);
    }
}

impl fmt::Display for CompilationArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CompilationArtifact(")?;
        writeln!(f, "  function_name={},", self.function_name)?;
        writeln!(f, "  command_stream={:?},", self.command_stream)?;
        writeln!(
            f,
            "  zero_points=[{}, {}],",
            self.zero_points.input, self.zero_points.weight
        )?;
        writeln!(f, "  scale={},", self.scale)?;
        let [input, weight, output] = self.buffers.as_array();
        write!(f, "  base_addresses=[{input}, {weight}, {output}])")
    }
}

/// A versioned list of artifacts, the on-disk handover format between the
/// lowering passes and code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    #[serde(default = "default_manifest_version")]
    pub manifest_version: u32,
    pub artifacts: Vec<CompilationArtifact>,
}

fn default_manifest_version() -> u32 {
    ARTIFACT_MANIFEST_VERSION
}

impl ArtifactManifest {
    pub fn new(artifacts: Vec<CompilationArtifact>) -> Self {
        Self {
            manifest_version: ARTIFACT_MANIFEST_VERSION,
            artifacts,
        }
    }

    pub fn to_json_string(&self) -> CodegenResult<String> {
        serde_json::to_string_pretty(self).map_err(CodegenError::from)
    }

    pub fn from_json_str(src: &str) -> CodegenResult<Self> {
        let manifest: ArtifactManifest = serde_json::from_str(src)?;
        if manifest.manifest_version != ARTIFACT_MANIFEST_VERSION {
            return Err(CodegenError::ManifestVersionMismatch {
                found: manifest.manifest_version,
                expected: ARTIFACT_MANIFEST_VERSION,
            });
        }
        Ok(manifest)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> CodegenResult<()> {
        let contents = self.to_json_string()?;
        fs::write(path, contents).map_err(CodegenError::from)
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> CodegenResult<Self> {
        let contents = fs::read_to_string(path)?;
        ArtifactManifest::from_json_str(&contents)
    }
}
