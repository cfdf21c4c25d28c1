//! Configuration system
//!
//! File-backed configuration for the renderer. Files are read and written as
//! TOML or RON depending on their extension.

use std::path::{Path, PathBuf};

pub use serde::{Serialize, Deserialize};

use crate::render::BuiltinPipeline;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::parse(path, &contents)
    }

    /// Parse configuration text, choosing the format from `path`'s extension
    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Shader sources for one builtin pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineShaders {
    /// Pipeline this entry configures
    pub pipeline: BuiltinPipeline,
    /// Path to the vertex shader SPIR-V file, relative to the shader root
    pub vertex_shader_path: PathBuf,
    /// Path to the fragment shader SPIR-V file, relative to the shader root
    pub fragment_shader_path: PathBuf,
}

impl PipelineShaders {
    /// Create a new shader entry
    pub fn new(
        pipeline: BuiltinPipeline,
        vertex_path: impl Into<PathBuf>,
        fragment_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pipeline,
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }
}

/// # Renderer Configuration
///
/// Where shaders live, which builtin pipelines get registered, and the
/// default log filter for applications that do not set `RUST_LOG`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Root directory the resource loader resolves shader paths against
    pub shader_root: PathBuf,
    /// Builtin pipelines to register, with their shader sources
    pub pipelines: Vec<PipelineShaders>,
    /// `env_logger` filter string
    pub log_filter: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            shader_root: PathBuf::from("."),
            pipelines: BuiltinPipeline::ALL
                .iter()
                .map(|id| id.default_shaders())
                .collect(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config for RendererConfig {}

impl RendererConfig {
    /// Shader entry for `pipeline`, if configured
    pub fn shaders_for(&self, pipeline: BuiltinPipeline) -> Option<&PipelineShaders> {
        self.pipelines.iter().find(|entry| entry.pipeline == pipeline)
    }
}
