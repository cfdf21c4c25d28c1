//! Vulkan error types

use std::path::PathBuf;

use ash::vk;

/// Vulkan-specific error types
#[derive(thiserror::Error, Debug)]
pub enum VulkanError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// Object creation failed for a reason other than an API result code
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// A resource needed during initialization could not be read
    #[error("Failed to load resource {path}: {source}")]
    ResourceLoad {
        /// Path handed to the resource loader
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Invalid operation attempted
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Description of why the operation is invalid
        reason: String,
    },

    /// No suitable memory type found for allocation
    #[error("No suitable memory type found")]
    NoSuitableMemoryType,
}

impl VulkanError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidOperation { reason: reason.into() }
    }
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;
