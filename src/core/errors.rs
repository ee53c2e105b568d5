/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 *
 * Engine commands never fail: unknown ids surface as `None`/`false` and
 * interval adjustments clamp. Errors only exist at construction boundaries
 * (allocator ranges, environment configuration) and in the binary.
 */

use super::types::Bytes;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resource allocator contract violations, raised when the allocator is built
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum AllocatorError {
    #[error("Memory lower bound must be positive")]
    #[diagnostic(
        code(allocator::zero_memory),
        help("Every simulated process must receive at least one byte. Raise the minimum.")
    )]
    ZeroMemory,

    #[error("Invalid memory range: min {min} > max {max}")]
    #[diagnostic(
        code(allocator::invalid_range),
        help("The lower bound of the memory draw must not exceed the upper bound.")
    )]
    InvalidRange { min: Bytes, max: Bytes },

    #[error("Thread count {0} outside 1..=5")]
    #[diagnostic(
        code(allocator::invalid_thread_count),
        help("Simulated processes carry between one and five threads.")
    )]
    InvalidThreadCount(u8),

    #[error("Scripted allocator needs at least one allocation")]
    #[diagnostic(code(allocator::empty_script))]
    EmptyScript,
}

/// Configuration errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: {reason}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Unset the variable to use the default, or provide a valid number.")
    )]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },

    #[error("Invalid resource configuration: {0}")]
    #[diagnostic(transparent)]
    Allocator(#[from] AllocatorError),
}

/// Unified error type for the binary, with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Allocator error: {0}")]
    #[diagnostic(transparent)]
    Allocator(#[from] AllocatorError),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(kernel::io_error),
        help("Signal handling or output failed. Check the terminal the simulator runs in.")
    )]
    Io(String),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(kernel::serialization_error))]
    Serialization(String),
}

impl From<std::io::Error> for KernelError {
    fn from(err: std::io::Error) -> Self {
        KernelError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for KernelError {
    fn from(err: serde_json::Error) -> Self {
        KernelError::Serialization(err.to_string())
    }
}

/// Common result type for fallible setup operations
pub type KernelResult<T> = Result<T, KernelError>;
