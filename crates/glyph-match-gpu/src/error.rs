//! GPU error types.

use glyph_match::MatchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("No GPU adapter found")]
    NoAdapter,

    #[error("Failed to create device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("Buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("GPU validation error: {0}")]
    Validation(String),

    #[error("GPU out of memory: {0}")]
    OutOfMemory(String),

    #[error("Buffer of {bytes} bytes exceeds device limit of {limit} bytes")]
    BufferTooLarge { bytes: u64, limit: u64 },

    #[error("GPU unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Match(#[from] MatchError),
}
