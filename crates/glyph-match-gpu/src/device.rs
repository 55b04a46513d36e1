//! GPU device initialization and capability detection.

use crate::error::GpuError;

/// Holds the wgpu device and queue.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

/// Result of GPU initialization attempt.
pub enum GpuAvailability {
    Available(GpuContext),
    Unavailable(String),
}

impl GpuContext {
    /// Attempt to initialize GPU. Returns Unavailable on any failure.
    pub async fn try_init() -> GpuAvailability {
        match Self::init().await {
            Ok(ctx) => GpuAvailability::Available(ctx),
            Err(e) => {
                tracing::warn!(error = %e, "GPU initialization failed");
                GpuAvailability::Unavailable(e.to_string())
            }
        }
    }

    /// Initialize the GPU, reporting why it failed.
    pub async fn init() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        tracing::info!(
            adapter = %info.name,
            backend = ?info.backend,
            device_type = ?info.device_type,
            "GPU adapter selected"
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("glyph-match"),
                    required_features: wgpu::Features::empty(),
                    // Storage buffers in compute shaders need the adapter's full limits.
                    required_limits: adapter.limits(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        Ok(Self { device, queue })
    }

    /// Largest buffer that can be bound as one storage binding.
    pub fn max_binding_size(&self) -> u64 {
        let limits = self.device.limits();
        u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size)
    }

    /// Fail with [`GpuError::BufferTooLarge`] if `bytes` cannot be bound.
    pub fn check_binding_size(&self, bytes: u64) -> Result<(), GpuError> {
        let limit = self.max_binding_size();
        if bytes > limit {
            return Err(GpuError::BufferTooLarge { bytes, limit });
        }
        Ok(())
    }

    /// Run `f` inside validation and out-of-memory error scopes.
    ///
    /// Errors raised by wgpu calls inside `f` are returned as
    /// [`GpuError::Validation`] or [`GpuError::OutOfMemory`] instead of
    /// reaching the device's uncaptured-error handler.
    pub async fn scoped<T>(&self, f: impl FnOnce() -> T) -> Result<T, GpuError> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let value = f();

        let validation = self.device.pop_error_scope().await;
        let oom = self.device.pop_error_scope().await;

        if let Some(err) = validation {
            return Err(GpuError::Validation(err.to_string()));
        }
        if let Some(err) = oom {
            return Err(GpuError::OutOfMemory(err.to_string()));
        }
        Ok(value)
    }
}
