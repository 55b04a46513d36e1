//! Compute pipelines for normalization and tile matching.

use std::collections::HashMap;

use glyph_match::DistanceMetric;

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Value of the `METRIC` override constant in `match_tiles.wgsl`.
fn metric_constant(metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Cie76 => 0.0,
        DistanceMetric::Cie94 => 1.0,
    }
}

/// Pipeline for the `match_tiles` kernel, specialized to one metric.
pub struct MatchPipeline {
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub compute_pipeline: wgpu::ComputePipeline,
    pub metric: DistanceMetric,
}

impl MatchPipeline {
    pub fn new(device: &wgpu::Device, metric: DistanceMetric) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!("shaders/match_tiles.wgsl"));

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("match_tiles_bind_group_layout"),
            entries: &[
                uniform_entry(0),
                storage_entry(1, true),  // samples
                storage_entry(2, true),  // palette
                storage_entry(3, true),  // atlas
                storage_entry(4, false), // matches
                storage_entry(5, false), // canvas
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("match_tiles_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let constants = HashMap::from([("METRIC".to_string(), metric_constant(metric))]);
        let compute_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("match_tiles_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions {
                constants: &constants,
                ..Default::default()
            },
            cache: None,
        });

        Self {
            bind_group_layout,
            compute_pipeline,
            metric,
        }
    }
}

/// Pipeline for the `normalize` kernel.
pub struct NormalizePipeline {
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub compute_pipeline: wgpu::ComputePipeline,
}

impl NormalizePipeline {
    pub const WORKGROUP_SIZE: u32 = 256;

    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!("shaders/normalize.wgsl"));

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("normalize_bind_group_layout"),
            entries: &[uniform_entry(0), storage_entry(1, false)],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("normalize_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let compute_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("normalize_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            bind_group_layout,
            compute_pipeline,
        }
    }

    /// Workgroup grid covering `len` elements: `(x, y, row_stride)`.
    ///
    /// A single dispatch dimension is capped at 65535 workgroups, so long
    /// inputs wrap onto further grid rows.
    pub fn dispatch_size(len: u32) -> (u32, u32, u32) {
        const MAX_GROUPS: u32 = 65_535;
        let groups = len.div_ceil(Self::WORKGROUP_SIZE).max(1);
        let x = groups.min(MAX_GROUPS);
        let y = groups.div_ceil(x);
        (x, y, x * Self::WORKGROUP_SIZE)
    }
}
