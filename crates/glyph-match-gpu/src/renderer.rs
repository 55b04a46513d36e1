//! GPU renderer: normalization and tile matching on wgpu compute shaders.

use glyph_match::{check_sample_count, GlyphArt, GlyphRenderer, Lab, MatchError, PixelMatch, Raster};
use wgpu::util::DeviceExt;

use crate::buffers::{pack_lab, GpuPixelMatch, MatchBuffer, MatchUniforms, NormalizeUniforms};
use crate::device::GpuContext;
use crate::error::GpuError;
use crate::pipeline::{MatchPipeline, NormalizePipeline};

/// GPU counterpart of [`GlyphRenderer`].
///
/// Uploads the palette and atlas once at construction; each [`render`]
/// uploads the samples, dispatches one invocation per pixel, and reads the
/// matches and canvas back. Results equal the CPU renderer's.
///
/// [`render`]: GpuRenderer::render
pub struct GpuRenderer {
    context: GpuContext,
    normalize: NormalizePipeline,
    matcher: MatchPipeline,
    palette: wgpu::Buffer,
    atlas: wgpu::Buffer,
    palette_len: u32,
    glyph_count: u32,
    cell_width: u32,
    cell_height: u32,
    atlas_width: u32,
}

impl GpuRenderer {
    /// Build pipelines for `session`'s metric and upload its palette and atlas.
    pub async fn new(context: GpuContext, session: &GlyphRenderer) -> Result<Self, GpuError> {
        let atlas = session.atlas();
        let atlas_bytes: &[u8] = bytemuck::cast_slice(atlas.raster().pixels());
        context.check_binding_size(atlas_bytes.len() as u64)?;
        let palette_data = pack_lab(session.palette().colors());

        let (normalize, matcher, palette, atlas_buf) = context
            .scoped(|| {
                let device = &context.device;
                let normalize = NormalizePipeline::new(device);
                let matcher = MatchPipeline::new(device, session.distance_metric());
                let palette = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("palette"),
                    contents: bytemuck::cast_slice(&palette_data),
                    usage: wgpu::BufferUsages::STORAGE,
                });
                let atlas_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("atlas"),
                    contents: atlas_bytes,
                    usage: wgpu::BufferUsages::STORAGE,
                });
                (normalize, matcher, palette, atlas_buf)
            })
            .await?;

        tracing::debug!(
            metric = %matcher.metric,
            colors = palette_data.len(),
            atlas_width = atlas.raster().width(),
            atlas_height = atlas.raster().height(),
            "GPU renderer ready"
        );

        Ok(Self {
            normalize,
            matcher,
            palette,
            atlas: atlas_buf,
            palette_len: session.palette().len() as u32,
            glyph_count: atlas.glyphs() as u32,
            cell_width: atlas.cell_width() as u32,
            cell_height: atlas.cell_height() as u32,
            atlas_width: atlas.raster().width() as u32,
            context,
        })
    }

    /// Divide every value by `divisor` on the GPU.
    pub async fn normalize(&self, values: &mut [f32], divisor: f32) -> Result<(), GpuError> {
        if values.is_empty() {
            return Ok(());
        }
        let size = std::mem::size_of_val(values) as u64;
        self.context.check_binding_size(size)?;

        let len = values.len() as u32;
        let (groups_x, groups_y, row_stride) = NormalizePipeline::dispatch_size(len);
        let uniforms = NormalizeUniforms {
            len,
            divisor,
            row_stride,
            _pad: 0,
        };

        let staging = self
            .context
            .scoped(|| {
                let device = &self.context.device;
                let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("normalize_uniforms"),
                    contents: bytemuck::bytes_of(&uniforms),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let values_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("normalize_values"),
                    contents: bytemuck::cast_slice(&*values),
                    usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
                });
                let staging = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("normalize_staging"),
                    size,
                    usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("normalize_bind_group"),
                    layout: &self.normalize.bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform_buf.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: values_buf.as_entire_binding(),
                        },
                    ],
                });

                let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("normalize_encoder"),
                });
                {
                    let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                        label: Some("normalize_pass"),
                        timestamp_writes: None,
                    });
                    pass.set_pipeline(&self.normalize.compute_pipeline);
                    pass.set_bind_group(0, &bind_group, &[]);
                    pass.dispatch_workgroups(groups_x, groups_y, 1);
                }
                encoder.copy_buffer_to_buffer(&values_buf, 0, &staging, 0, size);
                self.context.queue.submit(std::iter::once(encoder.finish()));
                staging
            })
            .await?;

        let result: Vec<f32> = self.read_buffer(&staging).await?;
        values.copy_from_slice(&result);
        Ok(())
    }

    /// Render a row-major grid of Lab samples.
    ///
    /// # Errors
    ///
    /// - [`GpuError::Match`] if `samples.len() != width * height`
    /// - [`GpuError::BufferTooLarge`] if an input or output exceeds the
    ///   device's storage binding limit
    /// - [`GpuError::Validation`] / [`GpuError::OutOfMemory`] if the dispatch
    ///   is rejected by the device
    pub async fn render(
        &self,
        samples: &[Lab],
        width: usize,
        height: usize,
    ) -> Result<GlyphArt, GpuError> {
        check_sample_count(samples.len(), width, height)?;

        let cell_width = self.cell_width as usize;
        let cell_height = self.cell_height as usize;
        let canvas_width = width * cell_width;
        let canvas_height = height * cell_height;

        if samples.is_empty() {
            return Ok(GlyphArt::new(
                width,
                height,
                cell_width,
                cell_height,
                Vec::new(),
                Raster::new(canvas_width, canvas_height),
            ));
        }

        let pixel_count = samples.len();
        let canvas_len = canvas_width * canvas_height;
        let packed = pack_lab(samples);
        let sample_bytes: &[u8] = bytemuck::cast_slice(&packed);
        for bytes in [
            sample_bytes.len() as u64,
            MatchBuffer::matches_size(pixel_count),
            MatchBuffer::canvas_size(canvas_len),
        ] {
            self.context.check_binding_size(bytes)?;
        }

        let uniforms = MatchUniforms {
            width: width as u32,
            height: height as u32,
            palette_len: self.palette_len,
            glyph_count: self.glyph_count,
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            atlas_width: self.atlas_width,
            canvas_width: canvas_width as u32,
        };

        tracing::debug!(width, height, metric = %self.matcher.metric, "dispatching match_tiles");

        let output = self
            .context
            .scoped(|| {
                let device = &self.context.device;
                let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("match_uniforms"),
                    contents: bytemuck::bytes_of(&uniforms),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let samples_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("samples"),
                    contents: sample_bytes,
                    usage: wgpu::BufferUsages::STORAGE,
                });
                let output = MatchBuffer::new(device, pixel_count, canvas_len);

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("match_tiles_bind_group"),
                    layout: &self.matcher.bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform_buf.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: samples_buf.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: self.palette.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 3,
                            resource: self.atlas.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 4,
                            resource: output.matches.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 5,
                            resource: output.canvas.as_entire_binding(),
                        },
                    ],
                });

                let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("match_tiles_encoder"),
                });
                {
                    let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                        label: Some("match_tiles_pass"),
                        timestamp_writes: None,
                    });
                    pass.set_pipeline(&self.matcher.compute_pipeline);
                    pass.set_bind_group(0, &bind_group, &[]);
                    pass.dispatch_workgroups(
                        (width as u32).div_ceil(8),
                        (height as u32).div_ceil(8),
                        1,
                    );
                }
                output.copy_to_staging(&mut encoder);
                self.context.queue.submit(std::iter::once(encoder.finish()));
                output
            })
            .await?;

        let matches: Vec<GpuPixelMatch> = self.read_buffer(&output.staging_matches).await?;
        let pixels: Vec<[u8; 4]> = self.read_buffer(&output.staging_canvas).await?;
        drop(output);

        let matches = matches.into_iter().map(PixelMatch::from).collect();
        let canvas = Raster::from_pixels(canvas_width, canvas_height, pixels).map_err(MatchError::from)?;

        Ok(GlyphArt::new(
            width,
            height,
            cell_width,
            cell_height,
            matches,
            canvas,
        ))
    }

    async fn read_buffer<T: bytemuck::Pod>(&self, buffer: &wgpu::Buffer) -> Result<Vec<T>, GpuError> {
        let slice = buffer.slice(..);

        let (tx, rx) = futures_channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        self.context.device.poll(wgpu::Maintain::Wait);

        rx.await
            .map_err(|_| GpuError::Unavailable("Channel closed".into()))?
            .map_err(GpuError::BufferMap)?;

        let data = {
            let view = slice.get_mapped_range();
            bytemuck::cast_slice(&view).to_vec()
        };
        buffer.unmap();

        Ok(data)
    }
}
