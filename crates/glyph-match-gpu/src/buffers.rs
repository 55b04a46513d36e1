//! GPU buffer layouts and per-render device buffers.

use bytemuck::{Pod, Zeroable};
use glyph_match::{Lab, PixelMatch};

/// Uniforms for the `match_tiles` kernel.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MatchUniforms {
    pub width: u32,
    pub height: u32,
    pub palette_len: u32,
    pub glyph_count: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub atlas_width: u32,
    pub canvas_width: u32,
}

/// Uniforms for the `normalize` kernel.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct NormalizeUniforms {
    pub len: u32,
    pub divisor: f32,
    /// Invocations per row of the dispatch grid
    pub row_stride: u32,
    pub _pad: u32,
}

/// Device-side [`PixelMatch`]; 20 bytes, matching the WGSL struct.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuPixelMatch {
    pub closest: u32,
    pub second: u32,
    pub glyph: u32,
    pub d1: f32,
    pub d2: f32,
}

impl From<GpuPixelMatch> for PixelMatch {
    fn from(m: GpuPixelMatch) -> Self {
        PixelMatch {
            closest: m.closest as usize,
            second: m.second as usize,
            glyph: m.glyph as usize,
            d1: m.d1,
            d2: m.d2,
        }
    }
}

/// Pack Lab samples as `vec4<f32>` (alpha lane unused).
pub fn pack_lab(colors: &[Lab]) -> Vec<[f32; 4]> {
    colors.iter().map(|c| [c.l, c.a, c.b, 0.0]).collect()
}

/// Output buffers of a single `match_tiles` dispatch.
///
/// Holds the per-pixel match records, the canvas, and their mappable staging
/// copies. The device memory is destroyed when the value is dropped, so it
/// is released on every exit path of a render, including early errors.
pub struct MatchBuffer {
    pub matches: wgpu::Buffer,
    pub canvas: wgpu::Buffer,
    pub staging_matches: wgpu::Buffer,
    pub staging_canvas: wgpu::Buffer,
    pixel_count: usize,
    canvas_len: usize,
}

impl MatchBuffer {
    pub fn new(device: &wgpu::Device, pixel_count: usize, canvas_len: usize) -> Self {
        let matches_size = Self::matches_size(pixel_count);
        let canvas_size = Self::canvas_size(canvas_len);

        let storage = |label, size| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        };
        let staging = |label, size| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        Self {
            matches: storage("matches", matches_size),
            canvas: storage("canvas", canvas_size),
            staging_matches: staging("staging_matches", matches_size),
            staging_canvas: staging("staging_canvas", canvas_size),
            pixel_count,
            canvas_len,
        }
    }

    pub fn matches_size(pixel_count: usize) -> u64 {
        (pixel_count * std::mem::size_of::<GpuPixelMatch>()) as u64
    }

    pub fn canvas_size(canvas_len: usize) -> u64 {
        (canvas_len * std::mem::size_of::<u32>()) as u64
    }

    /// Record copies from the storage buffers into the staging buffers.
    pub fn copy_to_staging(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_buffer_to_buffer(
            &self.matches,
            0,
            &self.staging_matches,
            0,
            Self::matches_size(self.pixel_count),
        );
        encoder.copy_buffer_to_buffer(
            &self.canvas,
            0,
            &self.staging_canvas,
            0,
            Self::canvas_size(self.canvas_len),
        );
    }
}

impl Drop for MatchBuffer {
    fn drop(&mut self) {
        self.matches.destroy();
        self.canvas.destroy();
        self.staging_matches.destroy();
        self.staging_canvas.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layouts() {
        assert_eq!(std::mem::size_of::<MatchUniforms>(), 32);
        assert_eq!(std::mem::size_of::<NormalizeUniforms>(), 16);
        assert_eq!(std::mem::size_of::<GpuPixelMatch>(), 20);
    }

    #[test]
    fn test_gpu_pixel_match_into_core() {
        let m: PixelMatch = GpuPixelMatch {
            closest: 2,
            second: 0,
            glyph: 5,
            d1: 1.5,
            d2: 3.0,
        }
        .into();
        assert_eq!(
            m,
            PixelMatch {
                closest: 2,
                second: 0,
                glyph: 5,
                d1: 1.5,
                d2: 3.0
            }
        );
    }

    #[test]
    fn test_pack_lab() {
        let packed = pack_lab(&[Lab::new(50.0, -10.0, 20.0)]);
        assert_eq!(packed, vec![[50.0, -10.0, 20.0, 0.0]]);
    }

    #[test]
    fn test_buffer_sizes_are_copy_aligned() {
        for n in [1, 3, 7, 1000] {
            assert_eq!(MatchBuffer::matches_size(n) % wgpu::COPY_BUFFER_ALIGNMENT, 0);
            assert_eq!(MatchBuffer::canvas_size(n) % wgpu::COPY_BUFFER_ALIGNMENT, 0);
        }
    }
}
