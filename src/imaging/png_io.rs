use crate::error::ImageError;
use glyph_match::Raster;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// A decoded PNG expanded to RGBA8.
#[derive(Debug, Clone)]
pub struct LoadedPng {
    pub raster: Raster,
    /// The file carried an alpha channel or a transparency chunk
    pub has_alpha: bool,
}

/// Decode a PNG file.
pub fn load_png(path: &Path) -> Result<LoadedPng, ImageError> {
    let file = std::fs::File::open(path).map_err(|e| ImageError::io(path, e))?;
    let loaded = decode_png(BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        width = loaded.raster.width(),
        height = loaded.raster.height(),
        has_alpha = loaded.has_alpha,
        "Decoded PNG"
    );
    Ok(loaded)
}

/// Decode PNG data of any color type and bit depth into RGBA8.
///
/// Palette and low-bit-depth images are expanded, 16-bit channels stripped.
pub fn decode_png<R: Read>(reader: R) -> Result<LoadedPng, ImageError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::Unsupported {
            color_type: info.color_type,
            bit_depth: info.bit_depth,
        });
    }

    let (pixels, has_alpha): (Vec<[u8; 4]>, bool) = match info.color_type {
        png::ColorType::Rgba => (
            data.chunks_exact(4)
                .map(|p| [p[0], p[1], p[2], p[3]])
                .collect(),
            true,
        ),
        png::ColorType::Rgb => (
            data.chunks_exact(3)
                .map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            false,
        ),
        png::ColorType::GrayscaleAlpha => (
            data.chunks_exact(2)
                .map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            true,
        ),
        png::ColorType::Grayscale => (data.iter().map(|&v| [v, v, v, 255]).collect(), false),
        color_type => {
            return Err(ImageError::Unsupported {
                color_type,
                bit_depth: info.bit_depth,
            })
        }
    };

    let raster = Raster::from_pixels(info.width as usize, info.height as usize, pixels).map_err(
        |_| ImageError::Unsupported {
            color_type: info.color_type,
            bit_depth: info.bit_depth,
        },
    )?;

    Ok(LoadedPng { raster, has_alpha })
}

/// Encode a raster as an 8-bit RGB or RGBA PNG.
pub fn encode_png(raster: &Raster, with_alpha: bool) -> Result<Vec<u8>, ImageError> {
    let (color_type, data): (png::ColorType, Vec<u8>) = if with_alpha {
        (
            png::ColorType::Rgba,
            raster.pixels().iter().flatten().copied().collect(),
        )
    } else {
        (
            png::ColorType::Rgb,
            raster
                .pixels()
                .iter()
                .flat_map(|&[r, g, b, _]| [r, g, b])
                .collect(),
        )
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder =
            png::Encoder::new(&mut buf, raster.width() as u32, raster.height() as u32);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
        writer.finish()?;
    }
    Ok(buf.into_inner())
}

/// Write `bytes` to a sibling `.tmp` file, then rename it over `path`.
///
/// Readers of `path` see either the old file or the complete new one.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ImageError> {
    write_all_atomic(&[(path, bytes)])
}

/// Write several files so that none is replaced unless all were written.
///
/// Every file goes to its `.tmp` sibling first; the renames start only once
/// all of those writes succeeded. On a write error the temporaries are
/// removed and no target is touched.
pub fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<(), ImageError> {
    let tmps: Vec<PathBuf> = files.iter().map(|(path, _)| tmp_path(path)).collect();

    for (i, (_, bytes)) in files.iter().enumerate() {
        if let Err(e) = std::fs::write(&tmps[i], bytes) {
            remove_all(&tmps[..=i]);
            return Err(ImageError::io(&tmps[i], e));
        }
    }

    for (i, (path, _)) in files.iter().enumerate() {
        if let Err(e) = std::fs::rename(&tmps[i], path) {
            remove_all(&tmps[i..]);
            return Err(ImageError::io(path, e));
        }
    }
    Ok(())
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        let _ = std::fs::remove_file(path);
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_raw(width: u32, height: u32, color: png::ColorType, depth: png::BitDepth, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buf
    }

    #[test]
    fn test_decode_rgb() {
        let bytes = encode_raw(2, 1, png::ColorType::Rgb, png::BitDepth::Eight, &[1, 2, 3, 4, 5, 6]);
        let loaded = decode_png(bytes.as_slice()).unwrap();
        assert!(!loaded.has_alpha);
        assert_eq!(loaded.raster.pixels(), &[[1, 2, 3, 255], [4, 5, 6, 255]]);
    }

    #[test]
    fn test_decode_grayscale_alpha() {
        let bytes = encode_raw(1, 1, png::ColorType::GrayscaleAlpha, png::BitDepth::Eight, &[200, 100]);
        let loaded = decode_png(bytes.as_slice()).unwrap();
        assert!(loaded.has_alpha);
        assert_eq!(loaded.raster.pixels(), &[[200, 200, 200, 100]]);
    }

    #[test]
    fn test_decode_16bit_is_stripped() {
        let bytes = encode_raw(1, 1, png::ColorType::Rgb, png::BitDepth::Sixteen, &[0xAB, 0xCD, 0x12, 0x34, 0xFF, 0xFF]);
        let loaded = decode_png(bytes.as_slice()).unwrap();
        assert_eq!(loaded.raster.pixels(), &[[0xAB, 0x12, 0xFF, 255]]);
    }

    #[test]
    fn test_decode_one_bit_grayscale_expands() {
        // 0b1010_0000: pixels white, black, white, black
        let bytes = encode_raw(4, 1, png::ColorType::Grayscale, png::BitDepth::One, &[0b1010_0000]);
        let loaded = decode_png(bytes.as_slice()).unwrap();
        assert_eq!(
            loaded.raster.pixels(),
            &[[255, 255, 255, 255], [0, 0, 0, 255], [255, 255, 255, 255], [0, 0, 0, 255]]
        );
    }

    #[test]
    fn test_decode_garbage_is_error() {
        let result = decode_png(&b"not a png"[..]);
        assert!(matches!(result, Err(ImageError::PngDecode(_))));
    }

    #[test]
    fn test_encode_then_decode_rgb_drops_alpha() {
        let raster = Raster::from_pixels(2, 1, vec![[10, 20, 30, 40], [50, 60, 70, 80]]).unwrap();
        let bytes = encode_png(&raster, false).unwrap();
        let loaded = decode_png(bytes.as_slice()).unwrap();
        assert!(!loaded.has_alpha);
        assert_eq!(loaded.raster.pixels(), &[[10, 20, 30, 255], [50, 60, 70, 255]]);
    }

    #[test]
    fn test_encode_rgba_keeps_alpha() {
        let raster = Raster::from_pixels(1, 2, vec![[1, 2, 3, 4], [5, 6, 7, 8]]).unwrap();
        let bytes = encode_png(&raster, true).unwrap();
        let loaded = decode_png(bytes.as_slice()).unwrap();
        assert!(loaded.has_alpha);
        assert_eq!(loaded.raster, raster);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_png(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(ImageError::Io { .. })));
    }

    #[test]
    fn test_write_atomic_replaces_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        assert!(!dir.path().join("out.png.tmp").exists());
    }

    #[test]
    fn test_write_atomic_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.png");
        assert!(matches!(write_atomic(&path, b"x"), Err(ImageError::Io { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_all_atomic_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("out.png");
        let txt = dir.path().join("out.txt");
        std::fs::write(&txt, b"old").unwrap();

        write_all_atomic(&[(png.as_path(), &b"image"[..]), (txt.as_path(), &b"text"[..])]).unwrap();

        assert_eq!(std::fs::read(&png).unwrap(), b"image");
        assert_eq!(std::fs::read(&txt).unwrap(), b"text");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_write_all_atomic_failure_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("out.png");
        let txt = dir.path().join("no-such-dir").join("out.txt");

        let result = write_all_atomic(&[(png.as_path(), &b"image"[..]), (txt.as_path(), &b"text"[..])]);

        assert!(matches!(result, Err(ImageError::Io { .. })));
        assert!(!png.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
