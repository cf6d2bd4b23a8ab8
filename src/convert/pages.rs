//! Frame extraction and RGB normalization for TIFF containers.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::ColorType;

/// One decoded, RGB-normalized raster frame from a TIFF container.
///
/// Owned by the conversion of a single source file and discarded once the
/// frame has been written into the intermediate PDF.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Zero-based position of the frame within its source file.
    pub index: usize,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Interleaved RGB8 pixel data, `width * height * 3` bytes.
    pub data: Vec<u8>,
}

/// Decode every frame of a TIFF file into RGB8 page images.
///
/// Frames are returned in on-disk order; that order determines final PDF
/// page order and is never re-sorted. Any frame decode failure is fatal to
/// the whole file — there is no partial-page skip.
pub fn decode_frames(path: &Path) -> Result<Vec<PageImage>> {
    let file = File::open(path)?;
    let mut decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| Error::conversion(path, e))?;

    let mut frames = Vec::new();
    loop {
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| Error::conversion(path, e))?;
        let colortype = decoder
            .colortype()
            .map_err(|e| Error::conversion(path, e))?;
        // Paletted frames carry their lookup table in the IFD's ColorMap
        // tag; each frame may have its own.
        let palette = match colortype {
            ColorType::Palette(_) => Some(
                decoder
                    .get_tag_u16_vec(Tag::ColorMap)
                    .map_err(|e| Error::conversion(path, e))?,
            ),
            _ => None,
        };
        let decoded = decoder
            .read_image()
            .map_err(|e| Error::conversion(path, e))?;

        let data = normalize_to_rgb(path, colortype, decoded, palette.as_deref())?;
        frames.push(PageImage {
            index: frames.len(),
            width,
            height,
            data,
        });

        if !decoder.more_images() {
            break;
        }
        decoder
            .next_image()
            .map_err(|e| Error::conversion(path, e))?;
    }

    Ok(frames)
}

/// Normalize one decoded frame to interleaved RGB8.
///
/// The mapping is deterministic for a given input: 16-bit samples keep
/// their high byte, sub-8-bit grayscale is rescaled to full range, alpha
/// is dropped, palette indices are expanded through the frame's color
/// map, CMYK uses the standard multiplicative conversion.
fn normalize_to_rgb(
    path: &Path,
    colortype: ColorType,
    decoded: DecodingResult,
    palette: Option<&[u16]>,
) -> Result<Vec<u8>> {
    let data = match (colortype, decoded) {
        (ColorType::RGB(8), DecodingResult::U8(buf)) => buf,
        (ColorType::RGB(16), DecodingResult::U16(buf)) => {
            buf.iter().map(|&v| (v >> 8) as u8).collect()
        }
        (ColorType::Gray(bits), DecodingResult::U8(buf)) if bits <= 8 => {
            let scale = gray_scale_factor(bits);
            let mut rgb = Vec::with_capacity(buf.len() * 3);
            for &v in &buf {
                let v = v.saturating_mul(scale);
                rgb.extend_from_slice(&[v, v, v]);
            }
            rgb
        }
        (ColorType::Gray(16), DecodingResult::U16(buf)) => {
            let mut rgb = Vec::with_capacity(buf.len() * 3);
            for &v in &buf {
                let v = (v >> 8) as u8;
                rgb.extend_from_slice(&[v, v, v]);
            }
            rgb
        }
        (ColorType::GrayA(8), DecodingResult::U8(buf)) => {
            let mut rgb = Vec::with_capacity(buf.len() / 2 * 3);
            for pixel in buf.chunks_exact(2) {
                rgb.extend_from_slice(&[pixel[0], pixel[0], pixel[0]]);
            }
            rgb
        }
        (ColorType::RGBA(8), DecodingResult::U8(buf)) => {
            let mut rgb = Vec::with_capacity(buf.len() / 4 * 3);
            for pixel in buf.chunks_exact(4) {
                rgb.extend_from_slice(&pixel[..3]);
            }
            rgb
        }
        (ColorType::RGBA(16), DecodingResult::U16(buf)) => {
            let mut rgb = Vec::with_capacity(buf.len() / 4 * 3);
            for pixel in buf.chunks_exact(4) {
                rgb.extend_from_slice(&[
                    (pixel[0] >> 8) as u8,
                    (pixel[1] >> 8) as u8,
                    (pixel[2] >> 8) as u8,
                ]);
            }
            rgb
        }
        (ColorType::Palette(bits), DecodingResult::U8(buf)) if bits <= 8 => {
            let palette = palette
                .ok_or_else(|| Error::conversion(path, "paletted frame without a color map"))?;
            expand_palette(path, &buf, palette)?
        }
        (ColorType::CMYK(8), DecodingResult::U8(buf)) => {
            let mut rgb = Vec::with_capacity(buf.len() / 4 * 3);
            for pixel in buf.chunks_exact(4) {
                rgb.extend_from_slice(&cmyk_to_rgb(pixel[0], pixel[1], pixel[2], pixel[3]));
            }
            rgb
        }
        (other, _) => {
            return Err(Error::conversion(
                path,
                format!("unsupported color type {:?}", other),
            ));
        }
    };
    Ok(data)
}

/// Expand palette indices through a TIFF ColorMap: all red values, then
/// all greens, then all blues, each a 16-bit sample kept at its high byte.
fn expand_palette(path: &Path, indices: &[u8], color_map: &[u16]) -> Result<Vec<u8>> {
    if color_map.is_empty() || color_map.len() % 3 != 0 {
        return Err(Error::conversion(
            path,
            format!("color map has invalid length {}", color_map.len()),
        ));
    }
    let entries = color_map.len() / 3;
    let (reds, rest) = color_map.split_at(entries);
    let (greens, blues) = rest.split_at(entries);

    let mut rgb = Vec::with_capacity(indices.len() * 3);
    for &index in indices {
        let index = index as usize;
        if index >= entries {
            return Err(Error::conversion(
                path,
                format!("palette index {} outside {}-entry color map", index, entries),
            ));
        }
        rgb.extend_from_slice(&[
            (reds[index] >> 8) as u8,
            (greens[index] >> 8) as u8,
            (blues[index] >> 8) as u8,
        ]);
    }
    Ok(rgb)
}

/// Multiplier that expands an n-bit gray sample to full 8-bit range.
fn gray_scale_factor(bits: u8) -> u8 {
    match bits {
        8 => 1,
        bits => (255 / ((1u16 << bits) - 1)) as u8,
    }
}

/// Standard CMYK → RGB conversion: component = (255 - channel) * (255 - k) / 255.
fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> [u8; 3] {
    let k = 255 - k as u32;
    [
        ((255 - c as u32) * k / 255) as u8,
        ((255 - m as u32) * k / 255) as u8,
        ((255 - y as u32) * k / 255) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_scale_factor() {
        assert_eq!(gray_scale_factor(1), 255);
        assert_eq!(gray_scale_factor(2), 85);
        assert_eq!(gray_scale_factor(4), 17);
        assert_eq!(gray_scale_factor(8), 1);
    }

    #[test]
    fn test_cmyk_to_rgb() {
        // No ink at all is white, full key is black.
        assert_eq!(cmyk_to_rgb(0, 0, 0, 0), [255, 255, 255]);
        assert_eq!(cmyk_to_rgb(0, 0, 0, 255), [0, 0, 0]);
        // Pure cyan removes red only.
        assert_eq!(cmyk_to_rgb(255, 0, 0, 0), [0, 255, 255]);
    }

    #[test]
    fn test_normalize_gray_replicates_channels() {
        let path = Path::new("gray.tif");
        let rgb = normalize_to_rgb(
            path,
            ColorType::Gray(8),
            DecodingResult::U8(vec![0, 128, 255]),
            None,
        )
        .unwrap();
        assert_eq!(rgb, vec![0, 0, 0, 128, 128, 128, 255, 255, 255]);
    }

    #[test]
    fn test_normalize_rgba_drops_alpha() {
        let path = Path::new("rgba.tif");
        let rgb = normalize_to_rgb(
            path,
            ColorType::RGBA(8),
            DecodingResult::U8(vec![10, 20, 30, 99, 40, 50, 60, 0]),
            None,
        )
        .unwrap();
        assert_eq!(rgb, vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_normalize_palette_expands_through_color_map() {
        let path = Path::new("paletted.tif");
        // Two-entry map: reds, then greens, then blues, 16-bit samples.
        let color_map = [0xFF00u16, 0x0000, 0x0000, 0xFF00, 0x2000, 0x2000];
        let rgb = normalize_to_rgb(
            path,
            ColorType::Palette(8),
            DecodingResult::U8(vec![0, 1, 0]),
            Some(&color_map),
        )
        .unwrap();
        assert_eq!(rgb, vec![255, 0, 32, 0, 255, 32, 255, 0, 32]);
    }

    #[test]
    fn test_normalize_palette_index_out_of_range() {
        let path = Path::new("paletted.tif");
        let color_map = [0u16; 6];
        let result = normalize_to_rgb(
            path,
            ColorType::Palette(8),
            DecodingResult::U8(vec![2]),
            Some(&color_map),
        );
        assert!(matches!(result, Err(Error::Conversion { .. })));
    }

    #[test]
    fn test_normalize_palette_requires_color_map() {
        let path = Path::new("paletted.tif");
        let result =
            normalize_to_rgb(path, ColorType::Palette(8), DecodingResult::U8(vec![0]), None);
        assert!(matches!(result, Err(Error::Conversion { .. })));
    }

    #[test]
    fn test_normalize_rejects_unsupported() {
        let path = Path::new("ycbcr.tif");
        let result = normalize_to_rgb(
            path,
            ColorType::YCbCr(8),
            DecodingResult::U8(vec![0; 3]),
            None,
        );
        assert!(matches!(result, Err(Error::Conversion { .. })));
    }
}
