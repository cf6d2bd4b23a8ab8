#![allow(dead_code)]
//! Shared fixture helpers: TIFF generation and merged-page inspection.

use std::fs::File;
use std::path::Path;

use lopdf::Document;
use tiff::encoder::{colortype, TiffEncoder};

/// Write a TIFF with one solid-color RGB frame per entry in `frames`.
pub fn write_tiff(path: &Path, frames: &[(u8, u8, u8)], width: u32, height: u32) {
    let file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    for &(r, g, b) in frames {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[r, g, b]);
        }
        encoder
            .write_image::<colortype::RGB8>(width, height, &data)
            .unwrap();
    }
}

/// Write a single-frame 8-bit grayscale TIFF filled with `value`.
pub fn write_gray_tiff(path: &Path, value: u8, width: u32, height: u32) {
    let file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    let data = vec![value; (width * height) as usize];
    encoder
        .write_image::<colortype::Gray8>(width, height, &data)
        .unwrap();
}

/// Write a minimal uncompressed 2x2 paletted TIFF (one strip, 8-bit
/// indices, 256-entry ColorMap). Pixels resolve, after high-byte
/// truncation, to red, green, blue, and (32, 32, 32) in that order.
pub fn write_palette_tiff(path: &Path) {
    fn entry(buf: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: u32) {
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(&field_type.to_le_bytes());
        buf.extend_from_slice(&count.to_le_bytes());
        buf.extend_from_slice(&value.to_le_bytes());
    }

    const SHORT: u16 = 3;
    const LONG: u16 = 4;
    // Header (8) + entry count (2) + 9 entries (108) + next-IFD offset (4).
    const STRIP_OFFSET: u32 = 122;
    const COLOR_MAP_OFFSET: u32 = 126;

    let mut buf = Vec::new();
    buf.extend_from_slice(b"II\x2a\x00");
    buf.extend_from_slice(&8u32.to_le_bytes());

    buf.extend_from_slice(&9u16.to_le_bytes());
    entry(&mut buf, 256, SHORT, 1, 2); // ImageWidth
    entry(&mut buf, 257, SHORT, 1, 2); // ImageLength
    entry(&mut buf, 258, SHORT, 1, 8); // BitsPerSample
    entry(&mut buf, 259, SHORT, 1, 1); // Compression: none
    entry(&mut buf, 262, SHORT, 1, 3); // PhotometricInterpretation: palette
    entry(&mut buf, 273, LONG, 1, STRIP_OFFSET); // StripOffsets
    entry(&mut buf, 278, SHORT, 1, 2); // RowsPerStrip
    entry(&mut buf, 279, LONG, 1, 4); // StripByteCounts
    entry(&mut buf, 320, SHORT, 768, COLOR_MAP_OFFSET); // ColorMap
    buf.extend_from_slice(&0u32.to_le_bytes());

    // One palette index per pixel.
    buf.extend_from_slice(&[0, 1, 2, 3]);

    // ColorMap: 256 reds, 256 greens, 256 blues, 16-bit samples.
    let mut color_map = [0u16; 768];
    color_map[0] = 0xFF00; // red component of index 0
    color_map[256 + 1] = 0xFF00; // green component of index 1
    color_map[512 + 2] = 0xFF00; // blue component of index 2
    color_map[3] = 0x2000;
    color_map[256 + 3] = 0x2000;
    color_map[512 + 3] = 0x2000;
    for value in color_map {
        buf.extend_from_slice(&value.to_le_bytes());
    }

    std::fs::write(path, buf).unwrap();
}

/// Write a file that carries a little-endian TIFF signature but no valid
/// container behind it: decoding must fail while the signature check passes.
pub fn write_signed_garbage(path: &Path) {
    std::fs::write(path, b"II\x2a\x00\xff\xff\xff\x7f").unwrap();
}

/// First-pixel RGB color of every page's image, in page order.
pub fn page_colors(path: &Path) -> Vec<(u8, u8, u8)> {
    let doc = Document::load(path).unwrap();
    let mut colors = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
        let stream = doc.get_object(image_id).unwrap().as_stream().unwrap();
        let pixels = stream.decompressed_content().unwrap();
        colors.push((pixels[0], pixels[1], pixels[2]));
    }
    colors
}

/// Number of pages in a PDF file.
pub fn page_count(path: &Path) -> usize {
    Document::load(path).unwrap().get_pages().len()
}
