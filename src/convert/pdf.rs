//! PDF page assembly for converted frames.
//!
//! Each [`PageImage`] becomes one PDF page at 72 dpi (page size in points
//! equals pixel size), with the frame embedded as a FlateDecode DeviceRGB
//! image XObject scaled to fill the page.

use crate::convert::pages::PageImage;
use crate::error::{Error, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Write;
use std::path::Path;

/// Write a sequence of page images as one PDF document.
///
/// Pages appear in slice order — the caller's frame order is preserved
/// exactly. An empty slice is rejected; a PDF without pages is never
/// produced.
pub fn write_pdf(pages: &[PageImage], path: &Path) -> Result<()> {
    if pages.is_empty() {
        return Err(Error::conversion(path, "no frames to write"));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let image_id = doc.add_object(image_xobject(page)?);
        let content = page_content(page)
            .encode()
            .map_err(|e| Error::conversion(path, e))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                (page.width as i64).into(),
                (page.height as i64).into(),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).map_err(|e| Error::conversion(path, e))?;
    Ok(())
}

/// Build the image XObject stream for one frame.
fn image_xobject(page: &PageImage) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&page.data)?;
    let compressed = encoder.finish()?;

    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => page.width as i64,
            "Height" => page.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        compressed,
    ))
}

/// Content stream that paints the page's image across the full media box.
fn page_content(page: &PageImage) -> Content {
    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (page.width as i64).into(),
                    0.into(),
                    0.into(),
                    (page.height as i64).into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    }
}
