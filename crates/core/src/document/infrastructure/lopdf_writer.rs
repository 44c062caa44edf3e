use std::io::{BufWriter, Write};
use std::path::Path;

use lopdf::{dictionary, Document, Object, Stream};
use tempfile::NamedTempFile;

use crate::document::domain::document_writer::DocumentWriter;
use crate::shared::error::WriteError;
use crate::shared::page::Page;

/// Resource name the page image is registered under on every page.
pub const PAGE_IMAGE_NAME: &str = "Im0";

/// Writes pages as a raster-only PDF using `lopdf`.
///
/// Each bitmap becomes an RGB image XObject painted over the full page. The
/// MediaBox is derived from the bitmap size and the DPI it was rasterized at,
/// so an unedited round trip keeps the original physical page size.
pub struct LopdfWriter;

impl LopdfWriter {
    pub fn new() -> Self {
        Self
    }

    fn build_document(pages: &[Page]) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

        for page in pages {
            let (width_pt, height_pt) = page.size_in_points();

            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => page.width() as i64,
                    "Height" => page.height() as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                page.data().to_vec(),
            ));

            let paint = format!("q {width_pt:.4} 0 0 {height_pt:.4} 0 0 cm /{PAGE_IMAGE_NAME} Do Q");
            let content_id = doc.add_object(Stream::new(dictionary! {}, paint.into_bytes()));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    Object::Real(width_pt as _),
                    Object::Real(height_pt as _),
                ],
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        PAGE_IMAGE_NAME => image_id,
                    },
                },
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();
        doc
    }
}

impl Default for LopdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriter for LopdfWriter {
    fn write(&self, path: &Path, pages: &[Page]) -> Result<(), WriteError> {
        if pages.is_empty() {
            return Err(WriteError::NothingToExport);
        }

        let mut doc = Self::build_document(pages);

        let io_err = |source: std::io::Error| WriteError::Io {
            path: path.to_path_buf(),
            source,
        };
        // Written next to the target and renamed into place; the temp file is
        // removed on drop if anything below fails.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        {
            let mut out = BufWriter::new(tmp.as_file());
            doc.save_to(&mut out).map_err(io_err)?;
            out.flush().map_err(io_err)?;
        }
        tmp.persist(path).map_err(|e| io_err(e.error))?;

        log::info!("Wrote {} pages to {}", pages.len(), path.display());
        Ok(())
    }
}

/// Reads back the RGB pixels of every page written by [`LopdfWriter`].
///
/// `lopdf` refuses to decode image streams, so Flate data is inflated here.
#[cfg(test)]
pub(crate) fn read_page_images(path: &Path) -> Vec<(u32, u32, Vec<u8>)> {
    use std::io::Read;

    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let image_id = page
                .get(b"Resources")
                .and_then(Object::as_dict)
                .and_then(|r| r.get(b"XObject"))
                .and_then(Object::as_dict)
                .and_then(|x| x.get(PAGE_IMAGE_NAME.as_bytes()))
                .and_then(Object::as_reference)
                .unwrap();
            let stream = doc.get_object(image_id).and_then(Object::as_stream).unwrap();
            let width = stream.dict.get(b"Width").and_then(Object::as_i64).unwrap() as u32;
            let height = stream.dict.get(b"Height").and_then(Object::as_i64).unwrap() as u32;
            let filter = stream.dict.get(b"Filter").and_then(Object::as_name_str).ok();
            let pixels = match filter {
                None => stream.content.clone(),
                Some("FlateDecode") => {
                    let mut inflated = Vec::new();
                    flate2::read::ZlibDecoder::new(stream.content.as_slice())
                        .read_to_end(&mut inflated)
                        .expect("image stream is valid zlib");
                    inflated
                }
                Some(other) => panic!("unexpected image filter {other}"),
            };
            (width, height, pixels)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_page(width: u32, height: u32, index: usize, dpi: u32) -> Page {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128]);
            }
        }
        Page::new(data, width, height, index, dpi)
    }

    #[test]
    fn test_write_creates_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        LopdfWriter::new()
            .write(&path, &[gradient_page(40, 30, 0, 72)])
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_one_output_page_per_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let pages = vec![
            gradient_page(40, 30, 0, 72),
            gradient_page(30, 40, 1, 72),
            gradient_page(20, 20, 2, 72),
        ];
        LopdfWriter::new().write(&path, &pages).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_pixels_survive_roundtrip_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let pages = vec![gradient_page(40, 30, 0, 72), gradient_page(25, 35, 1, 72)];
        LopdfWriter::new().write(&path, &pages).unwrap();

        let images = read_page_images(&path);
        assert_eq!(images.len(), 2);
        for (page, (w, h, pixels)) in pages.iter().zip(images) {
            assert_eq!((w, h), (page.width(), page.height()));
            assert_eq!(pixels, page.data());
        }
    }

    #[test]
    fn test_media_box_follows_dpi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        // 400x200 px at 200 dpi -> 144x72 pt
        LopdfWriter::new()
            .write(&path, &[gradient_page(400, 200, 0, 200)])
            .unwrap();

        let doc = Document::load(&path).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let media_box = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .and_then(Object::as_array)
            .unwrap()
            .clone();
        let dims: Vec<f32> = media_box
            .iter()
            .map(|o| match o {
                Object::Integer(i) => *i as f32,
                Object::Real(r) => *r as f32,
                other => panic!("unexpected MediaBox entry {other:?}"),
            })
            .collect();
        assert!((dims[2] - 144.0).abs() < 0.01);
        assert!((dims[3] - 72.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_document_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let result = LopdfWriter::new().write(&path, &[]);
        assert!(matches!(result, Err(WriteError::NothingToExport)));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let result = LopdfWriter::new().write(
            Path::new("/nonexistent/dir/out.pdf"),
            &[gradient_page(10, 10, 0, 72)],
        );
        assert!(matches!(result, Err(WriteError::Io { .. })));
    }

    #[test]
    fn test_image_streams_are_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        LopdfWriter::new()
            .write(&path, &[gradient_page(40, 30, 0, 72)])
            .unwrap();

        let raw_len = 40 * 30 * 3;
        let doc = Document::load(&path).unwrap();
        let image = doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .find(|s| s.dict.get(b"Subtype").and_then(Object::as_name_str).ok() == Some("Image"))
            .unwrap();
        assert_eq!(
            image.dict.get(b"Filter").and_then(Object::as_name_str).ok(),
            Some("FlateDecode")
        );
        assert!(image.content.len() < raw_len);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        std::fs::write(&path, b"stale").unwrap();

        LopdfWriter::new()
            .write(&path, &[gradient_page(10, 10, 0, 72)])
            .unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF-"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // Renaming a file over a directory fails after the PDF is encoded.
        let target = dir.path().join("taken.pdf");
        std::fs::create_dir(&target).unwrap();

        let result = LopdfWriter::new().write(&target, &[gradient_page(10, 10, 0, 72)]);

        match result {
            Err(WriteError::Io { path, .. }) => assert_eq!(path, target),
            other => panic!("expected Io error, got {other:?}"),
        }
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries, vec![target.clone()]);
        assert!(target.is_dir());
    }
}
