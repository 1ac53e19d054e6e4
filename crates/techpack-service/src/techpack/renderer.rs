//! Single-page tech pack PDF layout.
//!
//! Output is fully determined by its inputs. The same design, image, and
//! timestamp always serialize to the same bytes, so callers can cache or
//! diff rendered documents.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use image::ImageFormat;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use techpack_core::error::ErrorKind;
use techpack_core::{AppError, AppResult};
use techpack_entity::design::Design;

/// A4 page width in points.
const PAGE_WIDTH: f32 = 595.28;
/// A4 page height in points.
const PAGE_HEIGHT: f32 = 841.89;
/// Page margin on all sides, in points.
const MARGIN: f32 = 36.0;
/// Usable width between the margins.
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Vertical gap between the image block and the spec table.
const IMAGE_GAP: f32 = 16.0;
/// Vertical distance between spec table rows.
const SPEC_ROW_STEP: f32 = 18.0;
/// X position where spec values start, leaving room for labels.
const SPEC_VALUE_X: f32 = 126.0;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// The image material available to the renderer.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// The download succeeded; bytes may or may not be embeddable.
    Fetched {
        /// Content type reported by the image host.
        content_type: String,
        /// Raw image bytes.
        bytes: Bytes,
    },
    /// The download failed; the document gets a notice instead.
    Unavailable,
}

struct RasterImage {
    xobject: Stream,
    width: u32,
    height: u32,
}

enum Decoded {
    Raster(RasterImage),
    Unsupported,
    Unavailable,
}

/// Renders a one-page tech pack document for a design.
pub fn render_techpack(
    design: &Design,
    image: &ImageSource,
    generated_at: DateTime<Utc>,
) -> AppResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut ops: Vec<Operation> = Vec::new();

    push_text(
        &mut ops,
        FONT_BOLD,
        20.0,
        MARGIN,
        PAGE_HEIGHT - MARGIN - 12.0,
        "Tech Pack",
    );

    push_color(&mut ops, 0.35, 0.35, 0.35);
    push_text(
        &mut ops,
        FONT_REGULAR,
        10.0,
        MARGIN,
        PAGE_HEIGHT - MARGIN - 35.0,
        &format!("Generated: {}", generated_at.format(TIMESTAMP_FORMAT)),
    );
    push_color(&mut ops, 0.0, 0.0, 0.0);

    let image_top = PAGE_HEIGHT - MARGIN - 60.0;

    let decoded = match image {
        ImageSource::Fetched {
            content_type,
            bytes,
        } => match decode_raster(content_type, bytes) {
            Some(raster) => Decoded::Raster(raster),
            None => Decoded::Unsupported,
        },
        ImageSource::Unavailable => Decoded::Unavailable,
    };

    let mut xobject_id = None;
    let cursor = match decoded {
        Decoded::Raster(raster) => {
            // Scale to the full content width, preserving aspect ratio.
            let draw_height = CONTENT_WIDTH * raster.height as f32 / raster.width as f32;
            xobject_id = Some(doc.add_object(raster.xobject));

            ops.push(Operation::new("q", vec![]));
            ops.push(Operation::new(
                "cm",
                vec![
                    CONTENT_WIDTH.into(),
                    0.into(),
                    0.into(),
                    draw_height.into(),
                    MARGIN.into(),
                    (image_top - draw_height).into(),
                ],
            ));
            ops.push(Operation::new("Do", vec!["Im0".into()]));
            ops.push(Operation::new("Q", vec![]));

            image_top - draw_height - IMAGE_GAP
        }
        Decoded::Unsupported => {
            push_text(
                &mut ops,
                FONT_BOLD,
                12.0,
                MARGIN,
                image_top - 14.0,
                "Image (SVG/unsupported):",
            );
            push_color(&mut ops, 0.1, 0.1, 0.8);
            push_text(
                &mut ops,
                FONT_REGULAR,
                10.0,
                MARGIN,
                image_top - 30.0,
                &design.image_url,
            );
            push_color(&mut ops, 0.0, 0.0, 0.0);

            image_top - 50.0
        }
        Decoded::Unavailable => {
            push_color(&mut ops, 0.8, 0.1, 0.1);
            push_text(
                &mut ops,
                FONT_BOLD,
                12.0,
                MARGIN,
                image_top - 14.0,
                "Image could not be embedded.",
            );
            push_color(&mut ops, 0.0, 0.0, 0.0);

            image_top - 30.0
        }
    };

    let rows = [
        ("Design ID", design.id.to_string()),
        (
            "Dimensions",
            format!(
                "{} \u{d7} {} \u{d7} {} cm",
                format_dimension(design.width),
                format_dimension(design.height),
                format_dimension(design.depth),
            ),
        ),
        ("Material", text_or_dash(design.material.as_deref())),
        ("Color", text_or_dash(design.color.as_deref())),
        (
            "Created",
            design.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ),
    ];

    for (i, (label, value)) in rows.iter().enumerate() {
        let y = cursor - SPEC_ROW_STEP * (i as f32 + 1.0);
        push_text(&mut ops, FONT_BOLD, 12.0, MARGIN, y, &format!("{label}:"));
        push_text(&mut ops, FONT_REGULAR, 12.0, SPEC_VALUE_X, y, value);
    }

    let encoded = Content { operations: ops }.encode().map_err(|e| {
        AppError::with_source(ErrorKind::Internal, "Failed to encode page content", e)
    })?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let mut resources = dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
    };
    if let Some(id) = xobject_id {
        resources.set("XObject", dictionary! { "Im0" => id });
    }

    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        "Contents" => content_id,
        "Resources" => resources,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(|e| {
        AppError::with_source(ErrorKind::Internal, "Failed to serialize document", e)
    })?;

    Ok(buffer)
}

fn push_text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(
            encode_win_ansi(text),
            StringFormat::Literal,
        )],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn push_color(ops: &mut Vec<Operation>, r: f32, g: f32, b: f32) {
    ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
}

/// Maps text into WinAnsi bytes. Latin-1 passes through, anything else
/// becomes a question mark.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}

fn format_dimension(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

fn text_or_dash(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "-".to_string(),
    }
}

/// Decodes image bytes into a PDF image XObject.
///
/// JPEGs embed as-is behind a DCTDecode filter. PNGs are decoded to raw
/// RGB samples, which the document-level compression pass picks up. The
/// declared content type wins, but when it is missing or wrong the bytes
/// themselves are sniffed before giving up.
fn decode_raster(content_type: &str, bytes: &Bytes) -> Option<RasterImage> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let format = match normalized.as_str() {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        _ => None,
    };
    let format = format.or_else(|| match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some(ImageFormat::Png),
        ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
        _ => None,
    })?;

    match format {
        ImageFormat::Jpeg => {
            let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg).ok()?;
            let color_space = match decoded.color() {
                image::ColorType::L8 | image::ColorType::La8 => "DeviceGray",
                _ => "DeviceRGB",
            };
            let mut stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => decoded.width() as i64,
                    "Height" => decoded.height() as i64,
                    "ColorSpace" => color_space,
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                bytes.to_vec(),
            );
            // Already JPEG-compressed; flate on top would only add bytes.
            stream.allows_compression = false;
            Some(RasterImage {
                xobject: stream,
                width: decoded.width(),
                height: decoded.height(),
            })
        }
        ImageFormat::Png => {
            let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png).ok()?;
            let rgb = decoded.to_rgb8();
            let (width, height) = (rgb.width(), rgb.height());
            let stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                rgb.into_raw(),
            );
            Some(RasterImage {
                xobject: stream,
                width,
                height,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::TimeZone;
    use image::{DynamicImage, RgbImage};
    use uuid::Uuid;

    use super::*;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()
    }

    fn design() -> Design {
        Design {
            id: Uuid::nil(),
            owner_id: Uuid::new_v4(),
            image_url: "https://cdn.example.com/designs/stool.png".to_string(),
            width: Some(40.0),
            height: Some(20.0),
            depth: None,
            material: None,
            color: Some("Slate".to_string()),
            created_at: fixed_time(),
        }
    }

    fn png_bytes(width: u32, height: u32) -> Bytes {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 40, 200]),
        ));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        Bytes::from(out.into_inner())
    }

    fn jpeg_bytes(width: u32, height: u32) -> Bytes {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([10, 180, 90]),
        ));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
        Bytes::from(out.into_inner())
    }

    /// Collects every string drawn on the first page.
    fn page_text_strings(pdf: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(pdf).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let data = doc.get_page_content(page_id).unwrap();
        let content = Content::decode(&data).unwrap();

        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => {
                    Some(bytes.iter().map(|b| *b as char).collect())
                }
                _ => None,
            })
            .collect()
    }

    /// Returns the (width, height) scale of the image placement matrix.
    fn image_cm_scale(pdf: &[u8]) -> Option<(f32, f32)> {
        let doc = Document::load_mem(pdf).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let data = doc.get_page_content(page_id).unwrap();
        let content = Content::decode(&data).unwrap();

        content
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .map(|op| {
                let num = |o: &Object| match o {
                    Object::Real(v) => *v,
                    Object::Integer(v) => *v as f32,
                    _ => panic!("matrix operand is not numeric"),
                };
                (num(&op.operands[0]), num(&op.operands[3]))
            })
    }

    #[test]
    fn output_is_deterministic() {
        let design = design();
        let image = ImageSource::Fetched {
            content_type: "image/png".to_string(),
            bytes: png_bytes(4, 2),
        };

        let first = render_techpack(&design, &image, fixed_time()).unwrap();
        let second = render_techpack(&design, &image, fixed_time()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unavailable_image_renders_a_notice() {
        let pdf = render_techpack(&design(), &ImageSource::Unavailable, fixed_time()).unwrap();

        assert!(pdf.starts_with(b"%PDF-"));
        let strings = page_text_strings(&pdf);
        assert!(strings.iter().any(|s| s == "Image could not be embedded."));
    }

    #[test]
    fn png_fills_the_content_width_preserving_aspect() {
        let image = ImageSource::Fetched {
            content_type: "image/png".to_string(),
            bytes: png_bytes(4, 2),
        };
        let pdf = render_techpack(&design(), &image, fixed_time()).unwrap();

        let (width, height) = image_cm_scale(&pdf).unwrap();
        assert!((width - CONTENT_WIDTH).abs() < 0.05);
        assert!((height - CONTENT_WIDTH / 2.0).abs() < 0.05);
    }

    #[test]
    fn missing_fields_render_as_dashes() {
        let pdf = render_techpack(&design(), &ImageSource::Unavailable, fixed_time()).unwrap();

        let strings = page_text_strings(&pdf);
        assert!(strings.iter().any(|s| s == "Material:"));
        assert!(strings.iter().any(|s| s == "-"));
        assert!(strings.iter().any(|s| s == "40 \u{d7} 20 \u{d7} - cm"));
    }

    #[test]
    fn header_carries_title_and_timestamp() {
        let pdf = render_techpack(&design(), &ImageSource::Unavailable, fixed_time()).unwrap();

        let strings = page_text_strings(&pdf);
        assert!(strings.iter().any(|s| s == "Tech Pack"));
        assert!(strings
            .iter()
            .any(|s| s == "Generated: 2024-05-17 09:30:00 UTC"));
    }

    #[test]
    fn svg_content_type_falls_back_to_a_link() {
        let image = ImageSource::Fetched {
            content_type: "image/svg+xml".to_string(),
            bytes: Bytes::from_static(b"<svg xmlns='http://www.w3.org/2000/svg'/>"),
        };
        let pdf = render_techpack(&design(), &image, fixed_time()).unwrap();

        let strings = page_text_strings(&pdf);
        assert!(strings.iter().any(|s| s == "Image (SVG/unsupported):"));
        assert!(strings
            .iter()
            .any(|s| s == "https://cdn.example.com/designs/stool.png"));
    }

    #[test]
    fn jpeg_embeds_without_reencoding() {
        let image = ImageSource::Fetched {
            content_type: "image/jpeg".to_string(),
            bytes: jpeg_bytes(6, 4),
        };
        let pdf = render_techpack(&design(), &image, fixed_time()).unwrap();

        let doc = Document::load_mem(&pdf).unwrap();
        let has_dct = doc.objects.values().any(|obj| match obj {
            Object::Stream(stream) => stream
                .dict
                .get(b"Filter")
                .ok()
                .and_then(|f| f.as_name().ok())
                == Some(b"DCTDecode".as_slice()),
            _ => false,
        });
        assert!(has_dct);
    }

    #[test]
    fn wrong_content_type_is_sniffed_from_the_bytes() {
        let image = ImageSource::Fetched {
            content_type: "application/octet-stream".to_string(),
            bytes: png_bytes(4, 2),
        };
        let pdf = render_techpack(&design(), &image, fixed_time()).unwrap();

        assert!(image_cm_scale(&pdf).is_some());
    }

    #[test]
    fn undecodable_bytes_fall_back_to_a_link() {
        let image = ImageSource::Fetched {
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"not actually a png"),
        };
        let pdf = render_techpack(&design(), &image, fixed_time()).unwrap();

        let strings = page_text_strings(&pdf);
        assert!(strings.iter().any(|s| s == "Image (SVG/unsupported):"));
    }
}
