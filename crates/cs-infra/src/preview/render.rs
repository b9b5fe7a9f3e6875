use anyhow::{Context, Result};
use cs_core::{ImagePreview, MimeType};
use image::{imageops::FilterType, ColorType, GenericImageView};

/// Decodes image bytes and re-encodes them as a lossless WebP no larger than
/// `max_edge` on either side. CPU bound; run it on a blocking thread.
pub fn render_preview(image_bytes: &[u8], max_edge: u32) -> Result<ImagePreview> {
    let decoded = image::load_from_memory(image_bytes).context("decode image bytes for preview")?;
    let (original_width, original_height) = decoded.dimensions();
    let (target_width, target_height) =
        calculate_target_size(original_width, original_height, max_edge);

    let resized = if target_width == original_width && target_height == original_height {
        decoded
    } else {
        image::DynamicImage::ImageRgba8(image::imageops::resize(
            &decoded,
            target_width,
            target_height,
            FilterType::Triangle,
        ))
    };

    let rgba = resized.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut bytes = Vec::new();
    let encoder = image::codecs::webp::WebPEncoder::new_lossless(&mut bytes);
    encoder
        .encode(rgba.as_raw(), width, height, ColorType::Rgba8.into())
        .context("encode preview to webp")?;

    Ok(ImagePreview::Rendered {
        mime: MimeType::new("image/webp"),
        width,
        height,
        bytes,
    })
}

fn calculate_target_size(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    if width >= height {
        let scaled_height = ((height as f64) * (max_edge as f64) / (width as f64)).round() as u32;
        (max_edge, scaled_height.max(1))
    } else {
        let scaled_width = ((width as f64) * (max_edge as f64) / (height as f64)).round() as u32;
        (scaled_width.max(1), max_edge)
    }
}
