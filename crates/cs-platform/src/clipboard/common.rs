use clipboard_rs::common::RustImage;
use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat, RustImageData};
use cs_core::ports::ClipboardIoError;
use cs_core::MimeType;

type BackendResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn map_clipboard_err<T>(
    op: &'static str,
    mime: &str,
    result: BackendResult<T>,
) -> Result<T, ClipboardIoError> {
    result.map_err(|e| ClipboardIoError::Operation {
        op,
        mime: mime.to_string(),
        message: e.to_string(),
    })
}

fn is_text_target(format: &str) -> bool {
    matches!(
        format,
        MimeType::TEXT_UTF8 | MimeType::X11_UTF8_STRING | MimeType::X11_STRING | "text/plain"
    )
}

pub struct CommonClipboardImpl;

impl CommonClipboardImpl {
    /// Raw buffer for `format` when the owner offers it under that name.
    /// Otherwise text, HTML and PNG fall back to the backend's typed
    /// accessors, since macOS and Windows do not advertise MIME names.
    pub fn read_target(ctx: &ClipboardContext, format: &str) -> Option<Vec<u8>> {
        let offered = ctx.available_formats().unwrap_or_default();
        if offered.iter().any(|f| f == format) {
            if let Ok(buf) = ctx.get_buffer(format) {
                return Some(buf);
            }
        }

        if is_text_target(format) && ctx.has(ContentFormat::Text) {
            return ctx.get_text().ok().map(String::into_bytes);
        }
        if format == "text/html" && ctx.has(ContentFormat::Html) {
            return ctx.get_html().ok().map(String::into_bytes);
        }
        if format == "image/png" && ctx.has(ContentFormat::Image) {
            let png = ctx.get_image().ok()?.to_png().ok()?;
            return Some(png.get_bytes().to_vec());
        }
        None
    }

    pub fn write_target(
        ctx: &ClipboardContext,
        mime: &MimeType,
        bytes: &[u8],
    ) -> Result<(), ClipboardIoError> {
        let format = mime.as_str();
        if is_text_target(format) {
            let text = String::from_utf8_lossy(bytes).into_owned();
            return map_clipboard_err("write", format, ctx.set_text(text));
        }
        match format {
            "text/html" => {
                let html = String::from_utf8_lossy(bytes).into_owned();
                map_clipboard_err("write", format, ctx.set_html(html))
            }
            "image/png" => {
                let img = map_clipboard_err("decode", format, RustImageData::from_bytes(bytes))?;
                map_clipboard_err("write", format, ctx.set_image(img))
            }
            _ => map_clipboard_err("write", format, ctx.set_buffer(format, bytes.to_vec())),
        }
    }

    pub fn clear(ctx: &ClipboardContext) -> Result<(), ClipboardIoError> {
        map_clipboard_err("clear", "*", ctx.clear())
    }
}
