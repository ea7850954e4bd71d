//! QR code rendering for the pairing page.

use qrcode::{EcLevel, QrCode};

/// Modules of blank border around the code.
const QUIET_ZONE: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum QrRenderError {
    #[error("failed to encode QR data: {0}")]
    Encode(String),

    #[error("failed to encode PNG: {0}")]
    Png(String),
}

/// Build the URI a peer opens after scanning: `<scheme>://<host><prefix>/ink?token=<token>`.
pub fn pairing_uri(scheme: &str, host: &str, prefix: &str, token: &str) -> String {
    format!(
        "{scheme}://{host}{prefix}/ink?token={}",
        urlencoding::encode(token)
    )
}

/// Render `data` as a grayscale PNG roughly `size` pixels wide.
///
/// Uses medium error correction. Each module is scaled to a whole number of
/// pixels, so the image is never smaller than the code itself.
pub fn render_png(data: &str, size: u32) -> Result<Vec<u8>, QrRenderError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| QrRenderError::Encode(e.to_string()))?;
    let modules = code.to_colors();
    let width = code.width();

    let span = width + 2 * QUIET_ZONE;
    let scale = (size as usize / span).max(1);
    let side = span * scale;

    let mut pixels = vec![0xFFu8; side * side];
    for y in 0..width {
        for x in 0..width {
            if modules[y * width + x] != qrcode::Color::Dark {
                continue;
            }
            let top = (y + QUIET_ZONE) * scale;
            let left = (x + QUIET_ZONE) * scale;
            for row in top..top + scale {
                let start = row * side + left;
                pixels[start..start + scale].fill(0x00);
            }
        }
    }

    encode_gray_png(side as u32, &pixels)
}

/// Encode a square 8-bit grayscale buffer as PNG.
fn encode_gray_png(side: u32, pixels: &[u8]) -> Result<Vec<u8>, QrRenderError> {
    use std::io::Cursor;
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, side, side);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| QrRenderError::Png(e.to_string()))?;
        writer
            .write_image_data(pixels)
            .map_err(|e| QrRenderError::Png(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
