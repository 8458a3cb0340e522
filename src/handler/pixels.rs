//! Conversion between packed pixel payloads and RGBA images.

use image::{Rgba, RgbaImage};

use crate::error::{PakError, Result};
use crate::types::{ColorKind, Colour};

/// Byte length of a `width`x`height` payload, or a decode error on overflow.
pub(crate) fn expected_len(width: u32, height: u32, bytes_per_pixel: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(bytes_per_pixel))
        .ok_or_else(|| PakError::decode(format!("Image size {}x{} is out of range", width, height)))
}

fn check_len(payload: &[u8], expected: usize, width: u32, height: u32) -> Result<()> {
    if payload.len() < expected {
        return Err(PakError::Decode {
            message: format!(
                "Payload of {} bytes is too short for a {}x{} image ({} bytes needed)",
                payload.len(),
                width,
                height,
                expected
            ),
            help: None,
        });
    }
    Ok(())
}

/// Decode an unpaletted payload.
pub fn decode_pixels(kind: ColorKind, payload: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
    let bpp = kind.bytes_per_pixel();
    if bpp == 0 {
        return Err(PakError::decode("Link entities have no pixel data"));
    }
    check_len(payload, expected_len(width, height, bpp)?, width, height)?;

    let mut img = RgbaImage::new(width, height);
    for (i, px) in img.pixels_mut().enumerate() {
        let chunk = &payload[i * bpp..(i + 1) * bpp];
        let colour = match kind {
            ColorKind::Argb8888 => Colour::from_bgra([chunk[0], chunk[1], chunk[2], chunk[3]]),
            ColorKind::Argb4444 => Colour::from_argb4444(u16::from_le_bytes([chunk[0], chunk[1]])),
            ColorKind::Argb1555 => Colour::from_argb1555(u16::from_le_bytes([chunk[0], chunk[1]])),
            ColorKind::Link => unreachable!("bytes_per_pixel is zero for links"),
        };
        *px = Rgba(colour.to_rgba());
    }
    Ok(img)
}

/// Encode an image into an unpaletted payload.
pub fn encode_pixels(kind: ColorKind, image: &RgbaImage) -> Result<Vec<u8>> {
    let bpp = kind.bytes_per_pixel();
    let mut out = Vec::with_capacity(expected_len(image.width(), image.height(), bpp)?);
    for px in image.pixels() {
        let colour = Colour::from(*px);
        match kind {
            ColorKind::Argb8888 => out.extend_from_slice(&colour.to_bgra()),
            ColorKind::Argb4444 => out.extend_from_slice(&colour.to_argb4444().to_le_bytes()),
            ColorKind::Argb1555 => out.extend_from_slice(&colour.to_argb1555().to_le_bytes()),
            ColorKind::Link => return Err(PakError::encode("Link entities cannot carry pixel data")),
        }
    }
    Ok(out)
}

/// Decode a one-byte-per-pixel payload against a palette.
pub fn decode_indexed(payload: &[u8], width: u32, height: u32, palette: &[Colour]) -> Result<RgbaImage> {
    check_len(payload, expected_len(width, height, 1)?, width, height)?;

    let mut img = RgbaImage::new(width, height);
    for (px, &index) in img.pixels_mut().zip(payload) {
        let colour = palette.get(index as usize).ok_or_else(|| {
            PakError::decode(format!(
                "Palette index {} out of range (palette has {} colours)",
                index,
                palette.len()
            ))
        })?;
        *px = Rgba(colour.to_rgba());
    }
    Ok(img)
}

/// Encode an image as nearest-palette indices.
pub fn encode_indexed(image: &RgbaImage, palette: &[Colour]) -> Result<Vec<u8>> {
    if palette.is_empty() {
        return Err(PakError::Encode {
            message: "Cannot encode an indexed image without a palette".to_string(),
            help: Some("Convert the album to ver4 so a palette is built".to_string()),
        });
    }
    Ok(image
        .pixels()
        .map(|px| nearest(palette, Colour::from(*px)))
        .collect())
}

fn nearest(palette: &[Colour], colour: Colour) -> u8 {
    palette
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| c.distance(colour))
        .map(|(i, _)| i as u8)
        .unwrap_or(0)
}

/// Collect the distinct colours of `images`, in first-seen order.
pub fn build_palette<'a>(images: impl IntoIterator<Item = &'a RgbaImage>, limit: usize) -> Result<Vec<Colour>> {
    let mut palette: Vec<Colour> = Vec::new();
    for image in images {
        for px in image.pixels() {
            let colour = Colour::from(*px);
            if palette.contains(&colour) {
                continue;
            }
            if palette.len() == limit {
                return Err(PakError::Encode {
                    message: format!("Indexed images use more than {} colours", limit),
                    help: Some("Reduce the colour count or use argb8888 entities".to_string()),
                });
            }
            palette.push(colour);
        }
    }
    Ok(palette)
}
