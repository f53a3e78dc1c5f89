//! PNG encoding for rendered maps.
//!
//! Three encodings are chosen from automatically:
//! - **Indexed (color type 3)**: at most 256 distinct colors.
//! - **RGB (color type 2)**: every pixel opaque, which is the normal case
//!   for a map canvas.
//! - **RGBA (color type 6)**: anything else.
//!
//! When a resolution is given it is written as a `pHYs` chunk so viewers
//! and print tools pick up the intended DPI.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use map_common::{MapError, MapResult};
use std::collections::HashMap;
use std::io::Write;

use crate::figure::Canvas;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

const METERS_PER_INCH: f64 = 0.0254;

type Palette = Vec<(u8, u8, u8, u8)>;

/// Encode a finished canvas at its own DPI.
pub fn encode_canvas(canvas: &Canvas) -> MapResult<Vec<u8>> {
    let image = canvas.image();
    create_png_auto(
        image.as_raw(),
        image.width() as usize,
        image.height() as usize,
        Some(canvas.dpi()),
    )
}

/// Pixels per meter for a resolution in dots per inch.
pub fn dpi_to_ppm(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}

/// Encode RGBA pixels, picking the smallest suitable color type.
pub fn create_png_auto(
    pixels: &[u8],
    width: usize,
    height: usize,
    dpi: Option<u32>,
) -> MapResult<Vec<u8>> {
    check_len(pixels, width, height)?;

    if let Some((palette, indices)) = extract_palette(pixels) {
        return create_png_indexed(width, height, &palette, &indices, dpi);
    }
    if pixels.chunks_exact(4).all(|p| p[3] == 255) {
        return create_png_rgb(pixels, width, height, dpi);
    }
    create_png(pixels, width, height, dpi)
}

fn check_len(pixels: &[u8], width: usize, height: usize) -> MapResult<()> {
    if width == 0 || height == 0 || pixels.len() != width * height * 4 {
        return Err(MapError::EncodeError(format!(
            "{} bytes do not describe a {}x{} RGBA image",
            pixels.len(),
            width,
            height
        )));
    }
    Ok(())
}

/// Pack RGBA bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

/// Palette and per-pixel indices, or `None` past 256 colors.
fn extract_palette(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for chunk in pixels.chunks_exact(4) {
        let packed = pack_color(chunk[0], chunk[1], chunk[2], chunk[3]);

        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push((chunk[0], chunk[1], chunk[2], chunk[3]));
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Create an indexed PNG (color type 3) from palette and indices.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
    dpi: Option<u32>,
) -> MapResult<Vec<u8>> {
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE || indices.len() != width * height {
        return Err(MapError::EncodeError(format!(
            "{} indices with a {}-color palette do not describe a {}x{} image",
            indices.len(),
            palette.len(),
            width,
            height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));
    write_phys(&mut png, dpi);

    let plte_data: Vec<u8> = palette
        .iter()
        .flat_map(|&(r, g, b, _)| [r, g, b])
        .collect();
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS only if any palette entry is translucent
    if palette.iter().any(|(_, _, _, a)| *a < 255) {
        let trns_data: Vec<u8> = palette.iter().map(|(_, _, _, a)| *a).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    write_chunk(
        &mut png,
        b"IDAT",
        &deflate_scanlines(indices, width, height)?,
    );
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Create an RGB PNG (color type 2), dropping the alpha channel.
pub fn create_png_rgb(
    pixels: &[u8],
    width: usize,
    height: usize,
    dpi: Option<u32>,
) -> MapResult<Vec<u8>> {
    check_len(pixels, width, height)?;
    let rgb: Vec<u8> = pixels
        .chunks_exact(4)
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect();

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 2));
    write_phys(&mut png, dpi);
    write_chunk(
        &mut png,
        b"IDAT",
        &deflate_scanlines(&rgb, width * 3, height)?,
    );
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Create an RGBA PNG (color type 6).
pub fn create_png(
    pixels: &[u8],
    width: usize,
    height: usize,
    dpi: Option<u32>,
) -> MapResult<Vec<u8>> {
    check_len(pixels, width, height)?;

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));
    write_phys(&mut png, dpi);
    write_chunk(
        &mut png,
        b"IDAT",
        &deflate_scanlines(pixels, width * 4, height)?,
    );
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

/// Physical pixel size; unit 1 = meter.
fn write_phys(png: &mut Vec<u8>, dpi: Option<u32>) {
    let Some(dpi) = dpi else { return };
    let ppm = dpi_to_ppm(dpi);
    let mut data = Vec::with_capacity(9);
    data.extend_from_slice(&ppm.to_be_bytes());
    data.extend_from_slice(&ppm.to_be_bytes());
    data.push(1);
    write_chunk(png, b"pHYs", &data);
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix every `row_bytes`-long scanline with filter type 0 and deflate.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> MapResult<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let compress = || -> std::io::Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&uncompressed)?;
        encoder.finish()
    };
    compress().map_err(|e| MapError::EncodeError(format!("IDAT compression failed: {}", e)))
}
