//! Minimal PNG chunk reader.
//!
//! Only walks the chunk list; pixel data is left to the `image` crate in
//! tests that need it.

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Header fields and physical resolution of a PNG file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngInfo {
    pub width: u32,
    pub height: u32,
    pub color_type: u8,
    /// Pixels per meter (x, y) when a `pHYs` chunk with unit meter is present
    pub pixels_per_meter: Option<(u32, u32)>,
    pub chunks: Vec<String>,
}

impl PngInfo {
    /// Horizontal resolution in dots per inch, rounded.
    pub fn dpi(&self) -> Option<u32> {
        self.pixels_per_meter.map(|(x, _)| (x as f64 * 0.0254).round() as u32)
    }
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Parse the chunk structure of `bytes`; `None` if it is not a PNG.
pub fn png_info(bytes: &[u8]) -> Option<PngInfo> {
    if bytes.len() < 8 || bytes[..8] != SIGNATURE {
        return None;
    }

    let mut info = PngInfo {
        width: 0,
        height: 0,
        color_type: 0,
        pixels_per_meter: None,
        chunks: Vec::new(),
    };
    let mut pos = 8;
    while pos + 12 <= bytes.len() {
        let len = be_u32(&bytes[pos..]) as usize;
        let kind = &bytes[pos + 4..pos + 8];
        let data = bytes.get(pos + 8..pos + 8 + len)?;
        match kind {
            b"IHDR" if len >= 13 => {
                info.width = be_u32(data);
                info.height = be_u32(&data[4..]);
                info.color_type = data[9];
            }
            b"pHYs" if len == 9 && data[8] == 1 => {
                info.pixels_per_meter = Some((be_u32(data), be_u32(&data[4..])));
            }
            _ => {}
        }
        info.chunks.push(String::from_utf8_lossy(kind).into_owned());
        pos += 12 + len;
    }

    info.chunks.first().filter(|c| *c == "IHDR")?;
    Some(info)
}
