//! RGB5A3 texel decoding and 4x4 tile layout.
//!
//! GameCube and Wii store banner and icon pixels as big-endian 16-bit
//! RGB5A3 texels grouped into 4x4 tiles. Tiles run left to right, top to
//! bottom; the 16 texels inside a tile are row-major.
//!
//! ## RGB5A3
//! ```text
//! bit 15 = 1:  1RRRRRGG GGGBBBBB   opaque, 5 bits per channel
//! bit 15 = 0:  0AAARRRR GGGGBBBB   3-bit alpha, 4 bits per channel
//! ```
//! Channels widen to 8 bits by repeating their high bits into the low
//! bits (`abcd` -> `abcdabcd`), so full scale maps to 0xFF.

use crate::{Error, Result};

/// Tile edge length in pixels.
pub const TILE_DIM: usize = 4;

/// A decoded image: 8-bit RGBA pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl DecodedImage {
    /// Wrap an RGBA8 buffer. `data` must hold exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA value at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Copy into an [`image::RgbaImage`] for encoding.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }
}

#[inline]
fn expand3(v: u16) -> u8 {
    let v = (v & 0x7) as u8;
    (v << 5) | (v << 2) | (v >> 1)
}

#[inline]
fn expand4(v: u16) -> u8 {
    let v = (v & 0xF) as u8;
    (v << 4) | v
}

#[inline]
fn expand5(v: u16) -> u8 {
    let v = (v & 0x1F) as u8;
    (v << 3) | (v >> 2)
}

/// Convert one RGB5A3 texel to RGBA8.
pub fn rgb5a3_to_rgba(px: u16) -> [u8; 4] {
    if px & 0x8000 != 0 {
        [expand5(px >> 10), expand5(px >> 5), expand5(px), 0xFF]
    } else {
        [expand4(px >> 8), expand4(px >> 4), expand4(px), expand3(px >> 12)]
    }
}

/// Convert RGBA8 to the nearest RGB5A3 texel by truncation.
///
/// Fully opaque pixels use the 5-5-5 mode; everything else uses 3-4-4-4.
pub fn rgba_to_rgb5a3(rgba: [u8; 4]) -> u16 {
    let [r, g, b, a] = rgba.map(u16::from);
    if a == 0xFF {
        0x8000 | ((r >> 3) << 10) | ((g >> 3) << 5) | (b >> 3)
    } else {
        ((a >> 5) << 12) | ((r >> 4) << 8) | ((g >> 4) << 4) | (b >> 4)
    }
}

fn padded(dim: usize) -> usize {
    dim.div_ceil(TILE_DIM) * TILE_DIM
}

/// Raster position of the `i`-th texel of a tiled stream.
///
/// `width` is rounded up to a whole number of tiles. The position may lie
/// in the padding past the real image edge.
#[inline]
fn tiled_position(i: usize, width: usize) -> (usize, usize) {
    let tiles_per_row = padded(width) / TILE_DIM;
    let tile = i / (TILE_DIM * TILE_DIM);
    let within = i % (TILE_DIM * TILE_DIM);
    let x = (tile % tiles_per_row) * TILE_DIM + within % TILE_DIM;
    let y = (tile / tiles_per_row) * TILE_DIM + within / TILE_DIM;
    (x, y)
}

/// Number of texels in a tiled image, including edge padding.
pub fn tiled_len(width: usize, height: usize) -> usize {
    padded(width) * padded(height)
}

/// Reorder a 4x4-tiled texel stream into raster order.
///
/// Returns `None` if `src` is shorter than [`tiled_len`].
pub fn untile<T: Copy + Default>(src: &[T], width: usize, height: usize) -> Option<Vec<T>> {
    let src = src.get(..tiled_len(width, height))?;
    let mut out = vec![T::default(); width * height];
    for (i, &v) in src.iter().enumerate() {
        let (x, y) = tiled_position(i, width);
        if x < width && y < height {
            out[y * width + x] = v;
        }
    }
    Some(out)
}

/// Reorder a raster texel array into 4x4 tiles. Padding texels are `T::default()`.
///
/// Returns `None` if `src` holds fewer than `width * height` texels.
pub fn tile<T: Copy + Default>(src: &[T], width: usize, height: usize) -> Option<Vec<T>> {
    let src = src.get(..width * height)?;
    let len = tiled_len(width, height);
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let (x, y) = tiled_position(i, width);
        out.push(if x < width && y < height {
            src[y * width + x]
        } else {
            T::default()
        });
    }
    Some(out)
}

/// Decode a tiled big-endian RGB5A3 pixel block into an RGBA8 image.
///
/// Returns [`Error::TruncatedPixelData`] if `data` is shorter than the
/// block requires (`width * height * 2` bytes for tile-aligned sizes).
pub fn decode_rgb5a3(data: &[u8], width: u32, height: u32) -> Result<DecodedImage> {
    let (w, h) = (width as usize, height as usize);
    let need = tiled_len(w, h) * 2;
    if data.len() < need {
        return Err(Error::TruncatedPixelData {
            expected: need,
            actual: data.len(),
        });
    }

    let mut out = vec![0u8; w * h * 4];
    for (i, texel) in data[..need].chunks_exact(2).enumerate() {
        let (x, y) = tiled_position(i, w);
        if x >= w || y >= h {
            continue;
        }
        let rgba = rgb5a3_to_rgba(u16::from_be_bytes([texel[0], texel[1]]));
        let o = (y * w + x) * 4;
        out[o..o + 4].copy_from_slice(&rgba);
    }

    Ok(DecodedImage {
        width,
        height,
        data: out,
    })
}

/// Encode an RGBA8 image as a tiled big-endian RGB5A3 block.
pub fn encode_rgb5a3(img: &DecodedImage) -> Vec<u8> {
    let (w, h) = (img.width as usize, img.height as usize);
    let raster: Vec<u16> = img
        .data
        .chunks_exact(4)
        .map(|p| rgba_to_rgb5a3([p[0], p[1], p[2], p[3]]))
        .collect();
    tile(&raster, w, h)
        .unwrap_or_default()
        .into_iter()
        .flat_map(u16::to_be_bytes)
        .collect()
}
