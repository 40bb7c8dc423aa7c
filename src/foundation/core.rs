use std::sync::Arc;

use crate::foundation::error::{StageError, StageResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// How source pixels are combined with the pixels already in a render buffer.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// Additive ("lighter").
    Add,
    /// Destination-out: source alpha erases the destination.
    Erase,
    /// Destination-in: keeps the destination only where the source has alpha.
    ///
    /// Used by mask compositing; display objects do not normally carry it.
    DestinationIn,
}

impl BlendMode {
    /// `true` for anything other than plain source-over.
    pub fn is_non_default(self) -> bool {
        self != BlendMode::Normal
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Convert a `0xRRGGBB` color plus a unit alpha.
    pub fn from_rgb_u32(rgb: u32, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::from_straight_rgba((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, a)
    }

    /// Channels as `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Immutable premultiplied RGBA8 pixels shared between render nodes.
///
/// Cloning is cheap; pixels are reference counted.
#[derive(Clone, Debug, PartialEq)]
pub struct BitmapData {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl BitmapData {
    /// Wrap already-premultiplied RGBA8 bytes.
    pub fn from_premul(width: u32, height: u32, pixels: Vec<u8>) -> StageResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| StageError::validation("bitmap size overflow"))?;
        if pixels.len() != expected {
            return Err(StageError::validation(format!(
                "bitmap byte len {} does not match {width}x{height}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// Premultiply straight-alpha RGBA8 bytes and wrap them.
    pub fn from_straight_rgba(width: u32, height: u32, mut pixels: Vec<u8>) -> StageResult<Self> {
        crate::foundation::math::premultiply_rgba8_in_place(&mut pixels);
        Self::from_premul(width, height, pixels)
    }

    /// A bitmap filled with one color.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let pixels = px.repeat((width as usize) * (height as usize));
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The pixel at `(x, y)`, or transparent when out of range.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// `true` when the bitmap holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
