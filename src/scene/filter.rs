use crate::foundation::error::{StageError, StageResult};

/// 4x5 color matrix applied to straight-alpha RGBA.
///
/// Rows produce `r, g, b, a`; each row is `[r, g, b, a, offset]` with the offset in 0..255 units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorMatrix {
    /// Row-major coefficients.
    pub m: [f32; 20],
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorMatrix {
    /// Leaves colors untouched.
    pub const IDENTITY: ColorMatrix = ColorMatrix {
        m: [
            1.0, 0.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ],
    };

    /// Per-channel multipliers and offsets, the classic "color transform".
    pub fn color_transform(mul: [f32; 4], offset: [f32; 4]) -> Self {
        let mut m = [0.0; 20];
        for i in 0..4 {
            m[i * 5 + i] = mul[i];
            m[i * 5 + 4] = offset[i];
        }
        Self { m }
    }

    /// Luminance-preserving grayscale.
    pub fn grayscale() -> Self {
        let (r, g, b) = (0.2126, 0.7152, 0.0722);
        Self {
            m: [
                r, g, b, 0.0, 0.0, //
                r, g, b, 0.0, 0.0, //
                r, g, b, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, 0.0,
            ],
        }
    }

    /// Apply to one straight-alpha RGBA8 pixel.
    pub fn apply_straight(&self, px: [u8; 4]) -> [u8; 4] {
        let src = px.map(f32::from);
        let mut out = [0u8; 4];
        for (row, o) in out.iter_mut().enumerate() {
            let k = &self.m[row * 5..row * 5 + 5];
            let v = k[0] * src[0] + k[1] * src[1] + k[2] * src[2] + k[3] * src[3] + k[4];
            *o = v.round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}

/// Post-process effect attached to a display object.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Color matrix ("color transform") applied per pixel.
    ColorMatrix(ColorMatrix),
    /// Separable gaussian blur.
    Blur {
        /// Horizontal blur radius in pixels.
        blur_x: f32,
        /// Vertical blur radius in pixels.
        blur_y: f32,
    },
    /// Colored halo derived from the content's alpha.
    Glow {
        /// `0xRRGGBB` glow color.
        color: u32,
        /// Glow opacity.
        alpha: f32,
        /// Horizontal blur radius in pixels.
        blur_x: f32,
        /// Vertical blur radius in pixels.
        blur_y: f32,
        /// Alpha multiplier applied to the blurred halo.
        strength: f32,
        /// Glow inside the shape instead of around it.
        #[serde(default)]
        inner: bool,
        /// Drop the content and keep only the glow.
        #[serde(default)]
        knockout: bool,
    },
    /// Offset glow behind the content.
    DropShadow {
        /// Offset length in pixels.
        distance: f32,
        /// Offset direction in degrees.
        angle: f32,
        /// `0xRRGGBB` shadow color.
        color: u32,
        /// Shadow opacity.
        alpha: f32,
        /// Horizontal blur radius in pixels.
        blur_x: f32,
        /// Vertical blur radius in pixels.
        blur_y: f32,
        /// Alpha multiplier applied to the blurred shadow.
        strength: f32,
        /// Drop the content and keep only the shadow.
        #[serde(default)]
        knockout: bool,
    },
}

impl Filter {
    /// `true` for the per-pixel color filter that can be applied while drawing.
    pub fn is_color_transform(&self) -> bool {
        matches!(self, Filter::ColorMatrix(_))
    }

    /// Pixels the filter may spread content beyond its source bounds.
    pub fn padding(&self) -> f64 {
        match self {
            Filter::ColorMatrix(_) => 0.0,
            Filter::Blur { blur_x, blur_y } => f64::from(blur_x.max(*blur_y).max(0.0)),
            Filter::Glow {
                blur_x,
                blur_y,
                inner,
                ..
            } => {
                if *inner {
                    0.0
                } else {
                    f64::from(blur_x.max(*blur_y).max(0.0))
                }
            }
            Filter::DropShadow {
                distance,
                blur_x,
                blur_y,
                ..
            } => f64::from(blur_x.max(*blur_y).max(0.0) + distance.abs()),
        }
    }

    /// Reject non-finite or negative parameters.
    pub fn validate(&self) -> StageResult<()> {
        let finite_non_negative = |name: &str, v: f32| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(StageError::validation(format!(
                    "filter {name} must be finite and >= 0"
                )))
            }
        };
        match self {
            Filter::ColorMatrix(cm) => {
                if cm.m.iter().all(|v| v.is_finite()) {
                    Ok(())
                } else {
                    Err(StageError::validation("color matrix must be finite"))
                }
            }
            Filter::Blur { blur_x, blur_y } => {
                finite_non_negative("blur_x", *blur_x)?;
                finite_non_negative("blur_y", *blur_y)
            }
            Filter::Glow {
                alpha,
                blur_x,
                blur_y,
                strength,
                ..
            } => {
                finite_non_negative("alpha", *alpha)?;
                finite_non_negative("blur_x", *blur_x)?;
                finite_non_negative("blur_y", *blur_y)?;
                finite_non_negative("strength", *strength)
            }
            Filter::DropShadow {
                distance,
                angle,
                alpha,
                blur_x,
                blur_y,
                strength,
                ..
            } => {
                if !distance.is_finite() || !angle.is_finite() {
                    return Err(StageError::validation(
                        "drop shadow distance and angle must be finite",
                    ));
                }
                finite_non_negative("alpha", *alpha)?;
                finite_non_negative("blur_x", *blur_x)?;
                finite_non_negative("blur_y", *blur_y)?;
                finite_non_negative("strength", *strength)
            }
        }
    }
}

/// Combined padding of a filter chain.
pub fn chain_padding(filters: &[Filter]) -> f64 {
    filters.iter().map(Filter::padding).sum()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/filter.rs"]
mod tests;
