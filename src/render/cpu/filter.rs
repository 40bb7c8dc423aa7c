use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::StageResult;
use crate::foundation::math::{mul_div255_u8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::render::cpu::blur::blur_plane;
use crate::render::cpu::composite::{erase, over};
use crate::scene::filter::{ColorMatrix, Filter};

/// Run a filter chain over premultiplied top-down pixels, in order.
pub(crate) fn apply_filters(
    pixels: &mut Vec<u8>,
    width: u32,
    height: u32,
    filters: &[Filter],
) -> StageResult<()> {
    for f in filters {
        apply_filter(pixels, width, height, f)?;
    }
    Ok(())
}

fn radius(blur: f32) -> u32 {
    blur.max(0.0).ceil() as u32
}

fn apply_filter(pixels: &mut Vec<u8>, width: u32, height: u32, f: &Filter) -> StageResult<()> {
    match *f {
        Filter::ColorMatrix(cm) => color_matrix_in_place(pixels, &cm),
        Filter::Blur { blur_x, blur_y } => {
            *pixels = blur_plane(pixels, width, height, 4, radius(blur_x), radius(blur_y))?;
        }
        Filter::Glow {
            color,
            alpha,
            blur_x,
            blur_y,
            strength,
            inner,
            knockout,
        } => {
            let halo = Halo {
                color,
                alpha,
                radius_x: radius(blur_x),
                radius_y: radius(blur_y),
                strength,
                inner,
                knockout,
                dx: 0,
                dy: 0,
            };
            *pixels = halo.apply(pixels, width, height)?;
        }
        Filter::DropShadow {
            distance,
            angle,
            color,
            alpha,
            blur_x,
            blur_y,
            strength,
            knockout,
        } => {
            let rad = f64::from(angle).to_radians();
            let halo = Halo {
                color,
                alpha,
                radius_x: radius(blur_x),
                radius_y: radius(blur_y),
                strength,
                inner: false,
                knockout,
                dx: (rad.cos() * f64::from(distance)).round() as i64,
                dy: (rad.sin() * f64::from(distance)).round() as i64,
            };
            *pixels = halo.apply(pixels, width, height)?;
        }
    }
    Ok(())
}

/// Apply a color matrix to one premultiplied pixel.
pub(crate) fn filter_pixel(px: [u8; 4], cm: &ColorMatrix) -> [u8; 4] {
    let mut p = px;
    unpremultiply_rgba8_in_place(&mut p);
    let mut out = cm.apply_straight(p);
    premultiply_rgba8_in_place(&mut out);
    out
}

pub(crate) fn color_matrix_in_place(pixels: &mut [u8], cm: &ColorMatrix) {
    for px in pixels.chunks_exact_mut(4) {
        let out = filter_pixel([px[0], px[1], px[2], px[3]], cm);
        px.copy_from_slice(&out);
    }
}

/// Blurred, tinted copy of the content's alpha: glows and drop shadows.
struct Halo {
    color: u32,
    alpha: f32,
    radius_x: u32,
    radius_y: u32,
    strength: f32,
    inner: bool,
    knockout: bool,
    dx: i64,
    dy: i64,
}

impl Halo {
    fn apply(&self, pixels: &[u8], width: u32, height: u32) -> StageResult<Vec<u8>> {
        let (w, h) = (i64::from(width), i64::from(height));
        let mut plane = vec![0u8; (width as usize) * (height as usize)];
        for y in 0..h {
            for x in 0..w {
                let (sx, sy) = (x - self.dx, y - self.dy);
                let a = if (0..w).contains(&sx) && (0..h).contains(&sy) {
                    pixels[((sy * w + sx) as usize) * 4 + 3]
                } else {
                    0
                };
                plane[(y * w + x) as usize] = if self.inner { 255 - a } else { a };
            }
        }
        let blurred = blur_plane(&plane, width, height, 1, self.radius_x, self.radius_y)?;

        let tint = Rgba8Premul::from_rgb_u32(self.color, 1.0);
        let gain = (self.strength * self.alpha).max(0.0);
        let mut out = vec![0u8; pixels.len()];
        for (i, (o, src)) in out
            .chunks_exact_mut(4)
            .zip(pixels.chunks_exact(4))
            .enumerate()
        {
            let src = [src[0], src[1], src[2], src[3]];
            let mut ga = (f32::from(blurred[i]) * gain).round().clamp(0.0, 255.0) as u16;
            if self.inner {
                ga = u16::from(mul_div255_u8(ga, u16::from(src[3])));
            }
            let glow = [
                mul_div255_u8(u16::from(tint.r), ga),
                mul_div255_u8(u16::from(tint.g), ga),
                mul_div255_u8(u16::from(tint.b), ga),
                ga as u8,
            ];
            let px = match (self.inner, self.knockout) {
                (false, false) => over(glow, src, 255),
                (false, true) => erase(glow, src, 255),
                (true, false) => over(src, glow, 255),
                (true, true) => glow,
            };
            o.copy_from_slice(&px);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/render/cpu/filter.rs"]
mod tests;
