use crate::foundation::core::BlendMode;
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

pub(crate) type PremulRgba8 = [u8; 4];

/// Source-over with `opacity` in 0..=255.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, opacity: u16) -> PremulRgba8 {
    if opacity == 0 || src[3] == 0 {
        return dst;
    }
    let sa = mul_div255_u8(u16::from(src[3]), opacity);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), opacity);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Additive ("lighter"): channels sum and saturate.
pub(crate) fn add(dst: PremulRgba8, src: PremulRgba8, opacity: u16) -> PremulRgba8 {
    let mut out = dst;
    for i in 0..4 {
        out[i] = add_sat_u8(dst[i], mul_div255_u8(u16::from(src[i]), opacity));
    }
    out
}

/// Destination-out: the source's alpha cuts a hole in the destination.
pub(crate) fn erase(dst: PremulRgba8, src: PremulRgba8, opacity: u16) -> PremulRgba8 {
    let sa = mul_div255_u8(u16::from(src[3]), opacity);
    let keep = 255u16 - u16::from(sa);
    dst.map(|c| mul_div255_u8(u16::from(c), keep))
}

/// Destination-in: the destination survives only where the source has alpha.
pub(crate) fn destination_in(dst: PremulRgba8, src: PremulRgba8, opacity: u16) -> PremulRgba8 {
    let sa = u16::from(mul_div255_u8(u16::from(src[3]), opacity));
    dst.map(|c| mul_div255_u8(u16::from(c), sa))
}

pub(crate) fn blend(mode: BlendMode, dst: PremulRgba8, src: PremulRgba8, opacity: u16) -> PremulRgba8 {
    match mode {
        BlendMode::Normal => over(dst, src, opacity),
        BlendMode::Add => add(dst, src, opacity),
        BlendMode::Erase => erase(dst, src, opacity),
        BlendMode::DestinationIn => destination_in(dst, src, opacity),
    }
}

/// `true` when a transparent source pixel leaves the destination untouched.
pub(crate) fn skips_transparent(mode: BlendMode) -> bool {
    !matches!(mode, BlendMode::DestinationIn)
}

#[cfg(test)]
#[path = "../../../tests/unit/render/cpu/composite.rs"]
mod tests;
