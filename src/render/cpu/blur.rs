use crate::foundation::error::{StageError, StageResult};

/// Separable gaussian blur over interleaved 8-bit channels.
///
/// `channels` is 4 for premultiplied RGBA and 1 for alpha planes. Radii are in pixels; each
/// axis uses `sigma = radius / 2`. Edges clamp.
pub(crate) fn blur_plane(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    radius_x: u32,
    radius_y: u32,
) -> StageResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| StageError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(StageError::render(
            "blur expects src matching width*height*channels",
        ));
    }
    if expected_len == 0 || (radius_x == 0 && radius_y == 0) {
        return Ok(src.to_vec());
    }

    let geom = Plane {
        width: width as i32,
        height: height as i32,
        channels,
    };
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    let kx = gaussian_kernel_q16(radius_x)?;
    let ky = gaussian_kernel_q16(radius_y)?;
    horizontal_pass(src, &mut tmp, geom, &kx);
    vertical_pass(&tmp, &mut out, geom, &ky);
    Ok(out)
}

#[derive(Clone, Copy)]
struct Plane {
    width: i32,
    height: i32,
    channels: usize,
}

fn gaussian_kernel_q16(radius: u32) -> StageResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    let sigma = f64::from(radius) / 2.0;
    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(StageError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], p: Plane, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    for y in 0..p.height {
        for x in 0..p.width {
            let out_idx = ((y * p.width + x) as usize) * p.channels;
            for c in 0..p.channels {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i32 - radius).clamp(0, p.width - 1);
                    let idx = ((y * p.width + sx) as usize) * p.channels;
                    acc += u64::from(kw) * u64::from(src[idx + c]);
                }
                dst[out_idx + c] = q16_to_u8(acc);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], p: Plane, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    for y in 0..p.height {
        for x in 0..p.width {
            let out_idx = ((y * p.width + x) as usize) * p.channels;
            for c in 0..p.channels {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y + ki as i32 - radius).clamp(0, p.height - 1);
                    let idx = ((sy * p.width + x) as usize) * p.channels;
                    acc += u64::from(kw) * u64::from(src[idx + c]);
                }
                dst[out_idx + c] = q16_to_u8(acc);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../../tests/unit/render/cpu/blur.rs"]
mod tests;
