use super::*;

#[test]
fn premul_from_straight_rounds() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
}

#[test]
fn rgb_u32_splits_channels() {
    let c = Rgba8Premul::from_rgb_u32(0xff_00_80, 1.0);
    assert_eq!(c.to_array(), [255, 0, 128, 255]);
}

#[test]
fn bitmap_rejects_wrong_len() {
    let err = BitmapData::from_premul(2, 2, vec![0; 15]).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn bitmap_pixel_lookup_is_bounds_checked() {
    let bmp = BitmapData::solid(2, 1, Rgba8Premul::from_straight_rgba(10, 20, 30, 255));
    assert_eq!(bmp.pixel(1, 0), [10, 20, 30, 255]);
    assert_eq!(bmp.pixel(2, 0), [0, 0, 0, 0]);
    assert!(!bmp.is_empty());
    assert!(BitmapData::solid(0, 4, Rgba8Premul::transparent()).is_empty());
}

#[test]
fn blend_mode_default_is_normal() {
    assert_eq!(BlendMode::default(), BlendMode::Normal);
    assert!(!BlendMode::Normal.is_non_default());
    assert!(BlendMode::Add.is_non_default());
}
