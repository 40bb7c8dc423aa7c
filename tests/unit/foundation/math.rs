use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(128, 128), 64);
}

#[test]
fn next_pow2_pads_scratch_sizes() {
    assert_eq!(next_pow2(0.0), 2);
    assert_eq!(next_pow2(2.0), 2);
    assert_eq!(next_pow2(3.0), 4);
    assert_eq!(next_pow2(100.0), 128);
    assert_eq!(next_pow2(128.5), 256);
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![200u8, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px[3], 128);
    assert!(px[0] < 200);
    unpremultiply_rgba8_in_place(&mut px);
    assert!((i32::from(px[0]) - 200).abs() <= 2);
    assert!((i32::from(px[1]) - 100).abs() <= 2);
}

#[test]
fn unpremultiply_transparent_is_black() {
    let mut px = vec![9u8, 9, 9, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}
