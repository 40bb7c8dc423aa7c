use super::*;

#[test]
fn identity_matrix_keeps_pixel() {
    let px = [12, 200, 99, 180];
    assert_eq!(ColorMatrix::IDENTITY.apply_straight(px), px);
}

#[test]
fn color_transform_scales_and_offsets() {
    let cm = ColorMatrix::color_transform([0.5, 1.0, 0.0, 1.0], [0.0, 10.0, 255.0, 0.0]);
    assert_eq!(cm.apply_straight([200, 100, 50, 255]), [100, 110, 255, 255]);
}

#[test]
fn grayscale_equalizes_channels() {
    let out = ColorMatrix::grayscale().apply_straight([255, 0, 0, 255]);
    assert_eq!(out[0], out[1]);
    assert_eq!(out[1], out[2]);
    assert_eq!(out[3], 255);
}

#[test]
fn only_color_matrix_is_color_transform() {
    assert!(Filter::ColorMatrix(ColorMatrix::IDENTITY).is_color_transform());
    assert!(
        !Filter::Blur {
            blur_x: 1.0,
            blur_y: 1.0
        }
        .is_color_transform()
    );
}

#[test]
fn padding_accounts_for_blur_and_shadow_offset() {
    let blur = Filter::Blur {
        blur_x: 4.0,
        blur_y: 6.0,
    };
    assert_eq!(blur.padding(), 6.0);

    let shadow = Filter::DropShadow {
        distance: 5.0,
        angle: 45.0,
        color: 0,
        alpha: 1.0,
        blur_x: 2.0,
        blur_y: 2.0,
        strength: 1.0,
        knockout: false,
    };
    assert_eq!(shadow.padding(), 7.0);
    assert_eq!(chain_padding(&[blur, shadow]), 13.0);
}

#[test]
fn validate_rejects_negative_blur() {
    let f = Filter::Blur {
        blur_x: -1.0,
        blur_y: 0.0,
    };
    assert!(f.validate().is_err());
}

#[test]
fn filters_deserialize_from_tagged_json() {
    let f: Filter = serde_json::from_value(serde_json::json!({
        "type": "glow",
        "color": 16711680,
        "alpha": 1.0,
        "blur_x": 3.0,
        "blur_y": 3.0,
        "strength": 2.0
    }))
    .unwrap();
    assert!(matches!(
        f,
        Filter::Glow {
            inner: false,
            knockout: false,
            ..
        }
    ));
}
