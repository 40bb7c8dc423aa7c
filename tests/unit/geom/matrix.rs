use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn pre_multiply_applies_other_first() {
    let scale = Matrix::scale(2.0, 3.0);
    let shift = Matrix::translation(10.0, 20.0);

    // shift first, then scale
    let m = scale.pre_multiply(&shift);
    let p = m.transform_point(1.0, 1.0);
    assert!(approx(p.x, 22.0));
    assert!(approx(p.y, 63.0));

    // scale first, then shift
    let m = shift.pre_multiply(&scale);
    let p = m.transform_point(1.0, 1.0);
    assert!(approx(p.x, 12.0));
    assert!(approx(p.y, 23.0));
}

#[test]
fn pre_multiply_matches_kurbo() {
    let a = Matrix::new(1.5, 0.2, -0.3, 0.7, 4.0, -2.0);
    let b = Matrix::rotation(0.4).translated(3.0, 1.0);
    let ours = a.pre_multiply(&b);
    let theirs = Matrix::from(Affine::from(a) * Affine::from(b));
    assert!(approx(ours.a, theirs.a));
    assert!(approx(ours.b, theirs.b));
    assert!(approx(ours.c, theirs.c));
    assert!(approx(ours.d, theirs.d));
    assert!(approx(ours.tx, theirs.tx));
    assert!(approx(ours.ty, theirs.ty));
}

#[test]
fn invert_roundtrips_and_rejects_singular() {
    let m = Matrix::new(2.0, 0.0, 0.0, 4.0, 8.0, -4.0);
    let inv = m.invert().unwrap();
    let id = m.pre_multiply(&inv);
    assert!(approx(id.a, 1.0) && approx(id.d, 1.0));
    assert!(approx(id.tx, 0.0) && approx(id.ty, 0.0));

    assert!(Matrix::scale(0.0, 1.0).invert().is_none());
}

#[test]
fn degenerate_scale_detection() {
    assert!(Matrix::new(0.0, 0.0, 0.0, 1.0, 5.0, 5.0).is_degenerate_scale());
    assert!(Matrix::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0).is_degenerate_scale());
    assert!(!Matrix::rotation(1.0).is_degenerate_scale());
    assert!(!Matrix::IDENTITY.is_degenerate_scale());
}

#[test]
fn axis_alignment() {
    assert!(Matrix::scale(2.0, -1.0).is_axis_aligned());
    assert!(!Matrix::rotation(0.1).is_axis_aligned());
}

#[test]
fn transform_bounds_of_rotated_square() {
    let m = Matrix::rotation(std::f64::consts::FRAC_PI_2);
    let r = m.transform_bounds(Rect::new(0.0, 0.0, 10.0, 20.0));
    assert!(approx(r.x0, -20.0));
    assert!(approx(r.x1, 0.0));
    assert!(approx(r.y0, 0.0));
    assert!(approx(r.y1, 10.0));
}

#[test]
fn matrix_pool_hands_out_checked_handles() {
    let mut pool = MatrixPool::new();
    let h = pool.create(Matrix::translation(1.0, 2.0));
    assert_eq!(pool.get(h).unwrap().tx, 1.0);
    pool.release(h).unwrap();
    assert!(pool.get(h).is_err());
}
