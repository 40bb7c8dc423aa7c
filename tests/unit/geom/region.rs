use super::*;

#[test]
fn empty_iff_non_positive_extent() {
    assert!(Region::EMPTY.is_empty());
    assert!(Region::from_xywh(0.0, 0.0, 0.0, 5.0).is_empty());
    assert!(Region::from_xywh(0.0, 0.0, 5.0, -1.0).is_empty());
    assert!(!Region::from_xywh(0.0, 0.0, 1.0, 1.0).is_empty());
}

#[test]
fn update_region_snaps_outward() {
    let r = Region::from_bounds(
        Rect::new(0.0, 0.0, 10.0, 10.0),
        &Matrix::translation(0.5, 0.25),
    );
    assert_eq!(r, Region::new(0.0, 0.0, 11.0, 11.0));
}

#[test]
fn update_region_of_empty_bounds_is_empty() {
    let mut r = Region::from_xywh(1.0, 1.0, 4.0, 4.0);
    r.update_region(Rect::new(5.0, 5.0, 5.0, 9.0), &Matrix::IDENTITY);
    assert!(r.is_empty());
}

#[test]
fn update_region_covers_rotated_rect() {
    let r = Region::from_bounds(
        Rect::new(0.0, 0.0, 10.0, 10.0),
        &Matrix::rotation(std::f64::consts::FRAC_PI_4),
    );
    assert!(r.min_x <= -7.0 && r.max_x >= 7.0);
    assert!(r.min_y <= 0.0 && r.max_y >= 14.0);
}

#[test]
fn edge_contact_is_not_intersection() {
    let a = Region::from_xywh(0.0, 0.0, 50.0, 50.0);
    let b = Region::from_xywh(50.0, 50.0, 100.0, 100.0);
    assert!(!a.intersects(&b));
    assert!(!b.intersects(&a));

    let c = Region::from_xywh(49.0, 49.0, 2.0, 2.0);
    assert!(a.intersects(&c));
}

#[test]
fn empty_never_intersects() {
    let a = Region::from_xywh(0.0, 0.0, 50.0, 50.0);
    assert!(!a.intersects(&Region::EMPTY));
    assert!(!Region::new(10.0, 10.0, 10.0, 40.0).intersects(&a));
}

#[test]
fn intersect_mutates_to_overlap() {
    let mut a = Region::from_xywh(0.0, 0.0, 100.0, 100.0);
    a.intersect(&Region::from_xywh(50.0, 25.0, 100.0, 10.0));
    assert_eq!(a, Region::new(50.0, 25.0, 100.0, 35.0));

    a.intersect(&Region::from_xywh(200.0, 200.0, 5.0, 5.0));
    assert!(a.is_empty());
}

#[test]
fn union_and_inflate() {
    let mut a = Region::EMPTY;
    a.union(&Region::from_xywh(10.0, 10.0, 5.0, 5.0));
    a.union(&Region::from_xywh(0.0, 20.0, 1.0, 1.0));
    assert_eq!(a, Region::new(0.0, 10.0, 15.0, 21.0));

    a.inflate(1.5);
    assert_eq!(a, Region::new(-2.0, 8.0, 17.0, 23.0));
}

#[test]
fn intersects_any_scans_list() {
    let r = Region::from_xywh(10.0, 10.0, 10.0, 10.0);
    let dirty = [
        Region::from_xywh(0.0, 0.0, 5.0, 5.0),
        Region::from_xywh(15.0, 15.0, 1.0, 1.0),
    ];
    assert!(intersects_any(&r, &dirty));
    assert!(!intersects_any(&r, &dirty[..1]));
    assert!(!intersects_any(&r, &[]));
}

#[test]
fn offset_moves_non_empty_regions_only() {
    let r = Region::from_xywh(1.0, 2.0, 3.0, 4.0).offset(10.0, -2.0);
    assert_eq!(r, Region::new(11.0, 0.0, 14.0, 4.0));
    assert_eq!(Region::EMPTY.offset(5.0, 5.0), Region::EMPTY);
}
