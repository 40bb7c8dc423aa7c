use super::*;

#[test]
fn create_get_release_roundtrip() {
    let mut pool = Pool::new();
    let h = pool.create(41);
    *pool.get_mut(h).unwrap() += 1;
    assert_eq!(*pool.get(h).unwrap(), 42);
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.release(h).unwrap(), 42);
    assert!(pool.is_empty());
}

#[test]
fn released_handle_is_stale_even_after_slot_reuse() {
    let mut pool = Pool::new();
    let old = pool.create("a");
    pool.release(old).unwrap();
    let new = pool.create("b");

    assert_eq!(old.index(), new.index());
    assert_ne!(old.generation(), new.generation());
    assert_eq!(pool.capacity(), 1);

    let err = pool.get(old).unwrap_err();
    assert!(matches!(err, StageError::StaleHandle { .. }));
    assert!(pool.release(old).is_err());
    assert_eq!(*pool.get(new).unwrap(), "b");
}

#[test]
fn double_release_is_rejected() {
    let mut pool = Pool::new();
    let h = pool.create(1u8);
    pool.release(h).unwrap();
    assert!(pool.release(h).is_err());
    assert_eq!(pool.len(), 0);
}

#[test]
fn iter_skips_released_slots() {
    let mut pool = Pool::new();
    let a = pool.create(1);
    let _b = pool.create(2);
    let _c = pool.create(3);
    pool.release(a).unwrap();
    let values: Vec<i32> = pool.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec![2, 3]);
}
