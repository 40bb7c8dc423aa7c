use super::*;
use crate::render::cpu::CpuRenderBuffer;

fn pool(capacity: usize, shrink_on_trim: bool) -> RenderBufferPool<CpuRenderBuffer> {
    RenderBufferPool::new(BufferPoolOpts {
        capacity,
        shrink_on_trim,
    })
}

#[test]
fn empty_pool_creates_compatible_buffer() {
    let like = CpuRenderBuffer::new(1, 1);
    let mut p = pool(2, false);
    let b = p.acquire(&like, 5, 3);
    assert_eq!((b.width(), b.height()), (5, 3));
    assert_eq!(p.stats().created, 1);
    assert!(p.is_empty());
}

#[test]
fn released_buffer_is_reused_cleared_with_default_state() {
    let like = CpuRenderBuffer::new(1, 1);
    let mut p = pool(2, false);
    let mut b = p.acquire(&like, 2, 2);
    b.fill([9, 9, 9, 9]);
    b.set_alpha(0.3);
    b.set_blend_mode(BlendMode::Add);
    b.set_matrix(Matrix::translation(4.0, 4.0));
    p.release(b);

    let b = p.acquire(&like, 2, 2);
    assert_eq!(b.get_pixels(0, 0, 2, 2), vec![0u8; 16]);
    assert_eq!(b.alpha(), 1.0);
    assert_eq!(b.blend_mode(), BlendMode::Normal);
    assert_eq!(b.matrix(), Matrix::IDENTITY);
    assert_eq!(p.stats().reused, 1);
}

#[test]
fn acquire_prefers_smallest_covering_buffer() {
    let like = CpuRenderBuffer::new(1, 1);
    let mut p = pool(4, false);
    p.release(CpuRenderBuffer::new(100, 100));
    p.release(CpuRenderBuffer::new(10, 10));
    p.release(CpuRenderBuffer::new(4, 4));
    let _b = p.acquire(&like, 8, 8);
    let left: Vec<u32> = p.iter().map(|b| b.width()).collect();
    assert_eq!(left, vec![100, 4]);
}

#[test]
fn trim_drops_excess_and_shrinks_rest() {
    let mut p = pool(1, true);
    for _ in 0..3 {
        p.release(CpuRenderBuffer::new(8, 8));
    }
    assert_eq!(p.trim(), 2);
    assert_eq!(p.len(), 1);
    assert!(p.iter().all(|b| b.width() == 0 && b.height() == 0));
    let stats = p.stats();
    assert_eq!(stats.trimmed, 2);
    assert_eq!(stats.retained, 1);
}

#[test]
fn trim_without_shrink_keeps_sizes() {
    let mut p = pool(2, false);
    p.release(CpuRenderBuffer::new(8, 8));
    assert_eq!(p.trim(), 0);
    assert!(p.iter().all(|b| b.width() == 8));
}
