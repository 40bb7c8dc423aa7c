use super::*;
use crate::render::cpu::CpuRenderBuffer;

#[test]
fn clip_scope_prefers_scissor_for_axis_aligned_transforms() {
    let mut buf = CpuRenderBuffer::new(8, 8);
    {
        let scope = ClipScope::push(&mut buf, Rect::new(0.0, 0.0, 2.0, 2.0), &Matrix::scale(2.0, 2.0));
        assert!(scope.uses_scissor());
        assert!(scope.has_scissor());
        assert_eq!(scope.clip_depth(), 1);
    }
    assert_eq!(buf.clip_depth(), 0);
    assert!(!buf.has_scissor());
}

#[test]
fn nested_clip_scope_falls_back_to_mask() {
    let mut buf = CpuRenderBuffer::new(8, 8);
    let mut outer = ClipScope::push(&mut buf, Rect::new(0.0, 0.0, 4.0, 4.0), &Matrix::IDENTITY);
    {
        let inner = ClipScope::push(&mut *outer, Rect::new(1.0, 1.0, 3.0, 3.0), &Matrix::IDENTITY);
        assert!(!inner.uses_scissor());
        assert_eq!(inner.clip_depth(), 2);
    }
    assert!(outer.uses_scissor());
    assert_eq!(outer.clip_depth(), 1);
    drop(outer);
    assert_eq!(buf.clip_depth(), 0);
}

#[test]
fn rotated_clip_uses_mask() {
    let mut buf = CpuRenderBuffer::new(8, 8);
    let scope = ClipScope::push(&mut buf, Rect::new(0.0, 0.0, 2.0, 2.0), &Matrix::rotation(0.5));
    assert!(!scope.uses_scissor());
}

#[test]
fn blend_scope_restores_previous_mode() {
    let mut buf = CpuRenderBuffer::new(1, 1);
    buf.set_blend_mode(BlendMode::Add);
    {
        let scope = BlendScope::new(&mut buf, BlendMode::Erase);
        assert_eq!(scope.blend_mode(), BlendMode::Erase);
    }
    assert_eq!(buf.blend_mode(), BlendMode::Add);
}

#[test]
fn filter_scope_restores_previous_filter() {
    let mut buf = CpuRenderBuffer::new(1, 1);
    {
        let scope = FilterScope::new(&mut buf, Some(ColorMatrix::grayscale()));
        assert_eq!(scope.color_filter(), Some(ColorMatrix::grayscale()));
    }
    assert_eq!(buf.color_filter(), None);
}

#[test]
fn state_scope_restores_matrix_and_clips() {
    let mut buf = CpuRenderBuffer::new(4, 4);
    {
        let mut scope = StateScope::new(&mut buf);
        scope.translate(3.0, 4.0);
        scope.clip_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(scope.matrix(), Matrix::translation(3.0, 4.0));
    }
    assert_eq!(buf.matrix(), Matrix::IDENTITY);
    assert_eq!(buf.clip_depth(), 0);
}

#[test]
fn transform_applies_before_current_matrix() {
    let mut buf = CpuRenderBuffer::new(1, 1);
    buf.set_matrix(Matrix::scale(2.0, 2.0));
    buf.translate(1.0, 0.0);
    assert_eq!(buf.matrix().transform_point(0.0, 0.0), Point::new(2.0, 0.0));
    buf.reset_matrix();
    assert_eq!(buf.matrix(), Matrix::IDENTITY);
}

#[test]
fn mime_types() {
    assert_eq!(EncodeFormat::Png.mime(), "image/png");
    assert_eq!(EncodeFormat::Jpeg.mime(), "image/jpeg");
}
