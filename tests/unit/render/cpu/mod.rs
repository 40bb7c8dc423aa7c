use super::*;
use crate::foundation::core::Rgba8Premul;

const RED: [u8; 4] = [255, 0, 0, 255];

fn red(w: u32, h: u32) -> BitmapData {
    BitmapData::solid(w, h, Rgba8Premul::from_straight_rgba(255, 0, 0, 255))
}

fn full(img: &BitmapData) -> Rect {
    Rect::new(0.0, 0.0, f64::from(img.width()), f64::from(img.height()))
}

#[test]
fn new_buffer_is_transparent() {
    let buf = CpuRenderBuffer::new(3, 2);
    assert_eq!(buf.get_pixels(0, 0, 3, 2), vec![0u8; 24]);
    assert_eq!(buf.pixel(10, 10), [0; 4]);
}

#[test]
fn draw_image_follows_matrix() {
    let mut buf = CpuRenderBuffer::new(4, 4);
    let img = red(2, 2);
    buf.set_matrix(Matrix::translation(1.0, 1.0));
    buf.draw_image(&img, full(&img), full(&img));
    assert_eq!(buf.pixel(0, 0), [0; 4]);
    assert_eq!(buf.pixel(1, 1), RED);
    assert_eq!(buf.pixel(2, 2), RED);
    assert_eq!(buf.pixel(3, 3), [0; 4]);
}

#[test]
fn global_alpha_scales_source() {
    let mut buf = CpuRenderBuffer::new(1, 1);
    let img = red(1, 1);
    buf.set_alpha(0.5);
    buf.draw_image(&img, full(&img), full(&img));
    assert_eq!(buf.pixel(0, 0), [128, 0, 0, 128]);
}

#[test]
fn scissor_limits_drawing_until_popped() {
    let mut buf = CpuRenderBuffer::new(4, 4);
    let img = red(4, 4);
    buf.push_scissor(Rect::new(0.0, 0.0, 2.0, 2.0));
    assert!(buf.has_scissor());
    buf.draw_image(&img, full(&img), full(&img));
    assert_eq!(buf.pixel(1, 1), RED);
    assert_eq!(buf.pixel(2, 2), [0; 4]);

    buf.pop_scissor();
    assert_eq!(buf.clip_depth(), 0);
    buf.draw_image(&img, full(&img), full(&img));
    assert_eq!(buf.pixel(3, 3), RED);
}

#[test]
fn mask_clip_follows_its_transform() {
    let mut buf = CpuRenderBuffer::new(4, 4);
    let img = red(4, 4);
    buf.push_mask(Rect::new(0.0, 0.0, 1.0, 1.0), &Matrix::scale(2.0, 2.0));
    buf.draw_image(&img, full(&img), full(&img));
    assert_eq!(buf.pixel(1, 1), RED);
    assert_eq!(buf.pixel(2, 1), [0; 4]);
    buf.pop_mask();
    assert_eq!(buf.clip_depth(), 0);
}

#[test]
fn singular_mask_hides_everything() {
    let mut buf = CpuRenderBuffer::new(2, 2);
    let img = red(2, 2);
    buf.push_mask(Rect::new(0.0, 0.0, 2.0, 2.0), &Matrix::scale(0.0, 1.0));
    buf.draw_image(&img, full(&img), full(&img));
    assert_eq!(buf.get_pixels(0, 0, 2, 2), vec![0u8; 16]);
}

#[test]
fn restore_drops_clips_pushed_after_save() {
    let mut buf = CpuRenderBuffer::new(4, 4);
    buf.set_alpha(0.25);
    buf.save();
    buf.set_alpha(1.0);
    buf.push_scissor(Rect::new(0.0, 0.0, 1.0, 1.0));
    buf.clip_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
    assert_eq!(buf.clip_depth(), 2);
    buf.restore();
    assert_eq!(buf.clip_depth(), 0);
    assert_eq!(buf.alpha(), 0.25);
}

#[test]
fn bottom_left_storage_reads_top_down() {
    let mut buf = CpuRenderBuffer::with_origin(1, 2, SurfaceOrigin::BottomLeft);
    let img = red(1, 1);
    buf.draw_image(&img, full(&img), full(&img));
    assert_eq!(buf.pixel(0, 0), RED);
    assert_eq!(&buf.get_pixels(0, 0, 1, 2)[..4], &RED);
    assert_eq!(&buf.pixels[4..8], &RED);
    assert_eq!(&buf.pixels[..4], &[0; 4]);
}

#[test]
fn draw_buffer_places_in_device_space() {
    let mut dst = CpuRenderBuffer::new(4, 4);
    dst.set_matrix(Matrix::scale(3.0, 3.0));
    let mut src = CpuRenderBuffer::new(1, 1);
    src.fill(RED);
    dst.draw_buffer(&src, 2.0, 1.0);
    assert_eq!(dst.pixel(2, 1), RED);
    assert_eq!(dst.pixel(3, 1), [0; 4]);
}

#[test]
fn destination_in_clears_where_source_is_empty() {
    let mut dst = CpuRenderBuffer::new(2, 1);
    dst.fill(RED);
    let mut mask = CpuRenderBuffer::new(2, 1);
    let img = red(1, 1);
    mask.draw_image(&img, full(&img), full(&img));
    dst.set_blend_mode(BlendMode::DestinationIn);
    dst.draw_buffer(&mask, 0.0, 0.0);
    assert_eq!(dst.pixel(0, 0), RED);
    assert_eq!(dst.pixel(1, 0), [0; 4]);
}

#[test]
fn filtered_composite_applies_color_matrix() {
    let mut dst = CpuRenderBuffer::new(1, 1);
    let mut src = CpuRenderBuffer::new(1, 1);
    src.fill(RED);
    let zero_red = ColorMatrix::color_transform([0.0, 1.0, 1.0, 1.0], [0.0, 255.0, 0.0, 0.0]);
    dst.draw_buffer_with_filters(&src, &[Filter::ColorMatrix(zero_red)], 0.0, 0.0);
    assert_eq!(dst.pixel(0, 0), [0, 255, 0, 255]);
}

#[test]
fn color_filter_state_tints_image_draws() {
    let mut buf = CpuRenderBuffer::new(1, 1);
    let img = red(1, 1);
    buf.set_color_filter(Some(ColorMatrix::color_transform(
        [0.0, 0.0, 1.0, 1.0],
        [0.0, 0.0, 255.0, 0.0],
    )));
    buf.draw_image(&img, full(&img), full(&img));
    assert_eq!(buf.pixel(0, 0), [0, 0, 255, 255]);
}

#[test]
fn resize_with_offset_keeps_content() {
    let mut buf = CpuRenderBuffer::new(2, 2);
    buf.fill(RED);
    buf.resize(3, 3, Some(Point::new(1.0, 1.0)));
    assert_eq!(buf.pixel(0, 0), [0; 4]);
    assert_eq!(buf.pixel(2, 2), RED);

    buf.resize(2, 2, None);
    assert_eq!(buf.get_pixels(0, 0, 2, 2), vec![0u8; 16]);
}

#[test]
fn clear_rect_only_touches_the_rect() {
    let mut buf = CpuRenderBuffer::new(2, 1);
    buf.fill(RED);
    buf.clear_rect(Rect::new(1.0, 0.0, 2.0, 1.0));
    assert_eq!(buf.pixel(0, 0), RED);
    assert_eq!(buf.pixel(1, 0), [0; 4]);
}

#[test]
fn mesh_quad_covers_its_triangles() {
    let mut buf = CpuRenderBuffer::new(4, 4);
    let img = red(2, 2);
    let vertices = [0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0];
    let uvs = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    buf.draw_mesh(
        &img,
        full(&img),
        Point::ZERO,
        &vertices,
        &uvs,
        &[0, 1, 2, 0, 2, 3],
    );
    for (x, y) in [(0, 0), (3, 0), (1, 2), (3, 3)] {
        assert_eq!(buf.pixel(x, y), RED, "pixel {x},{y}");
    }
}

#[test]
fn get_pixels_outside_reads_transparent() {
    let mut buf = CpuRenderBuffer::new(1, 1);
    buf.fill(RED);
    let px = buf.get_pixels(-1, 0, 2, 1);
    assert_eq!(&px[..4], &[0; 4]);
    assert_eq!(&px[4..], &RED);
}

#[test]
fn data_url_encodes_png_and_jpeg() {
    let mut buf = CpuRenderBuffer::new(2, 2);
    buf.fill(RED);
    let png = buf.to_data_url(EncodeFormat::Png, None).unwrap();
    assert!(png.starts_with("data:image/png;base64,iVBOR"));
    let jpeg = buf.to_data_url(EncodeFormat::Jpeg, Some(0.5)).unwrap();
    assert!(jpeg.starts_with("data:image/jpeg;base64,/9j/"));
}

#[test]
fn empty_buffer_cannot_be_encoded() {
    let buf = CpuRenderBuffer::new(0, 3);
    assert!(matches!(
        buf.to_data_url(EncodeFormat::Png, None),
        Err(StageError::Encode(_))
    ));
}

#[test]
fn to_bitmap_snapshots_pixels() {
    let mut buf = CpuRenderBuffer::new(1, 1);
    buf.fill(RED);
    let bmp = buf.to_bitmap().unwrap();
    assert_eq!(bmp.pixel(0, 0), RED);
}

#[test]
fn make_render_buffer_keeps_origin() {
    let buf = CpuRenderBuffer::with_origin(1, 1, SurfaceOrigin::BottomLeft);
    let tmp = buf.make_render_buffer(3, 2, true);
    assert_eq!(tmp.origin(), SurfaceOrigin::BottomLeft);
    assert_eq!((tmp.width(), tmp.height()), (3, 2));
}
