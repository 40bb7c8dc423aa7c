use super::*;
use crate::foundation::core::Rgba8Premul;

fn red(w: u32, h: u32) -> BitmapData {
    BitmapData::solid(w, h, Rgba8Premul::from_straight_rgba(255, 0, 0, 255))
}

#[test]
fn decode_blits_requires_octets() {
    assert!(decode_blits(&[0.0; 7]).is_err());
    let blits = decode_blits(&[1.0, 2.0, 3.0, 4.0, 10.0, 20.0, 30.0, 40.0]).unwrap();
    assert_eq!(blits.len(), 1);
    assert_eq!(blits[0].src, Rect::new(1.0, 2.0, 4.0, 6.0));
    assert_eq!(blits[0].dst, Rect::new(10.0, 20.0, 40.0, 60.0));
}

#[test]
fn bitmap_bounds_cover_all_blits() {
    let mut b = BitmapNode::empty(red(4, 4));
    b.push_blit(0.0, 0.0, 4.0, 4.0, 0.0, 0.0, 4.0, 4.0);
    b.push_blit(0.0, 0.0, 4.0, 4.0, 10.0, 6.0, 4.0, 4.0);
    assert_eq!(
        NodeKind::Bitmap(b).bounds(),
        Rect::new(0.0, 0.0, 14.0, 10.0)
    );
}

#[test]
fn bitmap_local_matrix_moves_bounds() {
    let mut b = BitmapNode::new(red(10, 10));
    b.matrix = Some(Matrix::translation(5.0, 0.0));
    assert_eq!(
        NodeKind::Bitmap(b).bounds(),
        Rect::new(5.0, 0.0, 15.0, 10.0)
    );
}

#[test]
fn graphics_bounds_include_stroke_width() {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((10.0, 0.0));
    let g = GraphicsNode::new(vec![PathCommand {
        path,
        paint: PathPaint::Stroke {
            color: [0, 0, 0, 255],
            width: 4.0,
        },
    }]);
    assert_eq!(g.x, -2.0);
    assert_eq!(g.y, -2.0);
    assert_eq!(g.width, 14.0);
    assert_eq!(g.height, 4.0);
}

#[test]
fn mesh_validates_geometry() {
    let img = red(2, 2);
    assert!(MeshNode::new(img.clone(), vec![0.0; 6], vec![0.0; 4], vec![0, 1, 2]).is_err());
    assert!(MeshNode::new(img.clone(), vec![0.0; 6], vec![0.0; 6], vec![0, 1]).is_err());
    assert!(MeshNode::new(img.clone(), vec![0.0; 6], vec![0.0; 6], vec![0, 1, 3]).is_err());

    let m = MeshNode::new(
        img,
        vec![0.0, 0.0, 8.0, 0.0, 0.0, 6.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        vec![0, 1, 2],
    )
    .unwrap();
    assert_eq!(m.bounds, Rect::new(0.0, 0.0, 8.0, 6.0));
}

#[test]
fn group_bounds_skip_empty_children() {
    let g = NodeKind::Group(vec![
        NodeKind::SetAlpha(0.5),
        NodeKind::Bitmap(BitmapNode::new(red(3, 3))),
    ]);
    assert_eq!(g.bounds(), Rect::new(0.0, 0.0, 3.0, 3.0));
    assert_eq!(g.type_name(), "group");
}

#[test]
fn place_updates_frame_data() {
    let mut node = RenderNode::new(NodeKind::Bitmap(BitmapNode::new(red(10, 10))));
    node.place(Matrix::translation(20.0, 30.0), 0.5);
    assert_eq!(node.render_region, Region::new(20.0, 30.0, 30.0, 40.0));
    assert_eq!(node.render_alpha, 0.5);
    assert!(!node.need_redraw);
}
