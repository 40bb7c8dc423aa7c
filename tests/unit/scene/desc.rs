use super::*;

const SCENE: &str = r#"{
    "width": 200,
    "height": 100,
    "children": [
        {
            "name": "panel",
            "x": 10,
            "y": 20,
            "scroll_rect": { "x": 0, "y": 0, "width": 50, "height": 50 },
            "children": [
                { "name": "tile", "content": { "type": "bitmap", "width": 100, "height": 100, "color": 16711680 } }
            ]
        },
        {
            "name": "masked",
            "mask": "shape",
            "blend_mode": "add",
            "content": { "type": "bitmap", "width": 8, "height": 8, "color": 255 }
        },
        {
            "name": "shape",
            "content": { "type": "fill", "width": 4, "height": 4, "color": 0 }
        }
    ]
}"#;

#[test]
fn builds_tree_from_json() {
    let tree = SceneDesc::from_json(SCENE).unwrap().build().unwrap();
    assert_eq!(tree.stage_size(), (200, 100));

    let panel = tree.find("panel").unwrap();
    let tile = tree.find("tile").unwrap();
    assert_eq!(tree.parent(tile).unwrap(), Some(panel));
    assert_eq!(
        tree.get(panel).unwrap().scroll_rect(),
        Some(Rect::new(0.0, 0.0, 50.0, 50.0))
    );
    assert_eq!(
        tree.concatenated_matrix(tile).unwrap(),
        Matrix::translation(10.0, 20.0)
    );

    let masked = tree.find("masked").unwrap();
    let shape = tree.find("shape").unwrap();
    assert_eq!(tree.get(masked).unwrap().mask(), Some(shape));
    assert_eq!(tree.get(masked).unwrap().blend_mode(), BlendMode::Add);
    assert_eq!(tree.get(shape).unwrap().masked_object(), Some(masked));
}

#[test]
fn unknown_mask_name_is_rejected() {
    let json = r#"{ "width": 10, "height": 10, "children": [ { "mask": "nope" } ] }"#;
    let err = SceneDesc::from_json(json).unwrap().build().unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}

#[test]
fn validation_rejects_bad_values() {
    assert!(SceneDesc::from_json(r#"{ "width": 0, "height": 10 }"#).is_err());
    let json = r#"{ "width": 10, "height": 10, "children": [ { "alpha": 2.0 } ] }"#;
    assert!(SceneDesc::from_json(json).is_err());
    let json = r#"{ "width": 10, "height": 10, "children": [
        { "filters": [ { "type": "blur", "blur_x": -1, "blur_y": 0 } ] }
    ] }"#;
    assert!(SceneDesc::from_json(json).is_err());
}

#[test]
fn duplicate_names_are_rejected() {
    let json = r#"{ "width": 10, "height": 10, "children": [ { "name": "a" }, { "name": "a" } ] }"#;
    assert!(SceneDesc::from_json(json).unwrap().build().is_err());
}
