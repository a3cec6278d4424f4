use super::*;
use crate::foundation::core::Canvas;

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn rect_node(left: f64, top: f64, w: f64, h: f64, fill: Rgba8) -> Node {
    let mut n = Node::new(
        NodeKind::Rect { rx: 0.0, ry: 0.0 },
        Placement {
            left,
            top,
            width: w,
            height: h,
            ..Placement::default()
        },
    );
    n.paint.fill = Some(fill);
    n
}

fn scene(w: u32, h: u32, clip: Option<CircleClip>) -> Scene {
    Scene::new(
        Canvas {
            width: w,
            height: h,
        },
        clip,
    )
}

#[test]
fn background_and_rect_are_painted() {
    let mut s = scene(16, 16, None);
    s.insert(
        rect_node(4.0, 4.0, 8.0, 8.0, Rgba8::rgba(255, 0, 0, 255)),
        None,
    );
    let mut r = CanvasRenderer::new(FontBook::new());
    let f = r.render(&s, Rgba8::rgba(0, 0, 255, 255), None).unwrap();
    assert_eq!((f.width, f.height), (16, 16));
    assert!(f.premultiplied);
    assert_eq!(px(&f, 1, 1), [0, 0, 255, 255]);
    assert_eq!(px(&f, 8, 8), [255, 0, 0, 255]);
}

#[test]
fn hidden_and_transparent_nodes_are_skipped() {
    let mut s = scene(8, 8, None);
    let mut hidden = rect_node(0.0, 0.0, 8.0, 8.0, Rgba8::WHITE);
    hidden.placement.visible = false;
    s.insert(hidden, None);
    let mut clear = rect_node(0.0, 0.0, 8.0, 8.0, Rgba8::WHITE);
    clear.placement.opacity = 0.0;
    s.insert(clear, None);
    let f = CanvasRenderer::new(FontBook::new())
        .render(&s, Rgba8::BLACK, None)
        .unwrap();
    assert_eq!(px(&f, 4, 4), [0, 0, 0, 255]);
}

#[test]
fn group_children_are_centered_on_the_group() {
    let mut s = scene(20, 20, None);
    let child = rect_node(-2.0, -2.0, 4.0, 4.0, Rgba8::WHITE);
    s.insert(
        Node::new(
            NodeKind::Group {
                children: vec![child],
            },
            Placement {
                left: 10.0,
                top: 10.0,
                width: 10.0,
                height: 10.0,
                origin_x: crate::foundation::core::OriginX::Center,
                origin_y: crate::foundation::core::OriginY::Center,
                ..Placement::default()
            },
        ),
        None,
    );
    let f = CanvasRenderer::new(FontBook::new())
        .render(&s, Rgba8::BLACK, None)
        .unwrap();
    assert_eq!(px(&f, 10, 10), [255, 255, 255, 255]);
    assert_eq!(px(&f, 3, 3), [0, 0, 0, 255]);
}

#[test]
fn round_canvases_are_masked() {
    let s = scene(
        20,
        20,
        Some(CircleClip {
            cx: 10.0,
            cy: 10.0,
            radius: 10.0,
        }),
    );
    let f = CanvasRenderer::new(FontBook::new())
        .render(&s, Rgba8::WHITE, None)
        .unwrap();
    assert_eq!(px(&f, 0, 0), [0, 0, 0, 0]);
    assert_eq!(px(&f, 10, 10), [255, 255, 255, 255]);
}

#[test]
fn static_images_stretch_to_their_box() {
    let mut s = scene(8, 8, None);
    let img = PreparedImage::from_premul(1, 1, vec![0, 255, 0, 255]).unwrap();
    let mut node = ImageNode::new("g.png");
    node.content = ImageContent::Static(Arc::new(img));
    s.insert(
        Node::new(
            NodeKind::Image(node),
            Placement {
                width: 8.0,
                height: 8.0,
                ..Placement::default()
            },
        ),
        None,
    );
    let f = CanvasRenderer::new(FontBook::new())
        .render(&s, Rgba8::BLACK, None)
        .unwrap();
    assert_eq!(px(&f, 4, 4), [0, 255, 0, 255]);
}

#[test]
fn undrawable_images_are_forgotten_once_unused() {
    let mut img = PreparedImage::from_premul(2, 2, vec![0; 16]).unwrap();
    img.rgba8_premul = Arc::new(vec![0; 4]);
    let mut node = ImageNode::new("bad.png");
    node.content = ImageContent::Static(Arc::new(img));

    let mut s = scene(4, 4, None);
    let id = s.insert(
        Node::new(
            NodeKind::Image(node),
            Placement {
                width: 4.0,
                height: 4.0,
                ..Placement::default()
            },
        ),
        None,
    );
    let mut r = CanvasRenderer::new(FontBook::new());
    let f = r.render(&s, Rgba8::BLACK, None).unwrap();
    assert_eq!(px(&f, 2, 2), [0, 0, 0, 255]);
    assert_eq!(r.rejected.len(), 1);

    s.remove(id);
    r.render(&s, Rgba8::BLACK, None).unwrap();
    assert!(r.rejected.is_empty());
    assert!(r.images.is_empty());
}

#[test]
fn pending_images_draw_nothing() {
    let mut s = scene(4, 4, None);
    s.insert(
        Node::new(
            NodeKind::Image(ImageNode::new("x.png")),
            Placement {
                width: 4.0,
                height: 4.0,
                ..Placement::default()
            },
        ),
        None,
    );
    let f = CanvasRenderer::new(FontBook::new())
        .render(&s, Rgba8::BLACK, None)
        .unwrap();
    assert_eq!(px(&f, 2, 2), [0, 0, 0, 255]);
}

#[test]
fn arcs_cover_only_their_sweep() {
    assert!(arc_path(10.0, 0.0, 0.0).is_none());
    assert!(arc_path(0.0, 0.0, 360.0).is_none());
    let half = arc_path(10.0, 0.0, 180.0).unwrap();
    let bbox = half.bounding_box();
    // Clockwise from +x in y-down space covers the lower half.
    assert!(bbox.min_y() > 9.0, "{bbox:?}");
    assert!((bbox.max_y() - 20.0).abs() < 0.5);
}

#[test]
fn dashed_strokes_leave_gaps() {
    let mut line = kurbo::BezPath::new();
    line.move_to((0.0, 0.0));
    line.line_to((10.0, 0.0));
    let solid = stroke_outline(&line, 2.0, &[]);
    let dashed = stroke_outline(&line, 2.0, &[2.0, 2.0]);
    assert!((solid.area().abs() - 20.0).abs() < 1e-6);
    assert!(dashed.area().abs() < solid.area().abs());
}

#[test]
fn circle_clip_softens_the_edge() {
    let mut f = FrameRGBA {
        width: 3,
        height: 1,
        data: vec![255; 12],
        premultiplied: true,
    };
    apply_circle_clip(
        &mut f,
        CircleClip {
            cx: 0.5,
            cy: 0.5,
            radius: 1.0,
        },
    );
    assert_eq!(px(&f, 0, 0), [255; 4]);
    assert_eq!(px(&f, 2, 0), [0; 4]);
}
