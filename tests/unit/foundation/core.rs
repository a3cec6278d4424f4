use super::*;

#[test]
fn premul_matches_rounding_rule() {
    let c = Rgba8::rgba(100, 50, 200, 128);
    assert_eq!(
        c.to_premul(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
    assert_eq!(Rgba8::WHITE.to_premul(), [255, 255, 255, 255]);
}

#[test]
fn default_placement_is_identity() {
    let p = Placement::default();
    assert_eq!(p.to_affine(), Affine::IDENTITY);
}

#[test]
fn center_origin_pivots_around_the_box_center() {
    let p = Placement {
        left: 50.0,
        top: 40.0,
        width: 20.0,
        height: 10.0,
        origin_x: OriginX::Center,
        origin_y: OriginY::Center,
        ..Placement::default()
    };
    let b = p.bounds();
    assert!((b.x0 - 40.0).abs() < 1e-9);
    assert!((b.y0 - 35.0).abs() < 1e-9);
    assert!((b.x1 - 60.0).abs() < 1e-9);
    assert!((b.y1 - 45.0).abs() < 1e-9);
}

#[test]
fn scale_applies_before_translation() {
    let p = Placement {
        left: 10.0,
        top: 10.0,
        width: 4.0,
        height: 4.0,
        scale_x: 2.0,
        scale_y: 3.0,
        ..Placement::default()
    };
    let b = p.bounds();
    assert!((b.width() - 8.0).abs() < 1e-9);
    assert!((b.height() - 12.0).abs() < 1e-9);
    assert_eq!(p.scaled_size(), (8.0, 12.0));
}

#[test]
fn opacity_scales_alpha() {
    assert_eq!(Rgba8::WHITE.with_opacity(0.5).a, 128);
    assert_eq!(Rgba8::WHITE.with_opacity(2.0).a, 255);
}
