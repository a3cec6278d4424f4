use super::*;

fn frame(px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: px.repeat(4),
        premultiplied: true,
    }
}

#[test]
fn transparent_pixels_take_the_background() {
    let rgb = frame_to_rgb_over(&frame([0, 0, 0, 0]), Rgba8::rgba(10, 20, 30, 255));
    assert_eq!(&rgb[..3], &[10, 20, 30]);
    let rgb = frame_to_rgb_over(&frame([128, 0, 0, 128]), Rgba8::BLACK);
    assert_eq!(&rgb[..3], &[128, 0, 0]);
}

#[test]
fn straight_copy_unpremultiplies() {
    let rgba = frame_to_straight_rgba(&frame([64, 0, 0, 128]));
    assert_eq!(&rgba[..4], &[128, 0, 0, 128]);
}

#[test]
fn png_and_jpeg_roundtrip_through_the_decoder() {
    let f = frame([255, 0, 0, 255]);
    let png = export_png(&f).unwrap();
    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (2, 2));
    assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0, 255]);

    let jpg = export_jpeg(&f, Rgba8::BLACK, DEFAULT_JPEG_QUALITY).unwrap();
    assert_eq!(&jpg[..2], &[0xFF, 0xD8]);
    let back = image::load_from_memory(&jpg).unwrap().to_rgb8();
    assert!(back.get_pixel(1, 1).0[0] > 200);
}

#[test]
fn data_urls_are_base64() {
    assert_eq!(to_data_url("image/jpeg", &[0, 1, 2]), "data:image/jpeg;base64,AAEC");
}
