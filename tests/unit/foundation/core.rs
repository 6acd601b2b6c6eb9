use super::*;

#[test]
fn non_empty_rejects_zero_area() {
    assert!(SurfaceSize::non_empty(0, 10).is_err());
    assert!(SurfaceSize::non_empty(10, 0).is_err());
    let s = SurfaceSize::non_empty(320, 240).unwrap();
    assert_eq!(s.pixel_count(), 320 * 240);
    assert!(
        SurfaceSize::non_empty(0, 0)
            .unwrap_err()
            .is_surface_unavailable()
    );
}

#[test]
fn clip_to_trims_edge_rects() {
    let size = SurfaceSize::new(100, 50);
    let r = PixelRect::new(96, 32, 32, 32).clip_to(size);
    assert_eq!(r, PixelRect::new(96, 32, 4, 18));

    let outside = PixelRect::new(120, 60, 32, 32).clip_to(size);
    assert!(outside.is_empty());
}

#[test]
fn inset_trailing_keeps_origin() {
    let r = PixelRect::new(64, 32, 32, 32).inset_trailing(2);
    assert_eq!(r, PixelRect::new(64, 32, 30, 30));
    assert_eq!(PixelRect::new(0, 0, 1, 1).inset_trailing(2), PixelRect::new(0, 0, 0, 0));
}

#[test]
fn premultiplied_color_scales_channels() {
    let c = Rgba8Premul::from_straight_rgba(255, 255, 255, 128);
    assert_eq!(c.to_array(), [128, 128, 128, 128]);
}

#[test]
fn straight_components_undo_premultiplication() {
    let c = Rgba8Premul::from_straight_rgba(255, 0, 64, 128);
    assert_eq!(c.to_straight_array(), [255, 0, 64, 128]);
    assert_eq!(Rgba8Premul::from_straight_rgba(9, 9, 9, 0).to_straight_array(), [0, 0, 0, 0]);
}

#[test]
fn rotation_about_center_fixes_the_center() {
    let center = Point::new(48.0, 16.0);
    let a = rotation_about(center, 90.0);
    let mapped = a * Point::ORIGIN;
    assert!((mapped.x - 48.0).abs() < 1e-9);
    assert!((mapped.y - 16.0).abs() < 1e-9);

    let edge = a * Point::new(10.0, 0.0);
    assert!((edge.x - 48.0).abs() < 1e-9);
    assert!((edge.y - 26.0).abs() < 1e-9);
}
