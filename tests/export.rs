use futurecity::city::CityConfig;
use futurecity::export::{render_frame, write_png};
use tempfile::tempdir;

#[test]
fn exported_png_matches_frame() {
    let dir = tempdir().expect("scratch dir");
    let frame = render_frame(&CityConfig::default(), 96, 54, 500.0);
    let path = dir.path().join("nested").join("frame.png");
    write_png(&frame, &path).expect("write png");

    let img = image::open(&path).expect("reopen png").to_rgba8();
    assert_eq!(img.dimensions(), (96, 54));
    assert_eq!(img.into_raw(), frame.to_rgba_image().into_raw());
}

#[test]
fn zero_sized_frames_are_not_written() {
    let dir = tempdir().expect("scratch dir");
    let frame = render_frame(&CityConfig::default(), 0, 0, 0.0);
    let path = dir.path().join("frame.png");
    assert!(write_png(&frame, &path).is_err());
    assert!(!path.exists());
}
