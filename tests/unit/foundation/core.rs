use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
    assert!(FrameRange::new(FrameIndex(3), FrameIndex(2)).is_err());
}

#[test]
fn fps_rounds_to_nearest_frame() {
    let fps = Fps::new(10).unwrap();
    assert_eq!(fps.secs_to_frames_round(10.0), 100);
    assert_eq!(fps.secs_to_frames_round(0.149), 1);
    assert_eq!(fps.secs_to_frames_round(-3.0), 0);
    assert!((fps.frames_to_secs(25) - 2.5).abs() < 1e-12);
    assert!(Fps::new(0).is_err());
}

#[test]
fn canvas_rejects_odd_and_empty_sizes() {
    assert!(Canvas { width: 1280, height: 720 }.validate().is_ok());
    assert!(Canvas { width: 1281, height: 720 }.validate().is_err());
    assert!(Canvas { width: 0, height: 720 }.validate().is_err());
}
