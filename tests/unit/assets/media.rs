use super::*;

#[test]
fn duration_field_parses_ffprobe_strings() {
    assert_eq!(parse_duration_field(Some("205.000000")).unwrap(), 205.0);
    assert_eq!(parse_duration_field(Some(" 0.5\n")).unwrap(), 0.5);
    assert!(parse_duration_field(None).is_err());
    assert!(parse_duration_field(Some("N/A")).is_err());
    assert!(parse_duration_field(Some("-3")).is_err());
}

#[test]
fn f32le_bytes_decode_and_reject_misaligned() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0.25f32.to_le_bytes());
    bytes.extend_from_slice(&(-1.0f32).to_le_bytes());
    assert_eq!(f32le_bytes_to_samples(&bytes).unwrap(), vec![0.25, -1.0]);
    assert!(f32le_bytes_to_samples(&bytes[..5]).is_err());
}

#[test]
fn pcm_duration_counts_frames_not_samples() {
    let pcm = AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: vec![0.0; 16],
    };
    assert_eq!(pcm.frames(), 8);
    assert_eq!(pcm.duration_secs(), 2.0);
}
