use super::*;
use crate::{encode::sink::AudioInputConfig, foundation::core::Fps};

fn cfg(audio: bool) -> SinkConfig {
    SinkConfig {
        width: 1280,
        height: 720,
        fps: Fps(10),
        audio: audio.then(|| AudioInputConfig {
            path: PathBuf::from("/tmp/bed.f32le"),
            sample_rate: 48_000,
            channels: 2,
        }),
    }
}

fn args_str(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<String> {
    ffmpeg_args(opts, cfg)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn window(args: &[String], pair: [&str; 2]) -> bool {
    args.windows(2).any(|w| w[0] == pair[0] && w[1] == pair[1])
}

#[test]
fn passes_encode_settings_through() {
    let opts = FfmpegSinkOpts::new("out/show.mp4", EncodeSettings::default());
    let args = args_str(&opts, &cfg(true));

    assert_eq!(args[0], "-y");
    assert!(window(&args, ["-s", "1280x720"]));
    assert!(window(&args, ["-r", "10"]));
    assert!(window(&args, ["-c:v", "libx264"]));
    assert!(window(&args, ["-preset", "ultrafast"]));
    assert!(window(&args, ["-b:v", "800k"]));
    assert!(window(&args, ["-threads", "4"]));
    assert!(window(&args, ["-c:a", "aac"]));
    assert!(window(&args, ["-i", "/tmp/bed.f32le"]));
    assert!(window(&args, ["-movflags", "+faststart"]));
    assert!(window(&args, ["-f", "mp4"]));
    assert_eq!(args.last().map(String::as_str), Some("out/show.mp4"));
    assert!(!args.iter().any(|a| a == "-an"));
}

#[test]
fn silent_output_disables_audio() {
    let settings = EncodeSettings {
        container: "matroska".to_string(),
        ..EncodeSettings::default()
    };
    let opts = FfmpegSinkOpts::new("show.mkv", settings);
    let args = args_str(&opts, &cfg(false));
    assert!(args.iter().any(|a| a == "-an"));
    assert!(!args.iter().any(|a| a == "-c:a"));
    assert!(!args.iter().any(|a| a == "+faststart"));
    assert!(window(&args, ["-f", "matroska"]));
}

#[test]
fn flatten_alpha_0_returns_bg() {
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &[0, 0, 0, 0], [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_alpha_255_is_identity() {
    let src = [1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_premul_over_bg(&mut dst, &[0u8; 4], [0, 0, 0, 255]).is_err());
}

#[test]
fn failures_carry_the_output_path() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new(
        "renders/show.mp4",
        EncodeSettings::default(),
    ));
    let err = sink.fail("boom");
    match err {
        ReelError::Encode { path, message } => {
            assert_eq!(path, PathBuf::from("renders/show.mp4"));
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn push_before_begin_is_an_encode_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("x.mp4", EncodeSettings::default()));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    let err = sink.push_frame(FrameIndex(0), &frame).unwrap_err();
    assert!(matches!(err, ReelError::Encode { .. }));
}
