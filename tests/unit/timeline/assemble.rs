use super::*;
use crate::{
    assets::decode::PreparedImage,
    compose::composer::{Layer, SlideClip},
};

fn clip(index: usize, duration_secs: f64) -> SlideClip {
    SlideClip {
        index,
        duration_secs,
        width: 4,
        height: 2,
        layers: vec![Layer::Image(PreparedImage::solid(4, 2, [0, 0, 0]))],
    }
}

fn clips(durations: &[f64]) -> Vec<SlideClip> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| clip(i, *d))
        .collect()
}

fn track(duration_secs: f64, loopable: bool) -> AudioTrack {
    AudioTrack {
        path: PathBuf::from("bgm.mp3"),
        duration_secs,
        loopable,
    }
}

#[test]
fn concatenates_with_hard_cuts() {
    let tl = assemble(clips(&[10.0, 60.0, 15.0]), None, Fps(10)).unwrap();
    let spans: Vec<(u64, u64)> = tl
        .entries
        .iter()
        .map(|e| (e.frames.start.0, e.frames.end.0))
        .collect();
    assert_eq!(spans, vec![(0, 100), (100, 700), (700, 850)]);
    assert_eq!(tl.entries[2].start_secs, 70.0);
    assert_eq!(tl.total_frames(), 850);
    assert_eq!(tl.duration_secs(), 85.0);
    assert!(tl.audio.is_none());
}

#[test]
fn cumulative_rounding_keeps_total_exact() {
    let durations = [10.0, 77.5 / 3.0, 77.5 / 3.0, 77.5 / 3.0, 15.0];
    let tl = assemble(clips(&durations), None, Fps(3)).unwrap();
    let sum: u64 = tl.entries.iter().map(|e| e.frames.len_frames()).sum();
    let expected = (durations.iter().sum::<f64>() * 3.0).round() as u64;
    assert_eq!(sum, expected);
    for pair in tl.entries.windows(2) {
        assert_eq!(pair[0].frames.end, pair[1].frames.start);
    }
}

#[test]
fn tiny_clips_still_get_one_frame() {
    let tl = assemble(clips(&[0.01, 0.01, 1.0]), None, Fps(10)).unwrap();
    for e in &tl.entries {
        assert!(e.frames.len_frames() >= 1);
    }
}

#[test]
fn short_audio_loops_until_covering_video() {
    let tl = assemble(clips(&[10.0, 60.0, 15.0]), Some(track(40.0, true)), Fps(10)).unwrap();
    let plan = tl.audio.unwrap();
    assert_eq!(plan.fit, AudioFit::Loop { repeats: 3 });
    assert_eq!(plan.cut_at_secs, 85.0);
    assert!(40.0 * 3.0 >= plan.cut_at_secs);
    assert_eq!(plan.audible_secs(), 85.0);
}

#[test]
fn long_audio_plays_once_and_is_cut_at_video_end() {
    let tl = assemble(clips(&[10.0, 15.0]), Some(track(205.0, true)), Fps(10)).unwrap();
    let plan = tl.audio.unwrap();
    assert_eq!(plan.fit, AudioFit::PlayOnce);
    assert_eq!(plan.cut_at_secs, 25.0);
    assert_eq!(plan.audible_secs(), 25.0);
}

#[test]
fn equal_lengths_play_once() {
    let tl = assemble(clips(&[10.0, 15.0]), Some(track(25.0, true)), Fps(10)).unwrap();
    assert_eq!(tl.audio.unwrap().fit, AudioFit::PlayOnce);
}

#[test]
fn non_loopable_audio_is_followed_by_silence() {
    let tl = assemble(clips(&[10.0, 15.0]), Some(track(5.0, false)), Fps(10)).unwrap();
    let plan = tl.audio.unwrap();
    assert_eq!(plan.fit, AudioFit::PlayOnce);
    assert_eq!(plan.audible_secs(), 5.0);
}

#[test]
fn rejects_bad_inputs() {
    assert!(assemble(Vec::new(), None, Fps(10)).is_err());

    let mut out_of_order = clips(&[1.0, 1.0]);
    out_of_order.swap(0, 1);
    assert!(assemble(out_of_order, None, Fps(10)).is_err());

    let mut mixed = clips(&[1.0, 1.0]);
    mixed[1].width = 8;
    assert!(assemble(mixed, None, Fps(10)).is_err());

    assert!(assemble(clips(&[1.0]), Some(track(0.0, true)), Fps(10)).is_err());
}
