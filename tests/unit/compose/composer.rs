use super::*;
use crate::compose::slide::build_slides;

/// Returns a fixed-size empty block, or fails on the listed slide texts.
struct FakeShaper {
    fail_on: Vec<String>,
    calls: usize,
}

impl CaptionShaper for FakeShaper {
    fn shape(
        &mut self,
        text: &str,
        _style: &CaptionStyle,
        max_width: f32,
    ) -> ReelResult<ShapedCaption> {
        self.calls += 1;
        if self.fail_on.iter().any(|t| t == text) {
            return Err(ReelError::caption_render("unsupported shaping"));
        }
        Ok(ShapedCaption {
            width: max_width,
            height: 30.0,
            runs: Vec::new(),
        })
    }
}

fn slides(captions: Vec<Vec<&str>>) -> Vec<Slide> {
    let n = captions.len();
    build_slides(
        (0..n).map(|_| PreparedImage::solid(640, 360, [9, 9, 9])).collect(),
        &vec![2.0; n],
        captions
            .into_iter()
            .map(|g| g.into_iter().map(str::to_string).collect())
            .collect(),
    )
    .unwrap()
}

#[test]
fn no_captions_means_plain_clip_without_shaping() {
    let style = CaptionStyle::default();
    let mut shaper = FakeShaper {
        fail_on: vec![],
        calls: 0,
    };
    let s = slides(vec![vec![]]);
    let out = SlideComposer::new(&style, &mut shaper).compose(&s[0]);
    assert!(out.warning.is_none());
    assert_eq!(out.clip.layers.len(), 1);
    assert!(!out.clip.has_caption());
    assert_eq!(shaper.calls, 0);
}

#[test]
fn caption_adds_bottom_band_and_centered_text() {
    let style = CaptionStyle::default();
    let mut shaper = FakeShaper {
        fail_on: vec![],
        calls: 0,
    };
    let s = slides(vec![vec!["a", "b"]]);
    let out = SlideComposer::new(&style, &mut shaper).compose(&s[0]);
    assert!(out.warning.is_none());
    assert_eq!(out.clip.layers.len(), 3);
    assert!(out.clip.has_caption());

    match &out.clip.layers[1] {
        Layer::Band { rect, opacity, .. } => {
            assert_eq!(*rect, Rect::new(0.0, 260.0, 640.0, 360.0));
            assert_eq!(*opacity, 0.7);
        }
        other => panic!("expected band, got {other:?}"),
    }
    match &out.clip.layers[2] {
        Layer::Caption { caption, origin } => {
            assert_eq!(caption.width, 440.0);
            assert_eq!(*origin, Point::new(100.0, 330.0));
        }
        other => panic!("expected caption, got {other:?}"),
    }
}

#[test]
fn lines_are_joined_with_line_breaks() {
    let style = CaptionStyle::default();
    let mut shaper = FakeShaper {
        fail_on: vec!["first\nsecond".to_string()],
        calls: 0,
    };
    let s = slides(vec![vec!["first", "second"]]);
    let out = SlideComposer::new(&style, &mut shaper).compose(&s[0]);
    assert!(out.warning.is_some());
}

#[test]
fn forced_failure_only_affects_that_slide() {
    let style = CaptionStyle::default();
    let mut shaper = FakeShaper {
        fail_on: vec!["bad".to_string()],
        calls: 0,
    };
    let s = slides(vec![vec!["ok 0"], vec!["bad"], vec![], vec!["ok 3"]]);
    let (clips, warnings) = SlideComposer::new(&style, &mut shaper).compose_all(&s);

    assert_eq!(clips.len(), 4);
    assert_eq!(
        clips.iter().map(|c| c.index).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
    assert!(clips[0].has_caption());
    assert!(!clips[1].has_caption());
    assert_eq!(clips[1].layers.len(), 1);
    assert!(!clips[2].has_caption());
    assert!(clips[3].has_caption());

    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        QualityWarning::CaptionDropped { slide_index: 1, reason } if reason.contains("unsupported shaping")
    ));
}

#[test]
fn band_is_clamped_to_short_images() {
    let style = CaptionStyle {
        band_height_px: 500,
        ..CaptionStyle::default()
    };
    let mut shaper = FakeShaper {
        fail_on: vec![],
        calls: 0,
    };
    let s = slides(vec![vec!["x"]]);
    let out = SlideComposer::new(&style, &mut shaper).compose(&s[0]);
    let Layer::Band { rect, .. } = &out.clip.layers[1] else {
        panic!("expected band");
    };
    assert_eq!(rect.y0, 0.0);
}
