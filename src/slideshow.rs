//! End-to-end slideshow orchestration: assets → durations and captions → clips → timeline →
//! encoded video.

use std::path::{Path, PathBuf};

use crate::{
    assets::loader::{AssetManifest, DiscoverOpts},
    captions::distribute::distribute,
    compose::{
        composer::SlideComposer,
        shaper::{CaptionShaper, ParleyShaper, UnavailableShaper},
        slide::build_slides,
    },
    config::SlideshowConfig,
    foundation::error::ReelResult,
    render::pipeline::{RenderStats, render_to_file},
    report::QualityWarning,
    timeline::assemble::{AudioPlan, AudioTrack, Timeline, assemble},
    timing::allocate::allocate,
};

/// Timing and captions for one slide, before any pixels exist.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SlidePlan {
    /// Zero-based slide index.
    pub index: usize,
    /// Source photo.
    pub photo: PathBuf,
    /// Nominal start time in seconds.
    pub start_secs: f64,
    /// Slide duration in seconds.
    pub duration_secs: f64,
    /// Caption lines shown on this slide.
    pub captions: Vec<String>,
}

/// The full pacing decision for a show.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SlideshowPlan {
    /// Slides in order.
    pub slides: Vec<SlidePlan>,
    /// Time budget the durations were derived from.
    pub budget_secs: f64,
    /// Sum of slide durations.
    pub total_secs: f64,
    /// How the audio bed covers the video; `None` for a silent video.
    pub audio: Option<AudioPlan>,
    /// Non-fatal issues found so far.
    pub warnings: Vec<QualityWarning>,
}

impl SlideshowPlan {
    /// Caption groups in slide order.
    pub fn caption_groups(&self) -> Vec<Vec<String>> {
        self.slides.iter().map(|s| s.captions.clone()).collect()
    }

    /// Durations in slide order.
    pub fn durations(&self) -> Vec<f64> {
        self.slides.iter().map(|s| s.duration_secs).collect()
    }
}

/// Per-run switches that are not part of the saved configuration.
#[derive(Clone, Copy, Debug)]
pub struct CreateOpts {
    /// Use the audio bed when one is found.
    pub with_audio: bool,
}

impl Default for CreateOpts {
    fn default() -> Self {
        Self { with_audio: true }
    }
}

/// What [`create_video`] produced.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SlideshowReport {
    /// Encoded file.
    pub output: PathBuf,
    /// Pacing used.
    pub plan: SlideshowPlan,
    /// Encoded video duration (frame grid).
    pub video_secs: f64,
    /// Render counters.
    pub stats: RenderStats,
    /// Every non-fatal issue, including dropped captions.
    pub warnings: Vec<QualityWarning>,
}

/// Allocate durations, distribute captions and decide audio fitting for `manifest`.
#[tracing::instrument(skip_all, fields(photos = manifest.photos.len()))]
pub fn plan(manifest: &AssetManifest, config: &SlideshowConfig) -> ReelResult<SlideshowPlan> {
    let n = manifest.photos.len();
    let allocation = allocate(
        n,
        manifest.audio.as_ref().map(|a| a.duration_secs),
        &config.pacing,
    )?;
    let groups = distribute(&manifest.captions, n)?;

    let mut start = 0.0;
    let slides = manifest
        .photos
        .iter()
        .zip(&allocation.durations)
        .zip(groups)
        .enumerate()
        .map(|(index, ((photo, &duration_secs), captions))| {
            let s = SlidePlan {
                index,
                photo: photo.clone(),
                start_secs: start,
                duration_secs,
                captions,
            };
            start += duration_secs;
            s
        })
        .collect::<Vec<_>>();

    let total_secs = allocation.total_secs();
    let audio = manifest
        .audio
        .as_ref()
        .map(|a| AudioPlan::fit(audio_track(a, config), total_secs))
        .transpose()?;

    let mut warnings = manifest.warnings.clone();
    warnings.extend(allocation.warnings);

    Ok(SlideshowPlan {
        slides,
        budget_secs: allocation.budget_secs,
        total_secs,
        audio,
        warnings,
    })
}

/// Decode photos, compose every slide and assemble the timeline.
///
/// Returns the plan alongside; its warnings are extended with any dropped captions.
#[tracing::instrument(skip_all)]
pub fn build_timeline(
    manifest: &AssetManifest,
    config: &SlideshowConfig,
) -> ReelResult<(Timeline, SlideshowPlan)> {
    let mut plan = plan(manifest, config)?;
    let images = manifest.load_images(&config.canvas)?;
    let slides = build_slides(images, &plan.durations(), plan.caption_groups())?;

    let mut shaper = caption_shaper(manifest)?;
    let (clips, caption_warnings) =
        SlideComposer::new(&config.caption, &mut *shaper).compose_all(&slides);
    plan.warnings.extend(caption_warnings);

    let audio = manifest.audio.as_ref().map(|a| audio_track(a, config));
    let timeline = assemble(clips, audio, config.encode.fps()?)?;
    Ok((timeline, plan))
}

/// Turn the assets in `input_dir` into a video at `out_path`.
#[tracing::instrument(skip(config))]
pub fn create_video(
    input_dir: &Path,
    out_path: &Path,
    config: &SlideshowConfig,
    opts: CreateOpts,
) -> ReelResult<SlideshowReport> {
    config.validate()?;
    let manifest = AssetManifest::discover(
        input_dir,
        config,
        DiscoverOpts {
            with_audio: opts.with_audio,
        },
    )?;
    let (timeline, plan) = build_timeline(&manifest, config)?;
    let stats = render_to_file(&timeline, out_path, &config.encode, &config.render)?;

    Ok(SlideshowReport {
        output: out_path.to_path_buf(),
        video_secs: timeline.duration_secs(),
        warnings: plan.warnings.clone(),
        plan,
        stats,
    })
}

fn audio_track(a: &crate::assets::loader::AudioSource, config: &SlideshowConfig) -> AudioTrack {
    AudioTrack {
        path: a.path.clone(),
        duration_secs: a.duration_secs,
        loopable: config.audio.loop_to_fit,
    }
}

fn caption_shaper(manifest: &AssetManifest) -> ReelResult<Box<dyn CaptionShaper>> {
    if manifest.captions.is_empty() {
        return Ok(Box::new(UnavailableShaper::new("no captions")));
    }
    Ok(match manifest.load_font()? {
        None => Box::new(UnavailableShaper::new(
            "no caption font found (set caption.font_path or add one under fonts/)",
        )),
        Some(font) => match ParleyShaper::new(&font) {
            Ok(s) => Box::new(s),
            Err(e) => Box::new(UnavailableShaper::new(e.to_string())),
        },
    })
}
