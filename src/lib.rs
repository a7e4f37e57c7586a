//! Photoreel turns a folder of photos, caption lines and an optional music bed into a timed
//! slideshow video.
//!
//! The pipeline is strictly linear:
//!
//! - Discover assets with [`AssetManifest::discover`]
//! - Time the slides with [`allocate`] and spread captions with [`distribute`]
//! - Compose each slide into a [`SlideClip`] with a [`SlideComposer`]
//! - Concatenate clips and fit the audio with [`assemble`]
//! - Rasterize and encode with [`render_timeline`] into any [`FrameSink`]
//!
//! [`create_video`] runs all of it against the system `ffmpeg`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod audio;
mod captions;
mod compose;
/// Slideshow configuration.
pub mod config;
mod encode;
mod foundation;
mod render;
/// Non-fatal quality warnings.
pub mod report;
/// Top-level orchestration.
pub mod slideshow;
mod timeline;
mod timing;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Point, Rect};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::fit::FitToCanvas;
pub use crate::assets::loader::{
    AssetManifest, AudioSource, CaptionFont, DiscoverOpts, PrepareReport, prepare_photos,
};
pub use crate::assets::media::{
    AudioPcm, MIX_SAMPLE_RATE, decode_audio_f32_stereo, is_tool_on_path, probe_duration_secs,
};
pub use crate::audio::bed::{fit_pcm, render_bed, write_f32le_file};
pub use crate::captions::distribute::distribute;
pub use crate::compose::composer::{Composed, Layer, SlideClip, SlideComposer};
pub use crate::compose::shaper::{
    CaptionShaper, GlyphRun, ParleyShaper, PositionedGlyph, ShapedCaption, UnavailableShaper,
};
pub use crate::compose::slide::{Slide, build_slides};
pub use crate::config::{
    AudioConfig, CanvasConfig, CaptionStyle, EncodeSettings, FitMode, PacingConfig,
    RenderThreading, SlideshowConfig,
};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ffmpeg_args};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::render::pipeline::{RenderStats, render_timeline, render_to_file};
pub use crate::render::raster::{ClipRasterizer, FrameRGBA};
pub use crate::report::QualityWarning;
pub use crate::slideshow::{
    CreateOpts, SlidePlan, SlideshowPlan, SlideshowReport, build_timeline, create_video, plan,
};
pub use crate::timeline::assemble::{
    AudioFit, AudioPlan, AudioTrack, Timeline, TimelineEntry, assemble,
};
pub use crate::timing::allocate::{Allocation, allocate, budget_secs};
