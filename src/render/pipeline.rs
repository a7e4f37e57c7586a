use std::path::PathBuf;

use rayon::prelude::*;

use crate::{
    assets::media::MIX_SAMPLE_RATE,
    audio::bed::{render_bed, write_f32le_file},
    config::{EncodeSettings, RenderThreading},
    encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts},
    encode::sink::{AudioInputConfig, FrameSink, SinkConfig},
    foundation::core::FrameIndex,
    foundation::error::{ReelError, ReelResult},
    render::raster::{ClipRasterizer, FrameRGBA},
    timeline::assemble::{Timeline, TimelineEntry},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Clips on the timeline.
    pub clips_total: u64,
    /// Clips actually rasterized (one raster per clip).
    pub clips_rendered: u64,
    /// Frames pushed to the sink.
    pub frames_total: u64,
}

/// Rasterize every clip once and push its frame span into `sink`, in timeline order.
///
/// Clips are rasterized in batches of `threading.chunk_size`, on a rayon pool when
/// `threading.parallel` is set. Frames reach the sink by index, never by completion order.
#[tracing::instrument(skip_all, fields(clips = timeline.entries.len(), frames = timeline.total_frames()))]
pub fn render_timeline(
    timeline: &Timeline,
    threading: &RenderThreading,
    audio: Option<AudioInputConfig>,
    sink: &mut dyn FrameSink,
) -> ReelResult<RenderStats> {
    if timeline.entries.is_empty() {
        return Err(ReelError::invalid_input("timeline has no clips"));
    }

    sink.begin(SinkConfig {
        width: timeline.width,
        height: timeline.height,
        fps: timeline.fps,
        audio,
    })?;

    let chunk_size = threading.chunk_size.max(1);
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let mut sequential = ClipRasterizer::new();
    let mut stats = RenderStats::default();

    for chunk in timeline.entries.chunks(chunk_size) {
        let frames = match pool.as_ref() {
            Some(pool) => rasterize_chunk_parallel(chunk, pool)?,
            None => chunk
                .iter()
                .map(|e| sequential.rasterize(&e.clip))
                .collect::<ReelResult<Vec<_>>>()?,
        };

        for (entry, frame) in chunk.iter().zip(&frames) {
            for f in entry.frames.start.0..entry.frames.end.0 {
                sink.push_frame(FrameIndex(f), frame)?;
            }
            stats.frames_total += entry.frames.len_frames();
        }
        stats.clips_rendered += frames.len() as u64;
        tracing::debug!(
            done = stats.clips_rendered,
            of = timeline.entries.len(),
            "clip batch pushed"
        );
    }

    sink.end()?;
    stats.clips_total = timeline.entries.len() as u64;
    Ok(stats)
}

fn rasterize_chunk_parallel(
    chunk: &[TimelineEntry],
    pool: &rayon::ThreadPool,
) -> ReelResult<Vec<FrameRGBA>> {
    let rendered = pool.install(|| {
        chunk
            .par_iter()
            .map_init(ClipRasterizer::new, |r, entry| r.rasterize(&entry.clip))
            .collect::<Vec<_>>()
    });
    rendered.into_iter().collect()
}

/// Encode `timeline` to `out_path` with the system `ffmpeg`.
///
/// When the timeline carries an audio plan, the bed is decoded, fitted to the video length and
/// streamed from a temporary `f32le` file that is removed afterwards.
pub fn render_to_file(
    timeline: &Timeline,
    out_path: impl Into<PathBuf>,
    settings: &EncodeSettings,
    threading: &RenderThreading,
) -> ReelResult<RenderStats> {
    let out_path = out_path.into();

    let mut audio_tmp = TempFileGuard(None);
    let audio = match timeline.audio.as_ref() {
        None => None,
        Some(plan) => {
            let bed = render_bed(plan, MIX_SAMPLE_RATE)?;
            let path = std::env::temp_dir().join(format!(
                "photoreel_audio_bed_{}_{}.f32le",
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos())
                    .unwrap_or(0)
            ));
            write_f32le_file(&bed.interleaved_f32, &path)?;
            audio_tmp.0 = Some(path.clone());
            Some(AudioInputConfig {
                path,
                sample_rate: bed.sample_rate,
                channels: bed.channels,
            })
        }
    };

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out_path, settings.clone()));
    let stats = render_timeline(timeline, threading, audio, &mut sink)?;
    drop(audio_tmp);
    tracing::info!(
        out = %out_path.display(),
        frames = stats.frames_total,
        secs = timeline.duration_secs(),
        "slideshow written"
    );
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(0) = threads {
        return Err(ReelError::invalid_input(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        ReelError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
