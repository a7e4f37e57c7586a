use std::path::PathBuf;

use crate::{
    compose::composer::SlideClip,
    foundation::core::{FrameIndex, FrameRange, Fps},
    foundation::error::{ReelError, ReelResult},
};

/// Background audio available to a timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioTrack {
    /// Source file.
    pub path: PathBuf,
    /// Probed duration in seconds (> 0).
    pub duration_secs: f64,
    /// Whether the track may be repeated to cover a longer video.
    pub loopable: bool,
}

/// How the audio track is stretched over the video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AudioFit {
    /// Play the track once; it is cut at video end, or followed by silence when shorter.
    PlayOnce,
    /// Repeat the whole track `repeats` times, then cut at video end.
    Loop {
        /// Number of back-to-back copies (>= 2).
        repeats: u32,
    },
}

/// Audio decision for one timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioPlan {
    /// Track to play.
    pub track: AudioTrack,
    /// Loop or play once.
    pub fit: AudioFit,
    /// Audio is hard-cut here; always the video duration.
    pub cut_at_secs: f64,
}

impl AudioPlan {
    /// Decide how `track` covers `video_secs` of video.
    pub fn fit(track: AudioTrack, video_secs: f64) -> ReelResult<Self> {
        if !track.duration_secs.is_finite() || track.duration_secs <= 0.0 {
            return Err(ReelError::invalid_input(format!(
                "audio duration must be finite and > 0 (got {})",
                track.duration_secs
            )));
        }
        if !video_secs.is_finite() || video_secs <= 0.0 {
            return Err(ReelError::invalid_input("video duration must be finite and > 0"));
        }

        let fit = if track.duration_secs >= video_secs || !track.loopable {
            AudioFit::PlayOnce
        } else {
            let repeats = (video_secs / track.duration_secs).ceil();
            let repeats = u32::try_from(repeats as u64).map_err(|_| {
                ReelError::invalid_input(format!(
                    "audio too short to loop over {video_secs:.2}s ({}s track)",
                    track.duration_secs
                ))
            })?;
            AudioFit::Loop {
                repeats: repeats.max(2),
            }
        };

        Ok(Self {
            track,
            fit,
            cut_at_secs: video_secs,
        })
    }

    /// Seconds of source audio that actually play before the cut.
    pub fn audible_secs(&self) -> f64 {
        let covered = match self.fit {
            AudioFit::PlayOnce => self.track.duration_secs,
            AudioFit::Loop { repeats } => self.track.duration_secs * f64::from(repeats),
        };
        covered.min(self.cut_at_secs)
    }
}

/// A clip placed on the output frame grid.
#[derive(Clone, Debug)]
pub struct TimelineEntry {
    /// The composed clip.
    pub clip: SlideClip,
    /// Nominal start time in seconds.
    pub start_secs: f64,
    /// Output frames showing this clip.
    pub frames: FrameRange,
}

/// Hard-cut concatenation of clips, plus the audio decision.
#[derive(Clone, Debug)]
pub struct Timeline {
    /// Output frame rate.
    pub fps: Fps,
    /// Canvas width shared by every clip.
    pub width: u32,
    /// Canvas height shared by every clip.
    pub height: u32,
    /// Clips in playback order.
    pub entries: Vec<TimelineEntry>,
    /// `None` means a silent video.
    pub audio: Option<AudioPlan>,
}

impl Timeline {
    /// Total output frames.
    pub fn total_frames(&self) -> u64 {
        self.entries.last().map(|e| e.frames.end.0).unwrap_or(0)
    }

    /// Video duration as encoded (frame grid).
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.total_frames())
    }

    /// Sum of nominal clip durations.
    pub fn nominal_secs(&self) -> f64 {
        self.entries.iter().map(|e| e.clip.duration_secs).sum()
    }
}

/// Concatenate `clips` in order and decide how `audio` covers the result.
///
/// Clips must be indexed `0..n` in order and share one canvas size. Frame spans use cumulative
/// rounding so the total is `round(sum × fps)`, with every clip holding at least one frame.
#[tracing::instrument(skip(clips, audio), fields(clips = clips.len()))]
pub fn assemble(clips: Vec<SlideClip>, audio: Option<AudioTrack>, fps: Fps) -> ReelResult<Timeline> {
    let first = clips
        .first()
        .ok_or_else(|| ReelError::invalid_input("timeline needs at least one clip"))?;
    let (width, height) = (first.width, first.height);

    let mut entries = Vec::with_capacity(clips.len());
    let mut cum_secs = 0.0f64;
    let mut cursor = 0u64;
    for (i, clip) in clips.into_iter().enumerate() {
        if clip.index != i {
            return Err(ReelError::invalid_input(format!(
                "clip at position {i} has index {}",
                clip.index
            )));
        }
        if clip.width != width || clip.height != height {
            return Err(ReelError::invalid_input(format!(
                "clip {i} is {}x{}, expected {width}x{height}",
                clip.width, clip.height
            )));
        }
        if !clip.duration_secs.is_finite() || clip.duration_secs <= 0.0 {
            return Err(ReelError::invalid_input(format!(
                "clip {i} duration must be finite and > 0"
            )));
        }

        let start_secs = cum_secs;
        cum_secs += clip.duration_secs;
        let end = fps.secs_to_frames_round(cum_secs).max(cursor + 1);
        let frames = FrameRange::new(FrameIndex(cursor), FrameIndex(end))?;
        cursor = end;
        entries.push(TimelineEntry {
            clip,
            start_secs,
            frames,
        });
    }

    let video_secs = fps.frames_to_secs(cursor);
    let audio = audio
        .map(|track| AudioPlan::fit(track, video_secs))
        .transpose()?;

    tracing::debug!(
        total_frames = cursor,
        video_secs,
        audio = ?audio.as_ref().map(|a| a.fit),
        "timeline assembled"
    );

    Ok(Timeline {
        fps,
        width,
        height,
        entries,
        audio,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assemble.rs"]
mod tests;
